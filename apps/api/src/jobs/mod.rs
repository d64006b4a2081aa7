pub mod events;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod processor;
pub mod prompts;
pub mod scraper;
pub mod store;
pub mod transport;
