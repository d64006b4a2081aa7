use std::sync::Arc;

use crate::config::Config;
use crate::jobs::processor::JobProcessor;
use crate::jobs::store::JobStore;
use crate::llm_client::TextModel;
use crate::objects::ObjectStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every external collaborator sits behind a trait object so tests can swap it.
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<dyn JobStore>,
    pub objects: Arc<dyn ObjectStore>,
    pub model: Arc<dyn TextModel>,
    pub config: Config,
}

impl AppState {
    pub fn processor(&self) -> JobProcessor {
        JobProcessor::new(self.jobs.clone(), self.model.clone())
    }
}
