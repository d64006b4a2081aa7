pub mod health;

use axum::{
    http::{header, HeaderValue},
    routing::{get, post, MethodRouter},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::jobs::handlers;
use crate::state::AppState;

/// The public listing carries fixed CORS headers on every response, errors included.
fn with_read_cors(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route
        .route_layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .route_layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .route_layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET"),
        ))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs API
        .route("/api/v1/jobs", with_read_cors(get(handlers::handle_list_jobs)))
        .route("/api/v1/jobs/process", post(handlers::handle_process_event))
        // Collection
        .route("/api/v1/scrape", post(handlers::handle_scrape))
        .with_state(state)
}
