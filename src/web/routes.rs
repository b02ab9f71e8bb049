use crate::state::AppState;
use axum::{routing::get, Router};

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // Page
        .route("/", get(super::handlers::index::index))

        // Relay
        .route("/process_query", get(super::handlers::relay::process_query))

        // Health check
        .route("/health", get(super::handlers::health::health_check))

        .with_state(state)
}
