//! Health check endpoint

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::json;

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "model": state.upstream.model(),
            "upstream": state.upstream.generate_url(),
        })),
    )
}
