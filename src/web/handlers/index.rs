use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Html};

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    state
        .templates
        .render_index(state.upstream.model())
        .map(Html)
        .map_err(|e| {
            tracing::error!("Template error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
