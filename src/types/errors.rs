//! Relay error taxonomy

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

pub const NO_QUERY_PROVIDED: &str = "No query provided";

#[derive(Debug, Error)]
pub enum RelayError {
    /// Client sent nothing usable. Surfaced as `400` before any streaming starts.
    #[error("{0}")]
    Validation(String),

    #[error("Cannot connect to Ollama server. Please make sure it's running at {url}")]
    UpstreamUnreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Ollama server returned {status}: {message}")]
    UpstreamStatus {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("{0}")]
    UpstreamGeneric(String),

    #[error("Prompt template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl RelayError {
    pub fn no_query() -> Self {
        Self::Validation(NO_QUERY_PROVIDED.to_string())
    }

    /// Classifies a transport failure from the upstream client.
    pub fn from_upstream(url: &str, err: reqwest::Error) -> Self {
        if err.is_connect() || (err.is_timeout() && !err.is_body()) {
            Self::UpstreamUnreachable {
                url: url.to_string(),
                source: err,
            }
        } else {
            Self::UpstreamGeneric(err.to_string())
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
