use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// The page may be served from anywhere; the relay only takes GETs.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any)
}
