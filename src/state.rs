use crate::config::Config;
use crate::services::{OllamaClient, TemplateEngine};
use anyhow::Result;
use std::sync::Arc;

/// Shared, read-only handles. Relay sessions keep their own state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub upstream: OllamaClient,
    pub templates: Arc<TemplateEngine>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        tracing::info!("[STATE] Initializing AppState...");
        tracing::info!("[STATE]   Upstream: {}", config.upstream.generate_url());
        tracing::info!("[STATE]   Model: {}", config.upstream.model);
        if let Some(timeout) = config.upstream.timeout {
            tracing::info!("[STATE]   Upstream timeout: {:?}", timeout);
        }

        let templates = match &config.prompt_template {
            Some(path) => TemplateEngine::with_prompt_file(path)?,
            None => TemplateEngine::new()?,
        };

        let upstream = OllamaClient::new(config.upstream.clone())?;

        Ok(Self {
            config: Arc::new(config),
            upstream,
            templates: Arc::new(templates),
        })
    }
}
