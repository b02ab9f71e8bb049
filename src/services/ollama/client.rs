//! Streaming client for Ollama's `/api/generate`

use super::decode::GenerateChunk;
use crate::config::UpstreamConfig;
use crate::types::RelayError;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use serde::Serialize;
use std::sync::Arc;

pub type ByteStream = BoxStream<'static, Result<Bytes, reqwest::Error>>;

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
}

#[derive(Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    config: Arc<UpstreamConfig>,
}

impl OllamaClient {
    pub fn new(config: UpstreamConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.connect_timeout(timeout).read_timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            config: Arc::new(config),
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn generate_url(&self) -> String {
        self.config.generate_url()
    }

    /// Issue one streaming generate request and hand back the raw body.
    ///
    /// Transport failures before the first byte and non-success statuses are
    /// classified here. Errors inside the body surface as stream items.
    pub async fn generate_stream(&self, prompt: &str) -> Result<ByteStream, RelayError> {
        let url = self.generate_url();
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: true,
        };

        tracing::debug!(%url, model = %self.config.model, prompt_len = prompt.len(), "Opening upstream stream");

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RelayError::from_upstream(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::UpstreamStatus {
                status,
                message: upstream_error_message(&body),
            });
        }

        Ok(response.bytes_stream().boxed())
    }
}

// Ollama reports failures as `{"error": "..."}`; fall back to the raw body.
fn upstream_error_message(body: &str) -> String {
    serde_json::from_str::<GenerateChunk>(body)
        .ok()
        .and_then(|chunk| chunk.error)
        .unwrap_or_else(|| body.trim().to_string())
}
