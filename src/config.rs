use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub host: String,
    pub port: u16,

    // Inference backend
    pub upstream: UpstreamConfig,

    // Replaces the embedded prompt template when set
    pub prompt_template: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub model: String,
    /// Connect and per-read idle timeout. Never a deadline for the whole generation.
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            upstream: UpstreamConfig::default(),
            prompt_template: None,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "deepseek-r1:1.5b".to_string(),
            timeout: None,
        }
    }
}

impl UpstreamConfig {
    /// Full URL of the streaming generate endpoint.
    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, falling back to defaults
    /// for anything the lookup does not provide.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let timeout = parse_var::<u64, _>(&lookup, "UPSTREAM_TIMEOUT_SECS")?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Config {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),

            upstream: UpstreamConfig {
                base_url: lookup("OLLAMA_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.upstream.base_url),
                model: lookup("OLLAMA_MODEL").unwrap_or(defaults.upstream.model),
                timeout,
            },

            prompt_template: lookup("PROMPT_TEMPLATE")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("invalid value for {key}: {raw:?}"))
        })
        .transpose()
}
