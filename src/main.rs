use anyhow::{Context, Result};
use ollama_idea_relay::{config::Config, state::AppState, web};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ollama_idea_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Starting Ollama idea relay v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::from_env().context("loading configuration")?;

    // Create application state
    let app_state = AppState::new(config)?;

    // Start web server
    web::start_server(app_state).await?;

    Ok(())
}
