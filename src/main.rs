use anyhow::{Context, Result};
use clap::Parser;
use recipe_copilot::{create_router, AppState, Config, NatsClient};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "recipe-copilot", about = "Guided cooking co-pilot service")]
struct Args {
    /// Config file (without extension)
    #[arg(long, default_value = "config/recipe-copilot")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("Recipe Co-Pilot v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);

    // Speech is optional: without NATS, sessions run without narration or voice commands
    let nats = if cfg.speech.enabled {
        match NatsClient::connect(&cfg.speech.nats_url).await {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                warn!("Speech services unavailable, continuing without voice: {:#}", e);
                None
            }
        }
    } else {
        info!("Speech services disabled");
        None
    };

    let state = AppState::new(cfg.copilot.clone(), nats);
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}
