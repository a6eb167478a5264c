//! Dramshelf server binary.

use anyhow::{Context, Result};
use clap::Parser;
use dramshelf_core::config::AppConfig;
use dramshelf_server::idempotency::{MemoryReplayStore, spawn_sweeper};
use dramshelf_server::{AppState, create_router};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Dramshelf - a personal whisky collection server
#[derive(Parser, Debug)]
#[command(name = "dramshelfd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "DRAMSHELF_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Startup banner
    tracing::info!("Dramshelf v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file is optional, env vars can provide/override everything)
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();

    if config_path.exists() {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}", args.config);
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("DRAMSHELF_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    // Initialize metadata store
    let metadata = dramshelf_metadata::from_config(&config.metadata)
        .await
        .context("failed to initialize metadata store")?;
    tracing::info!("Metadata store initialized");

    // Verify connectivity before accepting requests
    metadata
        .health_check()
        .await
        .context("metadata health check failed")?;

    // Create application state with the in-memory replay store
    let replay_store = Arc::new(MemoryReplayStore::new());
    let state = AppState::with_replay_store(config.clone(), metadata, replay_store.clone());

    // Warm the name index from the distillery table
    state
        .reload_name_index()
        .await
        .context("failed to warm name index")?;

    // Spawn the replay cache expiry sweeper
    spawn_sweeper(replay_store, config.idempotency.sweep_interval());
    tracing::info!(
        interval_secs = config.idempotency.sweep_interval().as_secs(),
        "Replay cache sweeper spawned"
    );

    let app = create_router(state);

    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind listener")?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
