//! srw-api - JKT48 Showroom Wrapped service
//!
//! REST facade over the SHOWROOM site:
//! - `POST /most-watch`: batched room profile fetches, engagement estimate
//! - `POST /premium-lives`: paid-live history totals and show ranking
//!
//! Configuration priority: command line > environment > TOML file > defaults.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use srw_common::config::{resolve_config_path, ConfigOverrides, TomlConfig};
use srw_common::{RoomDataset, SetlistCatalog, TraineeIdSet};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use srw_api::api::buildinfo::BuildInfo;
use srw_api::AppState;

#[derive(Parser, Debug)]
#[command(name = "srw-api")]
#[command(about = "JKT48 Showroom Wrapped API")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long, env = "SRW_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP listen port
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// HTTP bind address
    #[arg(long, env = "SRW_BIND_ADDRESS")]
    bind: Option<String>,

    /// Room dataset JSON (bundled dataset when omitted)
    #[arg(long, env = "SRW_ROOMS")]
    rooms: Option<PathBuf>,

    /// Trainee room id JSON (bundled list when omitted)
    #[arg(long, env = "SRW_TRAINEES")]
    trainees: Option<PathBuf>,

    /// Directory served for unmatched GET requests
    #[arg(long, env = "SRW_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(long, env = "SRW_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port,
            bind_address: self.bind.clone(),
            rooms_path: self.rooms.clone(),
            trainees_path: self.trainees.clone(),
            static_dir: self.static_dir.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_path(args.config.as_deref());
    let mut config = TomlConfig::load(config_path.as_deref()).context("Failed to load config")?;
    config.apply_overrides(args.overrides());

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let build = BuildInfo::current();
    info!(
        "Starting srw-api v{} [{}] built {} ({})",
        build.version, build.git_hash, build.build_timestamp, build.build_profile
    );
    match &config_path {
        Some(path) if path.exists() => info!("Config: {}", path.display()),
        Some(path) => warn!("Config file {} not found, using defaults", path.display()),
        None => info!("Config: compiled defaults"),
    }

    config.validate().context("Invalid configuration")?;

    let dataset = RoomDataset::load(config.data.rooms_path.as_deref())
        .context("Failed to load room dataset")?;
    let trainees = TraineeIdSet::load(config.data.trainees_path.as_deref())
        .context("Failed to load trainee room ids")?;
    let setlists = SetlistCatalog::load(config.data.setlists_path.as_deref())
        .context("Failed to load setlist catalog")?;
    info!(
        rooms = dataset.len(),
        trainees = trainees.len(),
        shows = config.shows.len(),
        "Datasets loaded"
    );

    let state = AppState::from_config(&config, dataset, trainees, setlists)
        .context("Failed to create upstream clients")?;
    let app = srw_api::build_router(state, &config.server);

    let addr = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Server is running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
