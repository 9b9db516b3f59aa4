//! bsnd-se (Sound Selection Engine) - Main entry point
//!
//! Serves sound selections for briefings over HTTP. Bootstrap configuration
//! comes from the command line, environment, `~/.config/bsnd/bsnd-se.toml`
//! and compiled defaults, in that order.

use std::fs::OpenOptions;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bsnd_common::config::{
    config_file_path, RootFolderInitializer, RootFolderResolver, TomlConfig, DEFAULT_PORT,
    ROOT_FOLDER_ENV,
};
use bsnd_common::db::init_database;
use bsnd_se::db::run_fallback_audit;
use bsnd_se::{build_router, AppState, RuntimeSettings};

const MODULE_NAME: &str = "bsnd-se";

/// Command-line arguments for bsnd-se
#[derive(Parser, Debug)]
#[command(name = "bsnd-se")]
#[command(about = "Sound selection engine for briefings")]
#[command(version)]
struct Args {
    /// Port to listen on (default 5741)
    #[arg(short, long, env = "BSND_SE_PORT")]
    port: Option<u16>,

    /// Root folder holding bsnd.db
    #[arg(short, long)]
    root_folder: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = config_file_path(MODULE_NAME);
    let toml_config = TomlConfig::load_or_default(config_path.as_deref());

    init_tracing(&toml_config.logging.level, toml_config.logging.file.as_deref())?;

    // Logged before any database work so startup is visible immediately
    info!(
        "Starting bsnd Sound Selection Engine (bsnd-se) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    if let Some(path) = &config_path {
        info!("Config file: {}", path.display());
    }

    let root_folder =
        RootFolderResolver::new(MODULE_NAME).resolve_with(args.root_folder.as_deref());
    info!("Root folder: {}", root_folder.display());

    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .with_context(|| {
            format!(
                "Failed to create root folder {} (set --root-folder or {})",
                initializer.root_folder().display(),
                ROOT_FOLDER_ENV
            )
        })?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let settings = RuntimeSettings::load(&pool)
        .await
        .context("Failed to load runtime settings")?;

    // A failed audit is reported but never blocks startup
    if let Err(e) = run_fallback_audit(&pool).await {
        warn!("Fallback audit failed: {}", e);
    }

    let state = AppState::new(pool, settings);
    let app = build_router(state);

    let port = args.port.or(toml_config.port).unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("bsnd-se listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// `RUST_LOG` wins over the configured level; a log file replaces stderr output
fn init_tracing(level: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
    });

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };
    let stderr_layer = file_layer
        .is_none()
        .then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
