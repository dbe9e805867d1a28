//! Passport API Server
//!
//! Daily weather passport buttons and gridded rain risk over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use passport_api::{build_router, ApiConfig, AppState};

/// Passport API Server
#[derive(Parser, Debug)]
#[command(name = "passport-api")]
#[command(about = "Weather passport buttons and gridded precipitation risk")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8000", env = "PASSPORT_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// YAML configuration file
    #[arg(short, long, default_value = "config/passport.yaml", env = "PASSPORT_CONFIG")]
    config: PathBuf,

    /// Data directory, overriding the config file
    #[arg(long, env = "PASSPORT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Number of worker threads
    #[arg(long, env = "PASSPORT_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = match runtime_builder.build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create Tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    runtime.block_on(async move {
        if let Err(e) = run_server(args).await {
            tracing::error!("Passport API failed: {:#}", e);
            std::process::exit(1);
        }
    });
}

async fn run_server(args: Args) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    info!("Starting passport API server");

    let mut config = ApiConfig::load(&args.config)?;
    if let Some(dir) = args.data_dir {
        config = config.with_data_dir(dir);
    }
    let config = config.with_api_key(std::env::var("API_KEY").ok());

    info!(
        data_dir = %config.data_dir.display(),
        grid_dir = %config.grid_dir().display(),
        auth = config.api_key.is_some(),
        "Configuration loaded"
    );

    let mut state = AppState::new(config);
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => warn!("Prometheus recorder not installed: {}", e),
    }

    let app = build_router(Arc::new(state));

    // Parse listen address
    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!("Passport API listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

    info!("Passport API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
