//! fusion gateway binary.
//!
//! - `GET /health`, `POST /fuse`, `GET /metrics`, `GET /stats`,
//!   `GET|POST /config`
//! - Optional boot config (`--config`, YAML or JSON) applied before serving
//! - Graceful shutdown on SIGINT/SIGTERM

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fusion_core::FusionConfig;
use fusion_gateway::{
    app_state::AppState, config, error::StartupError, obs::MetricsRegistry, server,
    services::FusionService,
};

/// Sensor fusion HTTP service
#[derive(Parser, Debug)]
#[command(name = "fusion-gateway", version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Fusion configuration file (JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => {
            tracing::info!("service stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start service");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), StartupError> {
    let service = match &args.config {
        Some(path) => FusionService::with_config(boot_config(path)?),
        None => FusionService::new(),
    };

    let state = AppState::new(service, MetricsRegistry::new());
    let listener = server::bind(SocketAddr::new(args.host, args.port)).await?;
    server::serve(listener, state, server::shutdown_signal()).await
}

fn boot_config(path: &Path) -> Result<FusionConfig, StartupError> {
    let cfg = config::load_boot_config(path)?;
    tracing::info!(
        path = %path.display(),
        outlier_threshold = cfg.outlier_threshold,
        min_confidence = cfg.min_confidence,
        enable_outlier_detection = cfg.enable_outlier_detection,
        "boot configuration applied"
    );
    Ok(cfg)
}
