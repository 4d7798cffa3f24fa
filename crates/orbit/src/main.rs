//! ORBIT control plane server entry point
//!
//! Boots logging and configuration, populates the live adapter catalog,
//! and serves the admin/chat API until interrupted.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use orbit_application::ports::AdapterQuery;
use orbit_application::use_cases::RequestContextBuilder;
use orbit_domain::error::Result;
use orbit_infrastructure::config::{ConfigManager, GeneralConfig, LoggingConfig};
use orbit_infrastructure::logging::init_logging;
use orbit_infrastructure::{AdapterManager, DatasourceRegistry, ProviderFactory};
use orbit_server::{router, AppState};

/// ORBIT inference-serving control plane
#[derive(Debug, Parser)]
#[command(name = "orbit", version, about)]
struct Args {
    /// Path to the root configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    config: PathBuf,

    /// Override the configured server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the configured log level
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = run(args).await {
        error!("Fatal: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = Arc::new(ConfigManager::new(&args.config));
    let merged = config.load()?;

    let mut logging = LoggingConfig::from_config(&merged)?;
    if let Some(level) = args.log_level {
        logging.level = level;
    }
    init_logging(&logging)?;

    let general = GeneralConfig::from_config(&merged)?;
    let port = args.port.unwrap_or(general.port);

    let registry = Arc::new(DatasourceRegistry::new());
    let factory = Arc::new(ProviderFactory::new());
    let manager = Arc::new(AdapterManager::new(
        Arc::clone(&config),
        registry,
        factory,
    ));

    let summary = manager.load_all(&CancellationToken::new()).await?;
    info!(
        "Adapter catalog loaded: {} total, {} failed",
        summary.total, summary.failed
    );

    let catalog: Arc<dyn AdapterQuery> = manager.clone() as Arc<dyn AdapterQuery>;
    let context_builder = Arc::new(RequestContextBuilder::new(
        catalog,
        general.inference_provider.clone(),
        general.timezone.clone(),
    ));

    let app = router(AppState {
        manager: Arc::clone(&manager),
        context_builder,
        auth: general.auth.clone(),
    });

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("ORBIT server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down; releasing adapter resources");
    manager.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
    }
}
