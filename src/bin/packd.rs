//! packd: pack catalog daemon.
//!
//! Serves the pack catalog over HTTP/JSON and gRPC from one process. Both
//! listeners share one `PackLookup` and stop on the same shutdown signal.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tonic::transport::Server;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pack_service::server::access_log::AccessLog;
use pack_service::server::config::{Config, LogFormat, LoggingConfig};
use pack_service::server::proto::pack_service_server::PackServiceServer;
use pack_service::server::{AppState, PackGrpcService, router};
use pack_service::telemetry::UPKEEP_INTERVAL;
use pack_service::{MemoryCatalog, MetricsCollector, PackError, PackLookup};

/// packd: question pack catalog service.
#[derive(Parser)]
#[command(name = "packd")]
#[command(version = pack_service::PKG_VERSION)]
#[command(about = "Question pack catalog daemon (HTTP + gRPC)")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP bind address (overrides the config file).
    #[arg(long, env = "PACKD_HTTP_ADDRESS")]
    http_address: Option<String>,

    /// gRPC bind address (overrides the config file).
    #[arg(long, env = "PACKD_GRPC_ADDRESS")]
    grpc_address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(addr) = args.http_address {
        config.server.http_address = addr;
    }
    if let Some(addr) = args.grpc_address {
        config.server.grpc_address = addr;
    }

    init_tracing(&config.logging);

    let http_addr = parse_address("http_address", &config.server.http_address)?;
    let grpc_addr = parse_address("grpc_address", &config.server.grpc_address)?;

    // Catalog: configured fixture, or the embedded dataset
    let catalog = match &config.catalog.path {
        Some(path) => MemoryCatalog::load(path)?,
        None => MemoryCatalog::embedded()?,
    };

    let metrics = Arc::new(MetricsCollector::new()?);
    let lookup = PackLookup::new(Arc::new(catalog), metrics.clone());
    let (access_log, writer) =
        AccessLog::spawn(config.logging.access_log_capacity, metrics.clone());
    let upkeep = spawn_metrics_upkeep(metrics);

    info!(
        version = pack_service::version_string(),
        %http_addr,
        %grpc_addr,
        packs = lookup.store().len(),
        "packd starting"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // HTTP
    let mut app = router(AppState::new(lookup.clone()), access_log);
    if config.server.cors_permissive {
        app = app.layer(CorsLayer::permissive());
    }
    let listener = TcpListener::bind(http_addr).await?;
    let http = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(wait_for(shutdown_rx.clone()))
    .into_future();

    // gRPC
    let grpc = Server::builder()
        .add_service(PackServiceServer::new(PackGrpcService::new(lookup)))
        .serve_with_shutdown(grpc_addr, wait_for(shutdown_rx));

    tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutdown requested");
        let _ = shutdown_tx.send(true);
    });

    let (http_result, grpc_result) = tokio::join!(http, grpc);
    if let Err(e) = &http_result {
        error!(error = %e, "HTTP server failed");
    }
    if let Err(e) = &grpc_result {
        error!(error = %e, "gRPC server failed");
    }

    // Both routers are gone, so the writer drains and exits.
    let _ = writer.await;
    upkeep.abort();
    info!("packd stopped");

    http_result?;
    grpc_result?;
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match logging.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Drain histogram buffers even when nothing scrapes `/metrics`.
fn spawn_metrics_upkeep(metrics: Arc<MetricsCollector>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(UPKEEP_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            metrics.run_upkeep();
        }
    })
}

fn parse_address(field: &str, value: &str) -> Result<SocketAddr, PackError> {
    value
        .parse()
        .map_err(|e| PackError::Configuration(format!("Invalid {field} {value:?}: {e}")))
}

async fn wait_for(mut rx: watch::Receiver<bool>) {
    // A dropped sender also means shutdown.
    let _ = rx.wait_for(|stop| *stop).await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
