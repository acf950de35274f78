//! Event registration HTTP server.
//!
//! This binary:
//! - Loads configuration from the environment (and `.env`)
//! - Opens the configured storage backend, running migrations if asked to
//! - Exposes Prometheus metrics on a separate port
//! - Serves the HTTP API until Ctrl+C or SIGTERM

use anyhow::Context;
use event_registration_server::{Config, build_router, build_state, metrics};
use std::net::{IpAddr, SocketAddr};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,event_registration_server=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting event registration server");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        address = %config.server.address(),
        storage = ?config.storage,
        metrics_port = config.server.metrics_port,
        "Configuration loaded"
    );

    // Metrics
    metrics::register_business_metrics();
    if config.server.metrics_port != 0 {
        let host: IpAddr = config
            .server
            .host
            .parse()
            .with_context(|| format!("HOST {} is not an IP address", config.server.host))?;
        metrics::install_prometheus_exporter(SocketAddr::new(host, config.server.metrics_port))?;
    }

    // Storage, engine and router
    let state = build_state(&config).await?;
    let app = build_router(state, &config.server.cors_allowed_origins);

    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Server listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
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
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
