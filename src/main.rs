//! stock-advisor server binary

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;

use stock_advisor::api::{create_router, AppState};
use stock_advisor::config::AppConfig;
use stock_advisor::logging::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    init_tracing(&config.logging)?;
    tracing::info!(
        level = %config.logging.level,
        environment = %config.app.environment,
        "Logging configured"
    );

    let config = Arc::new(config);
    on_startup(&config);

    let router = create_router(AppState::new(config.clone()))?;

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    tracing::info!(%addr, "Listening for HTTP traffic");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    on_shutdown();

    Ok(())
}

/// Nothing is acquired yet; a database pool would be opened here.
fn on_startup(config: &AppConfig) {
    tracing::info!("Starting {} v{}", config.app.name, config.app.version);
    tracing::info!("Environment: {}", config.app.environment);
    if config.app.debug {
        tracing::debug!(prefix = %config.app.api_prefix, "Debug mode enabled");
    }
}

fn on_shutdown() {
    tracing::info!("Shutting down");
    tracing::info!("Shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::warn!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
