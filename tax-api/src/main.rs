//! # tax-api binary
//!
//! Opens the settings store, then serves the HTTP API until Ctrl-C or
//! SIGTERM. Open connections get ten seconds to finish after the signal.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tax_api::config::Config;
use tax_api::logging::init_logging;
use tax_api::state::AppState;
use tax_core::ProgressiveTaxCalculator;
use tax_core::db::RepositoryRegistry;
use tax_db_sqlite::SqliteRepositoryFactory;
use tokio::sync::watch;
use tracing::{info, warn};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    init_logging();
    info!(?config, "starting tax-api");

    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    let settings = registry
        .create(&config.db_config())
        .await
        .with_context(|| format!("Failed to open settings store '{}'", config.database_url))?;

    let state = AppState::new(
        Arc::new(ProgressiveTaxCalculator::default()),
        Arc::from(settings),
    );
    let app = tax_api::app(state, config.admin_credentials());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "tax-api listening");

    let (stopping_tx, mut stopping_rx) = watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("shutting down the server");
            let _ = stopping_tx.send(true);
        })
        .into_future();
    let deadline = async move {
        let _ = stopping_rx.wait_for(|stopping| *stopping).await;
        tokio::time::sleep(SHUTDOWN_TIMEOUT).await;
    };

    tokio::select! {
        result = server => result.context("Server error")?,
        _ = deadline => warn!(timeout = ?SHUTDOWN_TIMEOUT, "graceful shutdown timed out, dropping open connections"),
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                warn!(%error, "failed to listen for SIGTERM");
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
}
