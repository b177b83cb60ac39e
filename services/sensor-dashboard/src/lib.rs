//! Sensor dashboard - polls a sensor endpoint and serves the readings
//!
//! Fetches temperature readings on a configurable interval, keeps the latest
//! accepted list in shared state, and renders it as cards, gauges and a trend chart.

pub mod classify;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod io;
pub mod poller;
pub mod reading;
pub mod source;
pub mod state;

pub use config::{load_config, Config, RefreshInterval};
pub use error::{DashboardError, Result};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::io::ReqwestHttpClient;
use crate::poller::{current_epoch_ms, Poller};
use crate::source::{HttpReadingSource, ReadingSource};

/// Build the production reading source for a configuration
pub fn build_source(config: &Config) -> Result<HttpReadingSource> {
    let http = Arc::new(ReqwestHttpClient::with_timeout(config.source.timeout)?);
    Ok(HttpReadingSource::new(config.source.url.clone(), http))
}

/// Run the dashboard service with the given configuration
pub async fn run(config: Config) -> Result<()> {
    config.validate()?;

    let source: Arc<dyn ReadingSource> = Arc::new(build_source(&config)?);
    let cancel = CancellationToken::new();

    let state = state::new_state_handle(config.polling.interval_ms, current_epoch_ms());

    let (poller, handle) = Poller::new(
        source,
        Arc::clone(&state),
        Duration::from_millis(config.polling.interval_ms),
        cancel.clone(),
    )?;

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    // Start dashboard if enabled
    if config.dashboard.enabled {
        let addr: SocketAddr = format!(
            "{}:{}",
            config.dashboard.bind_address, config.dashboard.port
        )
        .parse()
        .map_err(|e| {
            DashboardError::Config(format!(
                "Invalid dashboard address {}:{}: {}",
                config.dashboard.bind_address, config.dashboard.port, e
            ))
        })?;
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            DashboardError::Server(format!("Failed to bind dashboard to {}: {}", addr, e))
        })?;
        tracing::info!("Dashboard listening on http://{}", addr);

        let router = dashboard::build_router(handle.clone());
        let cancel_for_dashboard = cancel.clone();
        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    cancel_for_dashboard.cancelled().await;
                })
                .await
                .ok();

            tracing::debug!("Dashboard stopped");
        });
    }

    tracing::info!("Polling controller started");

    // Runs until cancelled
    poller.run().await;

    drop(handle);
    tracing::info!("Polling controller stopped");

    Ok(())
}
