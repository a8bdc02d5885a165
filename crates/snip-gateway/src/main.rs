mod app;
mod cli;
mod error;
mod handlers;
mod model;
mod state;

use std::future::IntoFuture;
use std::time::Duration;

use crate::app::App;
use crate::cli::Cli;
use crate::state::AppState;
use clap::Parser;
use snip_service::{build_shortener, shutdown_signal, DetachedTasks};
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::try_parse()?;
    let _telemetry = snip_telemetry::init(config.telemetry.clone().into_config("snip-gateway"))?;

    let tasks = DetachedTasks::new();
    let shortener = build_shortener(&config.storage, tasks.clone()).await?;
    let router = App::router(AppState::new(shortener, config.public_base_url.clone()));

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(
        listen_addr = %listener.local_addr()?,
        storage_backend = %config.storage.storage,
        public_base_url = %config.public_base_url,
        "starting gateway server"
    );

    let (signalled_tx, signalled_rx) = oneshot::channel();
    let server = axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(());
        })
        .into_future();
    tokio::pin!(server);

    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let deadline = tokio::select! {
        result = &mut server => {
            result?;
            Instant::now() + shutdown_timeout
        }
        _ = signalled_rx => {
            let deadline = Instant::now() + shutdown_timeout;
            match tokio::time::timeout_at(deadline, &mut server).await {
                Ok(result) => result?,
                Err(_) => warn!(
                    timeout_secs = config.shutdown_timeout_secs,
                    "shutdown deadline elapsed, dropping open connections"
                ),
            }
            deadline
        }
    };

    if !tasks
        .drain_timeout(deadline.saturating_duration_since(Instant::now()))
        .await
    {
        warn!(
            abandoned = tasks.in_flight(),
            "gateway stopped before all click updates finished"
        );
    }
    info!("gateway stopped");

    Ok(())
}
