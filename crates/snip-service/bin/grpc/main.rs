mod cli;
mod error;
mod server;

use std::time::Duration;

use crate::cli::Cli;
use crate::server::UrlGrpcServer;
use clap::Parser;
use snip_proto_schema::v1::url_service_server::UrlServiceServer;
use snip_service::{build_shortener, shutdown_signal, DetachedTasks};
use tokio::sync::oneshot;
use tokio::time::Instant;
use tonic::transport::Server;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::try_parse()?;
    let _telemetry = snip_telemetry::init(config.telemetry.clone().into_config("snip-grpc"))?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage.storage,
        "starting snip gRPC server"
    );

    let tasks = DetachedTasks::new();
    let shortener = build_shortener(&config.storage, tasks.clone()).await?;

    let (health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<UrlServiceServer<UrlGrpcServer>>()
        .await;

    let (signalled_tx, signalled_rx) = oneshot::channel();
    let server = Server::builder()
        .add_service(health_service)
        .add_service(UrlServiceServer::new(UrlGrpcServer::new(shortener)))
        .serve_with_shutdown(config.listen_addr, async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(());
        });
    tokio::pin!(server);

    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let deadline = tokio::select! {
        result = &mut server => {
            result?;
            Instant::now() + shutdown_timeout
        }
        _ = signalled_rx => {
            health_reporter
                .set_not_serving::<UrlServiceServer<UrlGrpcServer>>()
                .await;
            let deadline = Instant::now() + shutdown_timeout;
            match tokio::time::timeout_at(deadline, &mut server).await {
                Ok(result) => result?,
                Err(_) => warn!(
                    timeout_secs = config.shutdown_timeout_secs,
                    "shutdown deadline elapsed, dropping open requests"
                ),
            }
            deadline
        }
    };

    let pending = tasks.in_flight();
    if tasks
        .drain_timeout(deadline.saturating_duration_since(Instant::now()))
        .await
    {
        info!(drained = pending, "server stopped");
    } else {
        warn!(
            abandoned = tasks.in_flight(),
            "server stopped before all click updates finished"
        );
    }

    Ok(())
}
