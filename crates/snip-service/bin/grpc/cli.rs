use clap::Parser;
use snip_service::StorageArgs;
use snip_telemetry::TelemetryArgs;
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "SNIP_GRPC_LISTEN_ADDR";
pub const SHUTDOWN_TIMEOUT_SECS_ENV: &str = "SNIP_SHUTDOWN_TIMEOUT_SECS";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:50051";

#[derive(Debug, Parser)]
#[command(name = "snip-grpc")]
pub struct Cli {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Upper bound on waiting for in-flight work after a shutdown signal.
    #[arg(long, env = SHUTDOWN_TIMEOUT_SECS_ENV, default_value_t = 30)]
    pub shutdown_timeout_secs: u64,

    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(flatten)]
    pub telemetry: TelemetryArgs,
}
