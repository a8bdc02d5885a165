use clap::Parser;
use snip_service::StorageArgs;
use snip_telemetry::TelemetryArgs;
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "SNIP_HTTP_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "SNIP_PUBLIC_BASE_URL";
pub const SHUTDOWN_TIMEOUT_SECS_ENV: &str = "SNIP_SHUTDOWN_TIMEOUT_SECS";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://127.0.0.1:8080";

#[derive(Debug, Parser)]
#[command(name = "snip-gateway")]
pub struct Cli {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Prefix for the `short_url` links returned on creation.
    #[arg(long, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    #[arg(long, env = SHUTDOWN_TIMEOUT_SECS_ENV, default_value_t = 30)]
    pub shutdown_timeout_secs: u64,

    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(flatten)]
    pub telemetry: TelemetryArgs,
}
