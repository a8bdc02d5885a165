//! Tracing setup shared by the snip binaries.
//!
//! Installs a `tracing` subscriber with an [`EnvFilter`] (from `RUST_LOG`,
//! falling back to a default directive), a text or JSON formatter, the
//! `log` bridge, and, when an endpoint is configured, an OpenTelemetry
//! OTLP span exporter.

use std::fmt::{Display, Formatter};

use clap::{Args, ValueEnum};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};
use typed_builder::TypedBuilder;

pub const LOG_FORMAT_ENV: &str = "SNIP_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "SNIP_OTLP_ENDPOINT";

pub const DEFAULT_DIRECTIVE: &str = "info";

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
    #[error("failed to build otlp exporter: {0}")]
    Exporter(#[from] opentelemetry_otlp::ExporterBuildError),
    #[error("failed to install log bridge: {0}")]
    LogBridge(#[from] tracing_log::log::SetLoggerError),
    #[error("failed to install subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Logging flags, flattened into each binary's command line.
#[derive(Debug, Clone, Args)]
pub struct TelemetryArgs {
    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP/gRPC collector, e.g. `http://localhost:4317`. Spans are only
    /// exported when set.
    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}

impl TelemetryArgs {
    pub fn into_config(self, service_name: &str) -> TelemetryConfig {
        TelemetryConfig::builder()
            .service_name(service_name)
            .format(self.log_format)
            .otlp_endpoint(self.otlp_endpoint)
            .build()
    }
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct TelemetryConfig {
    #[builder(setter(into))]
    service_name: String,
    #[builder(default)]
    format: LogFormat,
    #[builder(default)]
    otlp_endpoint: Option<String>,
    #[builder(default = DEFAULT_DIRECTIVE.to_owned(), setter(into))]
    default_directive: String,
}

/// Flushes exported spans when dropped. Keep it alive for the lifetime of
/// the process.
#[must_use = "dropping the guard shuts down span export"]
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(err) = provider.shutdown() {
                eprintln!("failed to shut down tracer provider: {err}");
            }
        }
    }
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let filter = env_filter(
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
        &config.default_directive,
    )?;

    let provider = config
        .otlp_endpoint
        .as_deref()
        .map(|endpoint| tracer_provider(endpoint, &config.service_name))
        .transpose()?;
    let otel = provider.as_ref().map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer(config.service_name.clone()))
    });

    let (text, json) = match config.format {
        LogFormat::Text => (Some(fmt::layer()), None),
        LogFormat::Json => (None, Some(fmt::layer().json())),
    };

    let subscriber = Registry::default()
        .with(filter)
        .with(otel)
        .with(text)
        .with(json);

    LogTracer::init()?;
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(
        service = %config.service_name,
        format = %config.format,
        otlp = config.otlp_endpoint.is_some(),
        "telemetry initialized"
    );

    Ok(TelemetryGuard { provider })
}

/// `RUST_LOG` wins when set; otherwise `default_directive` applies.
fn env_filter(from_env: Option<String>, default_directive: &str) -> Result<EnvFilter, ParseError> {
    match from_env.filter(|value| !value.trim().is_empty()) {
        Some(directives) => EnvFilter::try_new(directives),
        None => EnvFilter::try_new(default_directive),
    }
}

fn tracer_provider(
    endpoint: &str,
    service_name: &str,
) -> Result<SdkTracerProvider, TelemetryError> {
    let exporter = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(
            Resource::builder()
                .with_service_name(service_name.to_owned())
                .build(),
        )
        .build();

    opentelemetry::global::set_tracer_provider(provider.clone());
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        telemetry: TelemetryArgs,
    }

    #[test]
    fn env_value_overrides_default_directive() {
        let filter = env_filter(Some("snip_service=debug".to_owned()), "info").unwrap();
        assert_eq!(filter.to_string(), "snip_service=debug");
    }

    #[test]
    fn blank_env_value_falls_back_to_default() {
        let filter = env_filter(Some("  ".to_owned()), "warn").unwrap();
        assert_eq!(filter.to_string(), "warn");

        let filter = env_filter(None, "info").unwrap();
        assert_eq!(filter.to_string(), "info");
    }

    #[test]
    fn invalid_directive_is_an_error() {
        assert!(env_filter(Some("snip=loudest".to_owned()), "info").is_err());
    }

    #[test]
    fn args_build_config() {
        let cli = TestCli::try_parse_from([
            "snip",
            "--log-format",
            "json",
            "--otlp-endpoint",
            "http://localhost:4317",
        ])
        .unwrap();

        let config = cli.telemetry.into_config("snip-grpc");
        assert_eq!(config.service_name, "snip-grpc");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.otlp_endpoint.as_deref(), Some("http://localhost:4317"));
        assert_eq!(config.default_directive, DEFAULT_DIRECTIVE);
    }
}
