//! Centralized logging initialization
//!
//! stdout carries the JSON-RPC channel, so every log line goes to stderr.
//! `RUST_LOG` takes precedence over the configured level for per-module
//! filtering.

use crate::{AppConfig, LogFormat};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber once at process start.
pub fn initialize(config: &AppConfig) {
    let log_level = config.logging.level.parse().unwrap_or(tracing::Level::INFO);
    let env_filter = EnvFilter::from_default_env().add_directive(log_level.into());

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Create a request span so nested logs carry the request id and transport.
pub fn request_span(request_id: &str, transport: &str) -> tracing::Span {
    tracing::info_span!(
        "request",
        request_id = %request_id,
        transport = %transport
    )
}
