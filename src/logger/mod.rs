//! Logger module
//!
//! Thin facade over `tracing` for the server:
//! - Subscriber initialisation from the logging configuration
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging

mod format;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Should be called once at startup.
pub fn init(config: &LoggingConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},access=info", config.level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .compact(),
        )
        .try_init()
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, mailer_kind: &str) {
    tracing::info!("WME Agency server is running on port {}", addr.port());
    tracing::info!("Access your website at: http://{addr}");
    tracing::info!("API endpoints available at: http://{addr}/api");
    tracing::info!(
        environment = %config.environment,
        static_root = %config.static_files.root,
        mailer = mailer_kind,
        max_body_size = config.http.max_body_size,
        "Server configuration loaded"
    );
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    tracing::debug!("Failed to serve connection: {err}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}

pub fn log_shutdown_started(in_flight: usize) {
    tracing::info!("Shutdown requested, waiting for {in_flight} connection(s) to finish");
}
