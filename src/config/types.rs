// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Runtime environment name; `development` exposes error detail in responses
    pub environment: String,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub static_files: StaticConfig,
    pub mail: MailConfig,
    pub rate_limit: RateLimitSettings,
}

impl Config {
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    pub access_log_format: String,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Upper bound on the lifetime of one connection, in seconds
    pub connection_timeout: u64,
    pub max_connections: Option<u64>,
    /// Grace period for in-flight connections on shutdown, in seconds
    pub shutdown_timeout: u64,
}

impl PerformanceConfig {
    pub const fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout)
    }

    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub max_body_size: u64,
    pub compression: bool,
    /// Responses smaller than this many bytes are sent uncompressed
    pub compression_threshold: usize,
}

/// Static asset configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StaticConfig {
    pub root: String,
    /// Directory index and SPA fallback document, relative to `root`
    pub index_file: String,
}

/// Mail relay configuration
#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub pass: Option<String>,
    pub from: String,
    pub to: String,
}

impl MailConfig {
    /// Relay credentials, present only when both user and secret are non-empty
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.user.as_deref(), self.pass.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}

/// Contact form rate limiting
#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitSettings {
    pub window_secs: u64,
    pub max_requests: u32,
    /// Key clients by the first `X-Forwarded-For` address instead of the peer
    pub trust_forwarded_for: bool,
}

impl RateLimitSettings {
    pub const fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}
