// Configuration module entry point
// Loads application configuration once at startup and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, MailConfig, PerformanceConfig, RateLimitSettings,
    ServerConfig, StaticConfig,
};

/// Plain environment variables understood for compatibility with existing deployments,
/// mapped to their configuration keys. These take precedence over every other source.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("NODE_ENV", "environment"),
    ("SMTP_HOST", "mail.host"),
    ("SMTP_PORT", "mail.port"),
    ("SMTP_USER", "mail.user"),
    ("SMTP_PASS", "mail.pass"),
    ("FROM_EMAIL", "mail.from"),
    ("TO_EMAIL", "mail.to"),
];

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    /// Load configuration, resolving the plain override variables through `lookup`
    pub fn load_with_env<F>(config_path: &str, lookup: F) -> Result<Self, config::ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("WME").separator("__"))
            .set_default("environment", "production")?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 120)?
            .set_default("performance.shutdown_timeout", 10)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("http.compression", true)?
            .set_default("http.compression_threshold", 1024)?
            .set_default("static_files.root", "public")?
            .set_default("static_files.index_file", "index.html")?
            .set_default("mail.host", "smtp.gmail.com")?
            .set_default("mail.port", 587)?
            .set_default("mail.from", "noreply@wmeagency.com")?
            .set_default("mail.to", "contact@wmeagency.com")?
            .set_default("rate_limit.window_secs", 15 * 60)?
            .set_default("rate_limit.max_requests", 3)?
            .set_default("rate_limit.trust_forwarded_for", false)?;

        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, lookup(var))?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISSING: &str = "tests/no-such-config";

    #[test]
    fn test_defaults() {
        let cfg = Config::load_with_env(MISSING, |_| None).unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.environment, "production");
        assert!(!cfg.is_development());
        assert_eq!(cfg.http.max_body_size, 10_485_760);
        assert_eq!(cfg.rate_limit.window_secs, 900);
        assert_eq!(cfg.rate_limit.max_requests, 3);
        assert_eq!(cfg.mail.host, "smtp.gmail.com");
        assert_eq!(cfg.mail.port, 587);
        assert_eq!(cfg.mail.from, "noreply@wmeagency.com");
        assert_eq!(cfg.mail.to, "contact@wmeagency.com");
        assert!(cfg.mail.credentials().is_none());
        assert_eq!(cfg.static_files.index_file, "index.html");
    }

    #[test]
    fn test_plain_env_overrides() {
        let cfg = Config::load_with_env(MISSING, |key| match key {
            "PORT" => Some("8081".to_string()),
            "NODE_ENV" => Some("development".to_string()),
            "SMTP_HOST" => Some("mail.example.com".to_string()),
            "SMTP_PORT" => Some("2525".to_string()),
            "SMTP_USER" => Some("relay".to_string()),
            "SMTP_PASS" => Some("secret".to_string()),
            "TO_EMAIL" => Some("inbox@example.com".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(cfg.server.port, 8081);
        assert!(cfg.is_development());
        assert_eq!(cfg.mail.host, "mail.example.com");
        assert_eq!(cfg.mail.port, 2525);
        assert_eq!(cfg.mail.credentials(), Some(("relay", "secret")));
        assert_eq!(cfg.mail.to, "inbox@example.com");
        assert_eq!(cfg.mail.from, "noreply@wmeagency.com");
    }

    #[test]
    fn test_credentials_require_both_parts() {
        let cfg = Config::load_with_env(MISSING, |key| match key {
            "SMTP_USER" => Some("relay".to_string()),
            "SMTP_PASS" => Some(String::new()),
            _ => None,
        })
        .unwrap();
        assert!(cfg.mail.credentials().is_none());
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::load_with_env(MISSING, |key| {
            (key == "PORT").then(|| "4000".to_string())
        })
        .unwrap();
        let addr = cfg.get_socket_addr().unwrap();
        assert_eq!(addr.port(), 4000);
    }
}
