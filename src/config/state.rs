// Application state module
// Shared components built once from the loaded configuration

use std::sync::Arc;

use super::types::Config;
use crate::mail::{self, Mailer};
use crate::rate_limit::{RateLimitConfig, RateLimiter};

/// Application state
pub struct AppState {
    pub config: Config,
    /// Limiter guarding the contact endpoint
    pub contact_limiter: RateLimiter,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Build state with the production clock and the mailer selected from config
    pub fn new(config: &Config) -> Result<Self, mail::MailError> {
        let mailer = mail::mailer_from_config(&config.mail)?;
        let limiter = RateLimiter::new(RateLimitConfig::from_settings(&config.rate_limit));
        Ok(Self::with_components(config, limiter, mailer))
    }

    /// Build state from explicit components
    pub fn with_components(config: &Config, contact_limiter: RateLimiter, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            config: config.clone(),
            contact_limiter,
            mailer,
        }
    }
}
