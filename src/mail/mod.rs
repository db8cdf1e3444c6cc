//! Contact email delivery
//!
//! The [`Mailer`] capability is picked once at startup: an SMTP relay when
//! credentials are configured, otherwise a mailer that only logs the
//! submission.

mod message;
mod smtp;

pub use message::ContactEmail;
pub use smtp::SmtpMailer;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::MailConfig;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Short name for startup logging
    fn kind(&self) -> &'static str;

    async fn send(&self, email: &ContactEmail) -> Result<(), MailError>;
}

/// Writes the submission to the log instead of delivering it
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    fn kind(&self) -> &'static str {
        "log"
    }

    async fn send(&self, email: &ContactEmail) -> Result<(), MailError> {
        let contact = &email.contact;
        tracing::info!(
            name = %contact.name,
            email = %contact.email,
            company = contact.company.as_deref().unwrap_or("-"),
            expertise = contact.expertise.as_deref().unwrap_or("-"),
            message = %contact.message,
            "Contact form submission (email not configured)"
        );
        Ok(())
    }
}

/// Pick the SMTP relay when both user and secret are present, else log only
pub fn mailer_from_config(config: &MailConfig) -> Result<Arc<dyn Mailer>, MailError> {
    match config.credentials() {
        Some((user, pass)) => Ok(Arc::new(SmtpMailer::new(&config.host, config.port, user, pass)?)),
        None => Ok(Arc::new(LogMailer)),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records every message it is asked to send, optionally failing
    #[derive(Default)]
    pub(crate) struct RecordingMailer {
        pub(crate) sent: Mutex<Vec<ContactEmail>>,
        pub(crate) fail: bool,
    }

    impl RecordingMailer {
        pub(crate) fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub(crate) fn sent_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        fn kind(&self) -> &'static str {
            "recording"
        }

        async fn send(&self, email: &ContactEmail) -> Result<(), MailError> {
            self.sent.lock().unwrap().push(email.clone());
            if self.fail {
                let err: lettre::address::AddressError = "not-an-address"
                    .parse::<lettre::Address>()
                    .unwrap_err();
                return Err(err.into());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::ValidContact;

    fn config(user: Option<&str>, pass: Option<&str>) -> MailConfig {
        MailConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            user: user.map(ToString::to_string),
            pass: pass.map(ToString::to_string),
            from: "noreply@wmeagency.com".to_string(),
            to: "contact@wmeagency.com".to_string(),
        }
    }

    #[test]
    fn test_log_mailer_without_credentials() {
        assert_eq!(mailer_from_config(&config(None, None)).unwrap().kind(), "log");
        assert_eq!(mailer_from_config(&config(Some("user"), None)).unwrap().kind(), "log");
        assert_eq!(mailer_from_config(&config(None, Some("pass"))).unwrap().kind(), "log");
    }

    #[tokio::test]
    async fn test_smtp_mailer_with_credentials() {
        let mailer = mailer_from_config(&config(Some("user"), Some("pass"))).unwrap();
        assert_eq!(mailer.kind(), "smtp");
    }

    #[tokio::test]
    async fn test_log_mailer_send_succeeds() {
        let contact = ValidContact {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            company: None,
            message: "Hello".to_string(),
            expertise: None,
        };
        let email = ContactEmail::compose(contact, &config(None, None), chrono::Utc::now());
        assert!(LogMailer.send(&email).await.is_ok());
    }
}
