//! Contact form submissions
//!
//! Decoding and validation of the untrusted contact form body.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Validation failures, all reported to the caller as 400
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    #[error("Name, email, and message are required.")]
    MissingFields,

    #[error("Please provide a valid email address.")]
    InvalidEmail,

    #[error("Invalid request body.")]
    MalformedBody,
}

/// A contact form submission as received
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub expertise: Option<String>,
}

/// A submission that passed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidContact {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: String,
    pub expertise: Option<String>,
}

impl ContactSubmission {
    /// Decode a JSON body
    ///
    /// Only an object carries fields; an array decodes as an empty submission.
    pub fn from_json(body: &[u8]) -> Result<Self, ContactError> {
        match serde_json::from_slice(body).map_err(|_| ContactError::MalformedBody)? {
            value @ serde_json::Value::Object(_) => {
                serde_json::from_value(value).map_err(|_| ContactError::MalformedBody)
            }
            serde_json::Value::Array(_) => Ok(Self::default()),
            _ => Err(ContactError::MalformedBody),
        }
    }

    /// Decode an `application/x-www-form-urlencoded` body
    pub fn from_form(body: &[u8]) -> Self {
        let mut submission = Self::default();
        for (key, value) in url::form_urlencoded::parse(body) {
            let slot = match key.as_ref() {
                "name" => &mut submission.name,
                "email" => &mut submission.email,
                "company" => &mut submission.company,
                "message" => &mut submission.message,
                "expertise" => &mut submission.expertise,
                _ => continue,
            };
            *slot = Some(value.into_owned());
        }
        submission
    }

    /// Check required fields first, then the email shape
    pub fn validate(self) -> Result<ValidContact, ContactError> {
        let (Some(name), Some(email), Some(message)) = (
            present(self.name),
            present(self.email),
            present(self.message),
        ) else {
            return Err(ContactError::MissingFields);
        };

        if !is_valid_email(&email) {
            return Err(ContactError::InvalidEmail);
        }

        Ok(ValidContact {
            name,
            email,
            company: non_empty(self.company),
            message,
            expertise: non_empty(self.expertise),
        })
    }
}

/// `local@domain.tld` with no whitespace and a single `@`
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

// Required fields only need to be non-empty; whitespace counts as a value
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
