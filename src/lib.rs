//! WME Agency site server
//!
//! Serves the marketing site's static build with a single-page-app fallback,
//! plus a small JSON API: health, static content and the rate-limited contact form.

pub mod api;
pub mod config;
pub mod contact;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod mail;
pub mod rate_limit;
pub mod server;
