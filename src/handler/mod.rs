//! Request handler module
//!
//! Responsible for request routing dispatch: the JSON API under `/api`,
//! static assets and the single-page-app fallback for everything else.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
