//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from specific business logic.

pub mod body;
pub mod cache;
pub mod compress;
pub mod headers;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_304_response, build_404_response, build_413_response, build_500_response,
    build_cached_response, build_options_response, failure_response, json_response, Failure,
    HttpResponse,
};
