//! HTTP response building module
//!
//! Builders for the JSON payloads and static-file responses the server sends.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Response body type used throughout the server
pub type HttpResponse = Response<Full<Bytes>>;

/// `{success:false, message}` payload shared by every failure response
#[derive(Debug, Serialize)]
pub struct Failure<'a> {
    pub success: bool,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

impl<'a> Failure<'a> {
    pub const fn new(message: &'a str) -> Self {
        Self {
            success: false,
            message,
            error: None,
        }
    }
}

/// Build JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    let json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            return raw_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                Bytes::from_static(
                    br#"{"success":false,"message":"Something went wrong!","error":"Internal server error"}"#,
                ),
            );
        }
    };
    raw_json(status, Bytes::from(json))
}

/// Build `{success:false, message}` response
pub fn failure_response(status: StatusCode, message: &str) -> HttpResponse {
    json_response(status, &Failure::new(message))
}

/// 404 for routes nothing matched
pub fn build_404_response() -> HttpResponse {
    failure_response(StatusCode::NOT_FOUND, "Route not found")
}

/// 413 Payload Too Large response
pub fn build_413_response() -> HttpResponse {
    failure_response(StatusCode::PAYLOAD_TOO_LARGE, "Request entity too large")
}

/// Catch-all 500, with `detail` only when the caller allows it to be exposed
pub fn build_500_response(detail: Option<&str>) -> HttpResponse {
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &Failure {
            success: false,
            message: "Something went wrong!",
            error: Some(detail.unwrap_or("Internal server error")),
        },
    )
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> HttpResponse {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=0")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build OPTIONS response (preflight request); CORS headers are added by the decorator
pub fn build_options_response() -> HttpResponse {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build static file response with `ETag` revalidation
pub fn build_cached_response(data: Bytes, content_type: &str, etag: &str) -> HttpResponse {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", data.len())
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=0")
        .body(Full::new(data))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

fn raw_json(status: StatusCode, body: Bytes) -> HttpResponse {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json; charset=utf-8")
        .header("Content-Length", body.len())
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
