//! Cross-cutting response headers
//!
//! Security headers applied to every response (no Content-Security-Policy, so
//! pages may pull assets from third-party hosts) and permissive CORS.

use hyper::header::{HeaderMap, HeaderName, HeaderValue};

const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "cross-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", "max-age=15552000; includeSubDomains"),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

const ALLOWED_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

pub fn apply_security_headers(headers: &mut HeaderMap) {
    for (name, value) in SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
}

/// Allow any origin
pub fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(
        "access-control-allow-origin",
        HeaderValue::from_static("*"),
    );
}

/// Preflight answer: allowed methods, echoing the headers the client asked for
pub fn apply_preflight(headers: &mut HeaderMap, requested_headers: Option<&HeaderValue>) {
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    if let Some(requested) = requested_headers {
        headers.insert("access-control-allow-headers", requested.clone());
        headers.append("vary", HeaderValue::from_static("Access-Control-Request-Headers"));
    }
}
