//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: preflight and body-size checks,
//! dispatch to the API or static files, the catch-all error response, and
//! the response decoration every request gets (security headers, CORS,
//! compression, access log).

use crate::api;
use crate::config::AppState;
use crate::error::AppError;
use crate::handler::static_files;
use crate::http::{self, body, compress, headers, HttpResponse};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{
    HeaderMap, HeaderValue, ACCEPT_ENCODING, ACCESS_CONTROL_REQUEST_HEADERS, CONTENT_LENGTH,
    IF_NONE_MATCH, REFERER, USER_AGENT,
};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;

/// Request details needed after the request itself has been consumed
struct RequestContext {
    method: Method,
    uri: String,
    version: Version,
    client: IpAddr,
    accept_encoding: Option<String>,
    requested_headers: Option<HeaderValue>,
    referer: Option<String>,
    user_agent: Option<String>,
    started: Instant,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer: SocketAddr,
) -> Result<HttpResponse, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let client = client_ip(
        req.headers(),
        peer,
        state.config.rate_limit.trust_forwarded_for,
    );
    let ctx = RequestContext {
        method: req.method().clone(),
        uri: req.uri().to_string(),
        version: req.version(),
        client,
        accept_encoding: header_string(req.headers(), &ACCEPT_ENCODING),
        requested_headers: req.headers().get(ACCESS_CONTROL_REQUEST_HEADERS).cloned(),
        referer: header_string(req.headers(), &REFERER),
        user_agent: header_string(req.headers(), &USER_AGENT),
        started: Instant::now(),
    };

    let response = if ctx.method == Method::OPTIONS {
        let mut resp = http::build_options_response();
        headers::apply_preflight(resp.headers_mut(), ctx.requested_headers.as_ref());
        resp
    } else if let Some(resp) = check_body_size(req.headers(), state.config.http.max_body_size) {
        resp
    } else {
        match route_request(req, &state, client).await {
            Ok(resp) => resp,
            Err(e) => error_response(&e, state.config.is_development()),
        }
    };

    let response = finalize_response(response, &ctx, &state).await;

    if state.config.logging.access_log {
        log_access(&ctx, &response, &state.config.logging.access_log_format);
    }
    Ok(response)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<HttpResponse> {
    match body::declared_length(headers) {
        Some(size) if size > max_body_size => {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response())
        }
        _ => None,
    }
}

/// Route request to the API or to static content
async fn route_request<B>(
    req: Request<B>,
    state: &AppState,
    client: IpAddr,
) -> Result<HttpResponse, AppError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let path = req.uri().path();

    if api::is_api_path(path) {
        return api::handle_api(req, state, client).await;
    }

    match *req.method() {
        Method::GET | Method::HEAD => {
            let if_none_match = header_string(req.headers(), &IF_NONE_MATCH);
            static_files::serve(&state.config.static_files, path, if_none_match.as_deref()).await
        }
        _ => Ok(http::build_404_response()),
    }
}

/// Catch-all error handler; detail is exposed only in development
fn error_response(err: &AppError, development: bool) -> HttpResponse {
    if let AppError::PayloadTooLarge { .. } = err {
        logger::log_warning(&err.to_string());
        return http::build_413_response();
    }

    logger::log_error(&err.to_string());
    let detail = err.to_string();
    http::build_500_response(development.then_some(detail.as_str()))
}

/// Apply the cross-cutting headers, compression and HEAD body stripping
async fn finalize_response(
    mut resp: HttpResponse,
    ctx: &RequestContext,
    state: &AppState,
) -> HttpResponse {
    headers::apply_security_headers(resp.headers_mut());
    headers::apply_cors(resp.headers_mut());

    if ctx.method == Method::HEAD {
        let (parts, _) = resp.into_parts();
        return Response::from_parts(parts, Full::new(Bytes::new()));
    }

    if state.config.http.compression {
        resp = compress::compress_response(
            resp,
            ctx.accept_encoding.as_deref(),
            state.config.http.compression_threshold,
        )
        .await;
    }
    resp
}

fn log_access(ctx: &RequestContext, resp: &HttpResponse, format: &str) {
    let mut entry = AccessLogEntry::new(ctx.client.to_string(), ctx.method.to_string(), ctx.uri.clone());
    entry.http_version = version_label(ctx.version).to_string();
    entry.status = resp.status().as_u16();
    entry.content_length = resp
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());
    entry.referer.clone_from(&ctx.referer);
    entry.user_agent.clone_from(&ctx.user_agent);
    entry.response_time_us = u64::try_from(ctx.started.elapsed().as_micros()).unwrap_or(u64::MAX);
    logger::log_access(&entry, format);
}

/// Client address used for rate limiting and logging
fn client_ip(headers: &HeaderMap, peer: SocketAddr, trust_forwarded_for: bool) -> IpAddr {
    let forwarded = trust_forwarded_for
        .then(|| header_string(headers, "x-forwarded-for"))
        .flatten()
        .and_then(|v| v.split(',').next().and_then(|ip| ip.trim().parse::<IpAddr>().ok()));

    forwarded.unwrap_or_else(|| peer.ip()).to_canonical()
}

fn header_string<K: hyper::header::AsHeaderName>(headers: &HeaderMap, name: K) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2.0",
        Version::HTTP_3 => "3.0",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::mail::testing::RecordingMailer;
    use crate::rate_limit::{RateLimitConfig, RateLimiter};
    use flate2::read::GzDecoder;
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use std::io::Read;
    use tempfile::TempDir;

    const PEER: &str = "198.51.100.4:50000";

    struct Fixture {
        _dir: TempDir,
        state: Arc<AppState>,
    }

    fn fixture(env: &[(&str, &str)]) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>spa</html>").unwrap();
        std::fs::write(dir.path().join("app.js"), "x".repeat(4096)).unwrap();

        let mut config = Config::load_with_env("tests/no-such-config", |key| {
            env.iter().find(|(k, _)| *k == key).map(|(_, v)| (*v).to_string())
        })
        .unwrap();
        config.static_files.root = dir.path().to_string_lossy().into_owned();
        config.logging.access_log = false;

        let limiter = RateLimiter::new(RateLimitConfig::from_settings(&config.rate_limit));
        let state = AppState::with_components(&config, limiter, Arc::new(RecordingMailer::default()));
        Fixture {
            _dir: dir,
            state: Arc::new(state),
        }
    }

    async fn call(fx: &Fixture, req: Request<Full<Bytes>>) -> HttpResponse {
        handle_request(req, Arc::clone(&fx.state), PEER.parse().unwrap())
            .await
            .unwrap()
    }

    fn get(path: &str) -> Request<Full<Bytes>> {
        Request::get(path).body(Full::new(Bytes::new())).unwrap()
    }

    async fn body_bytes(resp: HttpResponse) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_health_has_cors_and_security_headers() {
        let fx = fixture(&[]);
        let resp = call(&fx, get("/api/health")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
        assert!(!resp.headers().contains_key("content-security-policy"));
    }

    #[tokio::test]
    async fn test_unknown_api_path_is_json_404() {
        let fx = fixture(&[]);
        let resp = call(&fx, get("/api/unknown")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Route not found");
    }

    #[tokio::test]
    async fn test_spa_fallback_for_client_routes() {
        let fx = fixture(&[]);
        let resp = call(&fx, get("/expertise/music")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(&body_bytes(resp).await[..], b"<html>spa</html>");
    }

    #[tokio::test]
    async fn test_non_get_outside_api_is_404() {
        let fx = fixture(&[]);
        let req = Request::post("/about").body(Full::new(Bytes::new())).unwrap();
        let resp = call(&fx, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_preflight() {
        let fx = fixture(&[]);
        let req = Request::options("/api/contact")
            .header("origin", "https://example.com")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let resp = call(&fx, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert_eq!(resp.headers()["access-control-allow-headers"], "content-type");
        assert!(resp.headers()["access-control-allow-methods"]
            .to_str()
            .unwrap()
            .contains("POST"));
    }

    #[tokio::test]
    async fn test_declared_body_too_large() {
        let fx = fixture(&[]);
        let req = Request::post("/api/contact")
            .header("content-type", "application/json")
            .header("content-length", "20000000")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let resp = call(&fx, req).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_gzip_static_asset() {
        let fx = fixture(&[]);
        let req = Request::get("/app.js")
            .header("accept-encoding", "gzip, deflate")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let resp = call(&fx, req).await;
        assert_eq!(resp.headers()["content-encoding"], "gzip");
        let body = body_bytes(resp).await;
        let mut decoded = String::new();
        GzDecoder::new(&body[..]).read_to_string(&mut decoded).unwrap();
        assert_eq!(decoded.len(), 4096);
    }

    #[tokio::test]
    async fn test_head_strips_body() {
        let fx = fixture(&[]);
        let req = Request::head("/api/content/expertise")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let resp = call(&fx, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_ne!(resp.headers()["content-length"], "0");
        assert!(body_bytes(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_rate_limit_through_pipeline() {
        let fx = fixture(&[]);
        let contact = || {
            Request::post("/api/contact")
                .header("content-type", "application/json")
                .body(Full::new(Bytes::from_static(
                    br#"{"name":"Ada","email":"ada@example.com","message":"Hi"}"#,
                )))
                .unwrap()
        };
        for _ in 0..3 {
            assert_eq!(call(&fx, contact()).await.status(), StatusCode::OK);
        }
        assert_eq!(call(&fx, contact()).await.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_error_detail_only_in_development() {
        let err = AppError::Body("connection reset".to_string());
        let prod = error_response(&err, false);
        let dev = error_response(&err, true);
        assert_eq!(prod.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(dev.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let prod: serde_json::Value =
            serde_json::from_slice(&rt.block_on(body_bytes(prod))).unwrap();
        let dev: serde_json::Value = serde_json::from_slice(&rt.block_on(body_bytes(dev))).unwrap();
        assert_eq!(prod["error"], "Internal server error");
        assert_eq!(dev["error"], "Failed to read request body: connection reset");
    }

    #[test]
    fn test_client_ip() {
        let peer: SocketAddr = "[::ffff:192.0.2.1]:443".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));

        assert_eq!(client_ip(&headers, peer, false), "192.0.2.1".parse::<IpAddr>().unwrap());
        assert_eq!(client_ip(&headers, peer, true), "203.0.113.7".parse::<IpAddr>().unwrap());

        headers.insert("x-forwarded-for", HeaderValue::from_static("garbage"));
        assert_eq!(client_ip(&headers, peer, true), "192.0.2.1".parse::<IpAddr>().unwrap());
    }
}
