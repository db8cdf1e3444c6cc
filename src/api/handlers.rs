// API endpoint handlers

use chrono::{SecondsFormat, Utc};
use hyper::body::Body;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Request, StatusCode};
use std::net::IpAddr;

use super::content::{COMPANY_INFO, EXPERTISE_AREAS};
use super::types::{DataResponse, HealthResponse, MessageResponse};
use crate::config::AppState;
use crate::contact::{ContactError, ContactSubmission};
use crate::error::AppError;
use crate::http::{body, json_response, HttpResponse};
use crate::logger;
use crate::mail::ContactEmail;
use crate::rate_limit::RateLimitDecision;

pub const RATE_LIMITED_MESSAGE: &str =
    "Too many contact form submissions, please try again later.";
pub const CONTACT_THANKS_MESSAGE: &str =
    "Thank you for your message. We will get back to you soon!";
pub const CONTACT_FAILED_MESSAGE: &str =
    "Sorry, there was an error sending your message. Please try again later.";

pub fn handle_health() -> HttpResponse {
    json_response(
        StatusCode::OK,
        &HealthResponse {
            success: true,
            message: "WME Agency API is running",
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        },
    )
}

pub fn handle_expertise() -> HttpResponse {
    json_response(StatusCode::OK, &DataResponse::new(EXPERTISE_AREAS))
}

pub fn handle_company() -> HttpResponse {
    json_response(StatusCode::OK, &DataResponse::new(COMPANY_INFO))
}

/// Contact form submission, behind the per-client rate limiter
pub async fn handle_contact<B>(
    req: Request<B>,
    state: &AppState,
    client: IpAddr,
) -> Result<HttpResponse, AppError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let decision = state.contact_limiter.check(client);
    if !decision.admitted {
        logger::log_warning(&format!("Contact rate limit exceeded for {client}"));
        return Ok(with_rate_limit_headers(
            json_response(
                StatusCode::TOO_MANY_REQUESTS,
                &MessageResponse::failed(RATE_LIMITED_MESSAGE),
            ),
            decision,
        ));
    }

    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase());
    let raw = body::read_limited(req.into_body(), state.config.http.max_body_size).await?;

    let submission = match decode_submission(content_type.as_deref(), &raw) {
        Ok(submission) => submission,
        Err(e) => return Ok(with_rate_limit_headers(bad_request(&e), decision)),
    };
    let contact = match submission.validate() {
        Ok(contact) => contact,
        Err(e) => return Ok(with_rate_limit_headers(bad_request(&e), decision)),
    };

    let email = ContactEmail::compose(contact, &state.config.mail, Utc::now());
    let resp = match state.mailer.send(&email).await {
        Ok(()) => json_response(StatusCode::OK, &MessageResponse::ok(CONTACT_THANKS_MESSAGE)),
        Err(e) => {
            logger::log_error(&format!("Contact form error: {e}"));
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &MessageResponse::failed(CONTACT_FAILED_MESSAGE),
            )
        }
    };
    Ok(with_rate_limit_headers(resp, decision))
}

/// JSON and URL-encoded bodies are parsed; any other type yields an empty submission
fn decode_submission(content_type: Option<&str>, raw: &[u8]) -> Result<ContactSubmission, ContactError> {
    match content_type {
        Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => {
            Ok(ContactSubmission::from_form(raw))
        }
        Some(ct) if is_json(ct) && !raw.iter().all(u8::is_ascii_whitespace) => {
            ContactSubmission::from_json(raw)
        }
        _ => Ok(ContactSubmission::default()),
    }
}

fn is_json(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    essence == "application/json" || essence.ends_with("+json")
}

fn bad_request(err: &ContactError) -> HttpResponse {
    json_response(
        StatusCode::BAD_REQUEST,
        &MessageResponse::failed(&err.to_string()),
    )
}

fn with_rate_limit_headers(mut resp: HttpResponse, decision: RateLimitDecision) -> HttpResponse {
    let headers = resp.headers_mut();
    headers.insert("ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("ratelimit-remaining", HeaderValue::from(decision.remaining));
    resp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_by_content_type() {
        let json = br#"{"name":"Ada"}"#;
        let decoded = decode_submission(Some("application/json; charset=utf-8"), json).unwrap();
        assert_eq!(decoded.name.as_deref(), Some("Ada"));

        let decoded =
            decode_submission(Some("application/x-www-form-urlencoded"), b"name=Ada").unwrap();
        assert_eq!(decoded.name.as_deref(), Some("Ada"));

        assert_eq!(
            decode_submission(Some("text/plain"), json).unwrap(),
            ContactSubmission::default()
        );
        assert_eq!(
            decode_submission(None, json).unwrap(),
            ContactSubmission::default()
        );
        assert_eq!(
            decode_submission(Some("application/json"), b"  ").unwrap(),
            ContactSubmission::default()
        );
        assert_eq!(
            decode_submission(Some("application/json"), b"{oops"),
            Err(ContactError::MalformedBody)
        );
    }
}
