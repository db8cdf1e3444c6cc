// API module entry
// JSON endpoints mounted under /api

mod content;
mod handlers;
mod types;

use hyper::body::Body;
use hyper::{Method, Request};
use std::net::IpAddr;

use crate::config::AppState;
use crate::error::AppError;
use crate::http::{self, HttpResponse};

pub use content::{CompanyInfo, ExpertiseArea, SocialLinks, COMPANY_INFO, EXPERTISE_AREAS};
pub use handlers::{CONTACT_FAILED_MESSAGE, CONTACT_THANKS_MESSAGE, RATE_LIMITED_MESSAGE};

/// Path prefix the API is mounted on
pub const API_PREFIX: &str = "/api";

/// Whether `path` belongs to the API mount; matching ignores ASCII case
pub fn is_api_path(path: &str) -> bool {
    strip_api_prefix(path).is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn strip_api_prefix(path: &str) -> Option<&str> {
    let head = path.get(..API_PREFIX.len())?;
    head.eq_ignore_ascii_case(API_PREFIX)
        .then(|| &path[API_PREFIX.len()..])
}

/// API route handler
///
/// Dispatches to handler functions based on request path and method
pub async fn handle_api<B>(
    req: Request<B>,
    state: &AppState,
    client: IpAddr,
) -> Result<HttpResponse, AppError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let path = req.uri().path();
    let route = strip_api_prefix(path).unwrap_or(path);
    // Neither case nor trailing slashes are significant
    let route = match route.trim_end_matches('/') {
        "" => "/".to_string(),
        trimmed => trimmed.to_ascii_lowercase(),
    };

    match (req.method(), route.as_str()) {
        (&Method::GET | &Method::HEAD, "/health") => Ok(handlers::handle_health()),
        (&Method::POST, "/contact") => handlers::handle_contact(req, state, client).await,
        (&Method::GET | &Method::HEAD, "/content/expertise") => Ok(handlers::handle_expertise()),
        (&Method::GET | &Method::HEAD, "/content/company") => Ok(handlers::handle_company()),
        _ => Ok(http::build_404_response()),
    }
}
