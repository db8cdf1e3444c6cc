//! Response compression
//!
//! Negotiates gzip or deflate from `Accept-Encoding` and compresses buffered
//! bodies of compressible types above a size threshold.

use flate2::write::{DeflateEncoder, GzEncoder};
use flate2::Compression;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CACHE_CONTROL, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, VARY};
use hyper::{Response, StatusCode};
use std::io::Write;

use super::mime;
use super::response::HttpResponse;
use crate::logger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Gzip,
    Deflate,
}

impl Encoding {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Deflate => "deflate",
        }
    }

    fn encode(self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        match self {
            Self::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(data)?;
                encoder.finish()
            }
            Self::Deflate => {
                let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(data)?;
                encoder.finish()
            }
        }
    }
}

/// Pick the preferred supported coding; gzip wins ties
pub fn negotiate(accept_encoding: Option<&str>) -> Option<Encoding> {
    let mut best: Option<(Encoding, f32)> = None;

    for item in accept_encoding?.split(',') {
        let mut parts = item.split(';').map(str::trim);
        let coding = parts.next().unwrap_or_default().to_ascii_lowercase();
        let quality = parts
            .find_map(|p| p.strip_prefix("q="))
            .and_then(|q| q.parse::<f32>().ok())
            .unwrap_or(1.0);

        let encoding = match coding.as_str() {
            "gzip" | "x-gzip" | "*" => Encoding::Gzip,
            "deflate" => Encoding::Deflate,
            _ => continue,
        };
        if quality <= 0.0 {
            continue;
        }

        let better = match best {
            None => true,
            Some((current, q)) => {
                quality > q || (quality == q && encoding == Encoding::Gzip && current != Encoding::Gzip)
            }
        };
        if better {
            best = Some((encoding, quality));
        }
    }

    best.map(|(encoding, _)| encoding)
}

/// Compress `resp` when the client accepts it and the body qualifies
pub async fn compress_response(
    resp: HttpResponse,
    accept_encoding: Option<&str>,
    threshold: usize,
) -> HttpResponse {
    let (mut parts, body) = resp.into_parts();

    let compressible = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(mime::is_compressible);
    let no_transform = parts
        .headers
        .get(CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("no-transform"));

    if !compressible
        || no_transform
        || parts.headers.contains_key(CONTENT_ENCODING)
        || matches!(parts.status, StatusCode::NO_CONTENT | StatusCode::NOT_MODIFIED)
    {
        return Response::from_parts(parts, body);
    }

    parts.headers.append(VARY, HeaderValue::from_static("Accept-Encoding"));

    let Some(encoding) = negotiate(accept_encoding) else {
        return Response::from_parts(parts, body);
    };

    let data = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(never) => match never {},
    };
    if data.len() < threshold {
        return Response::from_parts(parts, Full::new(data));
    }

    match encoding.encode(&data) {
        Ok(compressed) => {
            parts
                .headers
                .insert(CONTENT_ENCODING, HeaderValue::from_static(encoding.as_str()));
            parts.headers.insert(CONTENT_LENGTH, HeaderValue::from(compressed.len()));
            Response::from_parts(parts, Full::new(Bytes::from(compressed)))
        }
        Err(e) => {
            logger::log_warning(&format!("{} compression failed, sending identity: {e}", encoding.as_str()));
            Response::from_parts(parts, Full::new(data))
        }
    }
}
