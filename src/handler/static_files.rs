//! Static file serving module
//!
//! Resolves request paths inside the static root, serves files with `ETag`
//! revalidation and falls back to the single-page-app document.

use crate::config::StaticConfig;
use crate::error::AppError;
use crate::http::{self, cache, mime, HttpResponse};
use crate::logger;
use hyper::body::Bytes;
use percent_encoding::percent_decode_str;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// A file loaded from disk
#[derive(Debug)]
pub struct StaticFile {
    pub content: Bytes,
    pub content_type: &'static str,
}

/// Serve the asset at `path`, or the fallback document when there is none
pub async fn serve(
    config: &StaticConfig,
    path: &str,
    if_none_match: Option<&str>,
) -> Result<HttpResponse, AppError> {
    if let Some(file) = load_from_directory(&config.root, path, &config.index_file).await? {
        return Ok(build_static_file_response(file, if_none_match));
    }
    serve_fallback(config, if_none_match).await
}

/// Serve the single-page-app document for client-side routes
pub async fn serve_fallback(
    config: &StaticConfig,
    if_none_match: Option<&str>,
) -> Result<HttpResponse, AppError> {
    let fallback = Path::new(&config.root).join(&config.index_file);
    match load_single_file(&fallback).await? {
        Some(file) => Ok(build_static_file_response(file, if_none_match)),
        None => {
            logger::log_warning(&format!(
                "Fallback document not found: {}",
                fallback.display()
            ));
            Ok(http::build_404_response())
        }
    }
}

/// Load static file from directory with index file support
///
/// Returns `Ok(None)` for anything that should fall through to the fallback:
/// missing files, dotfiles, undecodable paths and traversal attempts.
pub async fn load_from_directory(
    static_dir: &str,
    path: &str,
    index_file: &str,
) -> Result<Option<StaticFile>, AppError> {
    let Some(relative) = sanitize_path(path) else {
        return Ok(None);
    };

    // Security: ensure file_path is within static_dir
    let static_dir_canonical = match fs::canonicalize(static_dir).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return Ok(None);
        }
    };

    let mut file_path = static_dir_canonical.join(&relative);
    if fs::metadata(&file_path).await.is_ok_and(|m| m.is_dir()) {
        file_path.push(index_file);
    }

    // File not found is common, no need to log
    let Ok(file_path_canonical) = fs::canonicalize(&file_path).await else {
        return Ok(None);
    };
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return Ok(None);
    }

    load_single_file(&file_path_canonical).await
}

/// Load a single regular file
pub async fn load_single_file(path: &Path) -> Result<Option<StaticFile>, AppError> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Ok(None),
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    match fs::read(path).await {
        Ok(content) => Ok(Some(StaticFile {
            content: Bytes::from(content),
            content_type: mime::content_type_for(path),
        })),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Decode the request path into a relative path with no `..`, dot-segments or dotfiles
fn sanitize_path(path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    if decoded.contains('\0') || decoded.contains('\\') {
        return None;
    }

    let mut relative = PathBuf::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s if s.starts_with('.') => return None,
            s => relative.push(s),
        }
    }
    Some(relative)
}

fn build_static_file_response(file: StaticFile, if_none_match: Option<&str>) -> HttpResponse {
    let etag = cache::generate_etag(&file.content);

    // Check if client has cached version
    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::build_cached_response(file.content, file.content_type, &etag)
}
