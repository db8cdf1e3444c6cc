//! HTTP cache validation module
//!
//! Weak `ETag` generation from file size and content, and `If-None-Match` checks.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Generate a weak `ETag` such as `W/"1f-3a9c0e..."`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("W/\"{:x}-{:x}\"", content.len(), hasher.finish())
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Comparison is weak: a `W/` prefix on either side is ignored. Lists and `*` are supported.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    let ours = opaque_tag(etag);
    if_none_match.is_some_and(|client| {
        client
            .split(',')
            .map(str::trim)
            .any(|tag| tag == "*" || opaque_tag(tag) == ours)
    })
}

fn opaque_tag(tag: &str) -> &str {
    tag.strip_prefix("W/").unwrap_or(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_etag() {
        let etag = generate_etag(b"hello world");
        assert!(etag.starts_with("W/\"b-"));
        assert!(etag.ends_with('"'));
        assert_eq!(etag, generate_etag(b"hello world"));
        assert_ne!(etag, generate_etag(b"hello there"));
    }

    #[test]
    fn test_check_etag_match() {
        let etag = "W/\"b-abc\"";
        assert!(check_etag_match(Some("W/\"b-abc\""), etag));
        assert!(check_etag_match(Some("\"b-abc\""), etag));
        assert!(check_etag_match(Some("\"x\", W/\"b-abc\""), etag));
        assert!(check_etag_match(Some("*"), etag));
        assert!(!check_etag_match(Some("W/\"other\""), etag));
        assert!(!check_etag_match(None, etag));
    }
}
