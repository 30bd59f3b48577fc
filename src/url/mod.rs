//! URL handling module for Site-Mapper
//!
//! This module provides URL key normalization, the crawl domain and scope,
//! and the scope verifier that decides which discovered URLs are followed.

mod normalize;
mod scope;
mod verifier;

// Re-export main types and functions
pub use normalize::{normalize_url, SchemeHostNormalizer, UrlNormalizer};
pub use scope::{Domain, Scope};
pub use verifier::{SameDomainVerifier, UrlVerifier};

const HTTP_SCHEMES: &[&str] = &["http://", "https://"];

/// Returns the input without its `http://` or `https://` prefix, if it has one
pub(crate) fn strip_http_scheme(url: &str) -> Option<&str> {
    HTTP_SCHEMES.iter().find_map(|scheme| {
        url.get(..scheme.len())
            .filter(|prefix| prefix.eq_ignore_ascii_case(scheme))
            .map(|_| &url[scheme.len()..])
    })
}

/// Returns true if the URL starts with `http://` or `https://` (any case)
pub(crate) fn has_http_scheme(url: &str) -> bool {
    strip_http_scheme(url).is_some()
}

/// Returns true if the reference starts with any URI scheme, e.g. `ftp:` or `https:`
///
/// Scheme syntax: `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"`
pub(crate) fn has_uri_scheme(url: &str) -> bool {
    match url.split_once(':') {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
