use crate::url::strip_http_scheme;
use std::fmt;

/// Maps a URL to the key used to decide whether two URLs name the same page
///
/// Implementations must be idempotent: `key(key(x)) == key(x)`.
pub trait UrlNormalizer: Send + Sync + fmt::Debug {
    fn key(&self, url: &str) -> String;
}

/// Default normalization policy
///
/// Strips the `http://`/`https://` prefix, lowercases the host and drops any
/// leading `www.` labels. Path and query are kept as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemeHostNormalizer;

impl UrlNormalizer for SchemeHostNormalizer {
    fn key(&self, url: &str) -> String {
        normalize_url(url)
    }
}

/// Normalizes a URL according to the default policy
///
/// The single pass is repeated until it stops changing the input, which makes
/// the result a fixpoint even for odd inputs such as `https://www.http://x`.
///
/// # Examples
///
/// ```
/// use site_mapper::url::normalize_url;
///
/// assert_eq!(normalize_url("https://WWW.Example.com/About"), "example.com/About");
/// assert_eq!(normalize_url("example.com/about"), "example.com/about");
/// ```
pub fn normalize_url(url: &str) -> String {
    let mut current = url.trim().to_string();
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_once(url: &str) -> String {
    let mut rest = url;
    while let Some(stripped) = strip_http_scheme(rest) {
        rest = stripped;
    }

    let (host, tail) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };

    let mut host = host.to_ascii_lowercase();
    while let Some(stripped) = host.strip_prefix("www.") {
        host = stripped.to_string();
    }

    format!("{}{}", host, tail)
}
