use crate::url::{has_http_scheme, has_uri_scheme, Scope};
use url::Url;

/// Schemes that never name a crawlable page
const NON_NAVIGABLE_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Decides whether a discovered URL belongs to the crawl
///
/// The link-follower asks twice: once with the cleaned href and once with the
/// absolute URL it resolves to. Only URLs accepted both times are queued.
pub trait UrlVerifier: Send + Sync {
    fn is_in_scope(&self, candidate: &str, scope: &Scope) -> bool;
}

/// Accepts relative links and absolute links on the crawl's host
///
/// # Rules
///
/// | Candidate | Result |
/// |-----------|--------|
/// | `#section` | rejected (same page) |
/// | `mailto:`, `tel:`, `javascript:`, `data:` | rejected |
/// | no scheme (`/about`, `about`) | accepted |
/// | `http(s)://`, `http(s):` or `//` | accepted iff normalized host contains the domain host |
/// | any other scheme (`ftp:`, `example.com:8080/`) | rejected |
///
/// Backslashes count as slashes, as they do when a browser resolves an
/// href against an `http` base.
#[derive(Debug, Clone, Copy, Default)]
pub struct SameDomainVerifier;

impl UrlVerifier for SameDomainVerifier {
    fn is_in_scope(&self, candidate: &str, scope: &Scope) -> bool {
        let candidate = candidate.trim();

        if candidate.starts_with('#') {
            return false;
        }

        if is_non_navigable(candidate) {
            return false;
        }

        let candidate = candidate.replace('\\', "/");

        if let Some(without_slashes) = candidate.strip_prefix("//") {
            return scope.host_of(without_slashes).contains(scope.host());
        }

        if has_http_scheme(&candidate) {
            return scope.host_of(&candidate).contains(scope.host());
        }

        if has_uri_scheme(&candidate) {
            // `https:host/path` parses with `host` as its authority
            return match Url::parse(&candidate) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {
                    scope.host_of(url.as_str()).contains(scope.host())
                }
                _ => false,
            };
        }

        true
    }
}

fn is_non_navigable(candidate: &str) -> bool {
    NON_NAVIGABLE_SCHEMES.iter().any(|scheme| {
        candidate
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
