use crate::url::{has_http_scheme, UrlNormalizer};
use crate::ConfigError;
use std::sync::Arc;
use url::Url;

/// The crawl root as given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    /// Absolute seed URL without a trailing slash
    seed: String,

    /// Base used to resolve relative references
    base: Url,
}

impl Domain {
    /// Parses a domain argument such as `example.com` or `https://example.com/blog/`
    ///
    /// A missing scheme defaults to `http://`.
    ///
    /// # Examples
    ///
    /// ```
    /// use site_mapper::url::Domain;
    ///
    /// let domain = Domain::parse("example.com/").unwrap();
    /// assert_eq!(domain.seed_url(), "http://example.com");
    /// assert_eq!(domain.resolve("/about").as_deref(), Some("http://example.com/about"));
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ConfigError::InvalidDomain("domain is empty".to_string()));
        }

        let with_scheme = if has_http_scheme(raw) {
            raw.to_string()
        } else {
            format!("http://{}", raw)
        };
        let seed = trim_trailing_slashes(&with_scheme).to_string();

        let base = Url::parse(&format!("{}/", seed))
            .map_err(|e| ConfigError::InvalidDomain(format!("'{}': {}", raw, e)))?;

        if base.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::InvalidDomain(format!("'{}' has no host", raw)));
        }

        Ok(Self { seed, base })
    }

    /// The first URL placed on the frontier
    pub fn seed_url(&self) -> &str {
        &self.seed
    }

    /// Resolves a reference against the domain
    ///
    /// Trailing slashes are trimmed from the result so `http://example.com/`
    /// and `http://example.com` resolve to the same string.
    pub fn resolve(&self, reference: &str) -> Option<String> {
        self.base
            .join(reference)
            .ok()
            .map(|url| trim_trailing_slashes(url.as_str()).to_string())
    }
}

/// Scope boundary of a crawl run: the domain plus the normalization policy
///
/// Built once per run and shared by the coordinator and every worker.
#[derive(Debug, Clone)]
pub struct Scope {
    domain: Domain,
    normalizer: Arc<dyn UrlNormalizer>,
    key: String,
    host: String,
}

impl Scope {
    pub fn new(domain: Domain, normalizer: Arc<dyn UrlNormalizer>) -> Self {
        let key = normalizer.key(domain.seed_url());
        let host = host_part(&key).to_string();
        Self {
            domain,
            normalizer,
            key,
            host,
        }
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Normalized key of the domain itself
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Normalized host of the domain, the scope boundary
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Normalized key of any URL
    pub fn key_of(&self, url: &str) -> String {
        self.normalizer.key(url)
    }

    /// Normalized host of an absolute URL
    pub fn host_of(&self, url: &str) -> String {
        host_part(&self.key_of(url)).to_string()
    }
}

fn host_part(key: &str) -> &str {
    key.split(|c: char| c == '/' || c == '?' || c == '#')
        .next()
        .unwrap_or(key)
}

fn trim_trailing_slashes(url: &str) -> &str {
    let trimmed = url.trim_end_matches('/');
    // Keep "http://" intact for degenerate inputs
    if trimmed.ends_with(':') {
        url
    } else {
        trimmed
    }
}
