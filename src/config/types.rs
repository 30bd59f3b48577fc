use crate::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Main configuration structure for Site-Mapper
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of worker tasks fetching at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Timeout for a single page fetch (seconds)
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Timeout for establishing a connection (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Number of pages the visited filter is sized for
    #[serde(rename = "expected-pages", default = "default_expected_pages")]
    pub expected_pages: usize,

    /// Target false-positive rate of the visited filter
    #[serde(rename = "false-positive-rate", default = "default_false_positive_rate")]
    pub false_positive_rate: f64,

    /// Visit mode name (LINK or ASSET)
    #[serde(default = "default_mode")]
    pub mode: String,
}

impl CrawlerConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            fetch_timeout_secs: default_fetch_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            expected_pages: default_expected_pages(),
            false_positive_rate: default_false_positive_rate(),
            mode: default_mode(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
        }
    }
}

/// Which visit strategy workers run on fetched pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitMode {
    /// Follow navigable links and record them
    #[default]
    Link,
    /// Record non-navigable assets without following anything
    Asset,
}

impl FromStr for VisitMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LINK" => Ok(Self::Link),
            "ASSET" => Ok(Self::Asset),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for VisitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link => write!(f, "LINK"),
            Self::Asset => write!(f, "ASSET"),
        }
    }
}

fn default_concurrency() -> usize {
    10
}

fn default_fetch_timeout() -> u64 {
    60
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_expected_pages() -> usize {
    1000
}

fn default_false_positive_rate() -> f64 {
    0.03
}

fn default_mode() -> String {
    VisitMode::Link.to_string()
}

fn default_crawler_name() -> String {
    "site-mapper".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
