//! Site-Mapper: a concurrent single-domain site mapper
//!
//! This crate crawls one web domain, visits every reachable page exactly once
//! using a bounded pool of workers, and produces a map from each visited page
//! to the resources it references.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Mapper operations
#[derive(Debug, Error)]
pub enum SiteMapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Failed to write report to {path}: {source}")]
    Report {
        path: String,
        source: std::io::Error,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown visit mode '{0}' (expected LINK or ASSET)")]
    UnknownMode(String),

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),
}

/// Errors raised while fetching a single page
///
/// These are never fatal to a crawl: the worker logs them and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

/// Result type alias for Site-Mapper operations
pub type Result<T> = std::result::Result<T, SiteMapError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, VisitMode};
pub use crawler::{crawl, CrawlReport, Crawler};
pub use output::CrawlStats;
pub use url::{Domain, SameDomainVerifier, SchemeHostNormalizer, UrlNormalizer, UrlVerifier};
