//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `PageFetcher` seam
//! - HTML parsing and reference extraction
//! - Visit strategies (follow links or collect assets)
//! - The coordinator, its worker pool and termination protocol

mod coordinator;
mod fetcher;
mod parser;
mod pool;
mod strategy;
mod worker;

pub use coordinator::{Coordinator, WorkerTicket};
pub use fetcher::{build_http_client, fetch_url, HttpFetcher, PageFetcher};
pub use parser::{extract_anchor_targets, extract_asset_references};
pub use pool::WorkerPool;
pub use strategy::{Extraction, VisitStrategy};
pub use worker::{VisitOutcome, Visitor};

use crate::config::{parse_mode, validate, validate_crawler_config, Config, CrawlerConfig, VisitMode};
use crate::output::CrawlStats;
use crate::url::{Domain, SameDomainVerifier, SchemeHostNormalizer, Scope, UrlNormalizer, UrlVerifier};
use crate::ConfigError;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Final result of a crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Normalized page key to its recorded references, sorted by key
    pub pages: BTreeMap<String, Vec<String>>,

    pub stats: CrawlStats,
}

/// A configured, not yet started crawl of one domain
pub struct Crawler {
    domain: Domain,
    config: CrawlerConfig,
    mode: VisitMode,
    fetcher: Arc<dyn PageFetcher>,
    normalizer: Arc<dyn UrlNormalizer>,
    verifier: Arc<dyn UrlVerifier>,
}

impl Crawler {
    /// Creates a crawler with the default normalizer and verifier
    ///
    /// The mode is taken from `config.mode`.
    ///
    /// # Errors
    ///
    /// * `ConfigError::InvalidDomain` - The domain is not a usable URL
    /// * `ConfigError::UnknownMode` - The mode is neither LINK nor ASSET
    /// * `ConfigError::Validation` - Any other invalid crawler setting
    pub fn new(
        domain: &str,
        config: &CrawlerConfig,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Result<Self, ConfigError> {
        validate_crawler_config(config)?;

        Ok(Self {
            domain: Domain::parse(domain)?,
            config: config.clone(),
            mode: parse_mode(&config.mode)?,
            fetcher,
            normalizer: Arc::new(SchemeHostNormalizer),
            verifier: Arc::new(SameDomainVerifier),
        })
    }

    pub fn with_mode(mut self, mode: VisitMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_normalizer(mut self, normalizer: Arc<dyn UrlNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn UrlVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn mode(&self) -> VisitMode {
        self.mode
    }

    /// Crawls the domain to completion
    pub async fn run(self) -> crate::Result<CrawlReport> {
        let scope = Arc::new(Scope::new(self.domain, self.normalizer));
        let coordinator = Arc::new(Coordinator::new(scope, &self.config)?);
        let pool = WorkerPool::new(self.config.concurrency);
        let visitor = Arc::new(Visitor::new(
            self.fetcher,
            self.verifier,
            VisitStrategy::from(self.mode),
        ));

        tracing::debug!("Visit strategy: {:?}", visitor.strategy());

        let stats = coordinator.run(&pool, &visitor).await;
        let pages = coordinator.take_records().into_iter().collect();

        Ok(CrawlReport { pages, stats })
    }
}

/// Runs a complete crawl over HTTP
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration
/// 2. Build the HTTP client
/// 3. Seed the frontier with the domain
/// 4. Visit every reachable in-scope page exactly once
/// 5. Return the page map and run statistics
///
/// # Arguments
///
/// * `domain` - The crawl root, with or without a scheme
/// * `config` - The crawler configuration
///
/// # Example
///
/// ```no_run
/// use site_mapper::config::Config;
/// use site_mapper::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = crawl("example.com", &Config::default()).await?;
/// println!("{} pages", report.pages.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(domain: &str, config: &Config) -> crate::Result<CrawlReport> {
    validate(config)?;
    let fetcher = Arc::new(HttpFetcher::new(config)?);
    Crawler::new(domain, &config.crawler, fetcher)?.run().await
}
