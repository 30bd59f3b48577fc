//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end. Scenarios that need literal
//! `example.com` URLs run against an in-memory fetcher instead.

use async_trait::async_trait;
use site_mapper::config::{Config, CrawlerConfig};
use site_mapper::crawler::{crawl, CrawlReport, Crawler, PageFetcher};
use site_mapper::output::write_report;
use site_mapper::url::Scope;
use site_mapper::{
    FetchError, SameDomainVerifier, SchemeHostNormalizer, UrlNormalizer, UrlVerifier, VisitMode,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Upper bound on any crawl in this file
const CRAWL_DEADLINE: Duration = Duration::from_secs(30);

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(format!("<html><body>{}</body></html>", body), "text/html")
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Host and port of the mock server, which is also its normalized key
fn server_key(server: &MockServer) -> String {
    server.uri().trim_start_matches("http://").to_string()
}

fn test_config(concurrency: usize) -> Config {
    let mut config = Config::default();
    config.crawler.concurrency = concurrency;
    config.crawler.fetch_timeout_secs = 5;
    config.crawler.connect_timeout_secs = 2;
    config
}

async fn crawl_with_deadline(domain: &str, config: &Config) -> CrawlReport {
    tokio::time::timeout(CRAWL_DEADLINE, crawl(domain, config))
        .await
        .expect("crawl did not terminate")
        .expect("crawl failed")
}

/// In-memory fetcher recording how often each URL was fetched
#[derive(Default)]
struct MapFetcher {
    pages: HashMap<String, String>,
    fetches: Mutex<HashMap<String, usize>>,
}

impl MapFetcher {
    fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    fn fetch_count(&self, url: &str) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .get(url)
            .copied()
            .unwrap_or(0)
    }

    fn fetched_urls(&self) -> Vec<String> {
        self.fetches.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl PageFetcher for MapFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        *self
            .fetches
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_insert(0) += 1;

        // Let other workers interleave
        tokio::task::yield_now().await;

        self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

async fn crawl_in_memory(fetcher: Arc<MapFetcher>, config: &CrawlerConfig) -> CrawlReport {
    let crawler = Crawler::new("example.com", config, fetcher).unwrap();
    tokio::time::timeout(CRAWL_DEADLINE, crawler.run())
        .await
        .expect("crawl did not terminate")
        .unwrap()
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<a href="/about">About</a><a href="/blog">Blog</a>"#,
    )
    .await;
    mount_page(&server, "/about", r#"<a href="/">Home</a><a href="/team">Team</a>"#).await;
    mount_page(&server, "/blog", r#"<a href="/about/">About</a>"#).await;
    mount_page(&server, "/team", "<p>No links</p>").await;

    let report = crawl_with_deadline(&server.uri(), &test_config(4)).await;
    let key = server_key(&server);
    let base = server.uri();

    assert_eq!(report.pages.len(), 4);
    assert_eq!(
        report.pages[&key],
        vec![format!("{}/about", base), format!("{}/blog", base)]
    );
    assert_eq!(
        report.pages[&format!("{}/about", key)],
        vec![base.clone(), format!("{}/team", base)]
    );
    assert_eq!(report.pages[&format!("{}/blog", key)], vec![format!("{}/about", base)]);
    assert!(report.pages[&format!("{}/team", key)].is_empty());

    assert_eq!(report.stats.pages_visited, 4);
    assert_eq!(report.stats.fetch_failures, 0);
}

#[tokio::test]
async fn test_each_page_fetched_once() {
    let server = MockServer::start().await;

    // Every page links to every other page
    let links: String = (0..6)
        .map(|i| format!(r#"<a href="/p{}">{}</a><a href="/p{}/">{}</a>"#, i, i, i, i))
        .collect();

    Mock::given(method("GET"))
        .respond_with(html(&links))
        .mount(&server)
        .await;

    let report = crawl_with_deadline(&server.uri(), &test_config(8)).await;

    // Seed plus six pages
    assert_eq!(report.pages.len(), 7);

    let requests = server.received_requests().await.unwrap();
    let mut paths: Vec<_> = requests.iter().map(|r| r.url.path().to_string()).collect();
    paths.sort();
    let before = paths.len();
    paths.dedup();
    assert_eq!(before, paths.len(), "a page was fetched twice");
    assert_eq!(paths.len(), 7);
}

#[tokio::test]
async fn test_off_site_links_not_followed() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<a href="http://othersite.com/page">Other</a><a href="/local">Local</a>"#,
    )
    .await;
    mount_page(&server, "/local", "<p>local</p>").await;

    let report = crawl_with_deadline(&server.uri(), &test_config(2)).await;

    assert_eq!(report.pages.len(), 2);
    assert!(report.pages.keys().all(|key| !key.contains("othersite")));
    assert_eq!(report.pages[&server_key(&server)], vec![format!("{}/local", server.uri())]);
}

#[tokio::test]
async fn test_broken_link_keeps_empty_record() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/gone">Gone</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let report = crawl_with_deadline(&server.uri(), &test_config(2)).await;

    assert_eq!(report.pages.len(), 2);
    assert!(report.pages[&format!("{}/gone", server_key(&server))].is_empty());
    assert_eq!(report.stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_non_html_page_not_parsed() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/data.json">Data</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"a": 1}"#, "application/json"))
        .mount(&server)
        .await;

    let report = crawl_with_deadline(&server.uri(), &test_config(2)).await;

    assert!(report.pages[&format!("{}/data.json", server_key(&server))].is_empty());
    assert_eq!(report.stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_asset_mode_records_seed_assets() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<img src="/logo.png"><script src="/app.js"></script><a href="/about">About</a>"#,
    )
    .await;

    let mut config = test_config(2);
    config.crawler.mode = "ASSET".to_string();
    let report = crawl_with_deadline(&server.uri(), &config).await;

    assert_eq!(report.pages.len(), 1);
    assert_eq!(
        report.pages[&server_key(&server)],
        vec![format!("{}/logo.png", server.uri()), format!("{}/app.js", server.uri())]
    );
}

#[tokio::test]
async fn test_unreachable_domain_terminates() {
    let report = crawl_with_deadline("http://127.0.0.1:1", &test_config(2)).await;

    assert_eq!(report.pages.len(), 1);
    assert!(report.pages["127.0.0.1:1"].is_empty());
    assert_eq!(report.stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_unknown_mode_fails_before_crawling() {
    let server = MockServer::start().await;
    let mut config = test_config(2);
    config.crawler.mode = "SITEMAP".to_string();

    let result = crawl(&server.uri(), &config).await;
    assert!(result.is_err());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_report_written_after_crawl() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/about">About</a>"#).await;
    mount_page(&server, "/about", "<p>About</p>").await;

    let report = crawl_with_deadline(&server.uri(), &test_config(2)).await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("map.txt");
    write_report(&report.pages, &out).unwrap();

    let key = server_key(&server);
    let expected = format!("{key}\n\t{base}/about\n\n{key}/about\n\n", key = key, base = server.uri());
    assert_eq!(std::fs::read_to_string(&out).unwrap(), expected);
}

#[tokio::test]
async fn test_duplicate_variants_visited_once() {
    let fetcher = Arc::new(
        MapFetcher::default()
            .with_page(
                "http://example.com",
                r#"<a href="http://example.com/about/">About</a>
                   <a href="http://example.com/about#section">About</a>"#,
            )
            .with_page("http://example.com/about", "<p>About</p>"),
    );

    let report = crawl_in_memory(fetcher.clone(), &CrawlerConfig::default()).await;

    assert_eq!(report.pages["example.com"], vec!["http://example.com/about"]);
    assert_eq!(fetcher.fetch_count("http://example.com/about"), 1);
    assert_eq!(report.pages.len(), 2);
}

#[tokio::test]
async fn test_othersite_never_claimed() {
    let fetcher = Arc::new(MapFetcher::default().with_page(
        "http://example.com",
        r#"<a href="http://othersite.com/page">Elsewhere</a>"#,
    ));

    let report = crawl_in_memory(fetcher.clone(), &CrawlerConfig::default()).await;

    assert_eq!(report.pages.keys().collect::<Vec<_>>(), vec!["example.com"]);
    assert!(report.pages["example.com"].is_empty());
    assert_eq!(fetcher.fetched_urls(), vec!["http://example.com"]);
}

#[tokio::test]
async fn test_single_worker_crawls_everything() {
    let fetcher = MapFetcher::default()
        .with_page("http://example.com", r#"<a href="/a">A</a><a href="/b">B</a>"#)
        .with_page("http://example.com/a", r#"<a href="/c">C</a><a href="/b">B</a>"#)
        .with_page("http://example.com/b", r#"<a href="/a">A</a>"#)
        .with_page("http://example.com/c", r#"<a href="/">Home</a>"#);
    let fetcher = Arc::new(fetcher);

    let config = CrawlerConfig {
        concurrency: 1,
        ..CrawlerConfig::default()
    };
    let report = crawl_in_memory(fetcher.clone(), &config).await;

    assert_eq!(report.pages.len(), 4);
    for page in ["http://example.com/a", "http://example.com/b", "http://example.com/c"] {
        assert_eq!(fetcher.fetch_count(page), 1, "{}", page);
    }
}

#[tokio::test]
async fn test_mode_override_on_crawler() {
    let fetcher = Arc::new(MapFetcher::default().with_page(
        "http://example.com",
        r#"<img src="/logo.png"><a href="/about">About</a>"#,
    ));

    let crawler = Crawler::new("example.com", &CrawlerConfig::default(), fetcher.clone())
        .unwrap()
        .with_mode(VisitMode::Asset);
    let report = crawler.run().await.unwrap();

    assert_eq!(report.pages["example.com"], vec!["http://example.com/logo.png"]);
    assert_eq!(fetcher.fetch_count("http://example.com/about"), 0);
}

#[tokio::test]
async fn test_links_resolving_off_site_never_claimed() {
    let fetcher = Arc::new(MapFetcher::default().with_page(
        "http://example.com",
        r#"<a href="ftp://othersite.com/file">FTP</a>
           <a href="https:othersite.com/page">Scheme only</a>
           <a href="\\othersite.com\evil">Backslashes</a>
           <a href="/about">About</a>"#,
    ));

    let report = crawl_in_memory(fetcher.clone(), &CrawlerConfig::default()).await;

    assert_eq!(
        report.pages.keys().collect::<Vec<_>>(),
        vec!["example.com", "example.com/about"]
    );
    assert_eq!(report.pages["example.com"], vec!["http://example.com/about"]);

    let mut fetched = fetcher.fetched_urls();
    fetched.sort();
    assert_eq!(fetched, vec!["http://example.com", "http://example.com/about"]);
}

/// Default keys with the query string dropped
#[derive(Debug)]
struct IgnoreQueryNormalizer;

impl UrlNormalizer for IgnoreQueryNormalizer {
    fn key(&self, url: &str) -> String {
        let key = SchemeHostNormalizer.key(url);
        match key.find('?') {
            Some(idx) => key[..idx].to_string(),
            None => key,
        }
    }
}

#[tokio::test]
async fn test_custom_normalizer_collapses_query_variants() {
    let fetcher = Arc::new(
        MapFetcher::default()
            .with_page(
                "http://example.com",
                r#"<a href="/list?page=1">List</a><a href="/other">Other</a>"#,
            )
            .with_page("http://example.com/list?page=1", "<p>List</p>")
            .with_page("http://example.com/other", r#"<a href="/list?page=2">List</a>"#),
    );

    let crawler = Crawler::new("example.com", &CrawlerConfig::default(), fetcher.clone())
        .unwrap()
        .with_normalizer(Arc::new(IgnoreQueryNormalizer));
    let report = tokio::time::timeout(CRAWL_DEADLINE, crawler.run())
        .await
        .expect("crawl did not terminate")
        .unwrap();

    assert_eq!(
        report.pages.keys().collect::<Vec<_>>(),
        vec!["example.com", "example.com/list", "example.com/other"]
    );
    assert_eq!(
        fetcher.fetch_count("http://example.com/list?page=1")
            + fetcher.fetch_count("http://example.com/list?page=2"),
        1
    );
}

/// Same-domain rules, minus everything under `/private`
struct PublicOnlyVerifier;

impl UrlVerifier for PublicOnlyVerifier {
    fn is_in_scope(&self, candidate: &str, scope: &Scope) -> bool {
        !scope.key_of(candidate).contains("/private")
            && !candidate.starts_with("/private")
            && SameDomainVerifier.is_in_scope(candidate, scope)
    }
}

#[tokio::test]
async fn test_custom_verifier_excludes_paths() {
    let fetcher = Arc::new(
        MapFetcher::default()
            .with_page(
                "http://example.com",
                r#"<a href="/private/keys">Keys</a>
                   <a href="http://example.com/private/admin">Admin</a>
                   <a href="/public">Public</a>"#,
            )
            .with_page("http://example.com/public", r#"<a href="private/more">More</a>"#),
    );

    let crawler = Crawler::new("example.com", &CrawlerConfig::default(), fetcher.clone())
        .unwrap()
        .with_verifier(Arc::new(PublicOnlyVerifier));
    let report = tokio::time::timeout(CRAWL_DEADLINE, crawler.run())
        .await
        .expect("crawl did not terminate")
        .unwrap();

    assert_eq!(report.pages["example.com"], vec!["http://example.com/public"]);
    assert!(report.pages.keys().all(|key| !key.contains("private")));

    let mut fetched = fetcher.fetched_urls();
    fetched.sort();
    assert_eq!(fetched, vec!["http://example.com", "http://example.com/public"]);
}
