//! Run statistics
//!
//! This module provides the aggregate numbers a crawl run returns and the
//! console summary printed by the binary.

use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Number of distinct pages claimed (fetched or attempted)
    pub pages_visited: usize,

    /// Number of worker tasks dispatched, including ones that lost the claim
    pub tasks_dispatched: usize,

    /// Claimed pages whose fetch failed
    pub fetch_failures: usize,

    /// Wall-clock time of the dispatch loop
    pub elapsed: Duration,
}

impl CrawlStats {
    /// Dispatched tasks that found their page already claimed
    pub fn duplicates_skipped(&self) -> usize {
        self.tasks_dispatched.saturating_sub(self.pages_visited)
    }

    /// Headline line, e.g. `12 pages visited in 840 ms`
    pub fn summary_line(&self) -> String {
        format!(
            "{} pages visited in {} ms",
            self.pages_visited,
            self.elapsed.as_millis()
        )
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStats) {
    println!("{}", stats.summary_line());
    println!("  Tasks dispatched: {}", stats.tasks_dispatched);
    println!("  Duplicates skipped: {}", stats.duplicates_skipped());

    if stats.fetch_failures > 0 {
        let percentage = (stats.fetch_failures as f64 / stats.pages_visited.max(1) as f64) * 100.0;
        println!(
            "  Fetch failures: {} ({:.1}%)",
            stats.fetch_failures, percentage
        );
    }
}
