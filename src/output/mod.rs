//! Output module for crawl results
//!
//! This module handles:
//! - Writing the page map report file
//! - Recording and printing crawl statistics

mod report;
pub mod stats;

pub use report::{render_report, write_report};
pub use stats::{print_statistics, CrawlStats};
