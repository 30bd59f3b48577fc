//! State module for tracking crawl progress
//!
//! This module provides the state a crawl run mutates under the coordinator's lock.
//!
//! # Components
//!
//! - `VisitedSet`: Bloom filter plus page record map, the at-most-once guard
//! - `CrawlState`: Frontier, visited set and outstanding-worker bookkeeping
//! - `NextStep`: The dispatch loop transition chosen from the current state

mod crawl_state;
mod visited;

// Re-export main types
pub use crawl_state::{CrawlState, NextStep};
pub use visited::{PageRecords, VisitedSet};
