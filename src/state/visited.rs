//! Two-tier visited set
//!
//! A Bloom filter answers "definitely not visited" cheaply; only a possible
//! hit falls through to the page record map, which is authoritative. A false
//! positive therefore costs one extra map lookup and never skips a page.

use crate::ConfigError;
use bloomfilter::Bloom;
use std::collections::HashMap;

/// References recorded for one visited page
pub type PageRecords = HashMap<String, Vec<String>>;

pub struct VisitedSet {
    filter: Bloom<String>,
    records: PageRecords,
}

impl VisitedSet {
    /// Creates an empty set whose filter is sized for `expected_pages` keys
    pub fn new(expected_pages: usize, false_positive_rate: f64) -> Result<Self, ConfigError> {
        let filter = Bloom::new_for_fp_rate(expected_pages, false_positive_rate).map_err(|e| {
            ConfigError::Validation(format!(
                "cannot size visited filter for {} pages at rate {}: {}",
                expected_pages, false_positive_rate, e
            ))
        })?;

        Ok(Self {
            filter,
            records: HashMap::new(),
        })
    }

    /// Probabilistic membership: never false for a claimed key
    pub fn might_contain(&self, key: &str) -> bool {
        self.filter.check(&key.to_string())
    }

    /// Authoritative membership
    pub fn contains(&self, key: &str) -> bool {
        self.might_contain(key) && self.records.contains_key(key)
    }

    /// Claims a key, creating its empty page record
    ///
    /// Returns `true` exactly once per key. The filter insert and the record
    /// insert happen together so every key in the filter is also in the map.
    pub fn claim(&mut self, key: String) -> bool {
        if self.contains(&key) {
            return false;
        }
        self.filter.set(&key);
        self.records.insert(key, Vec::new());
        true
    }

    /// Replaces the references of a claimed page
    ///
    /// Returns `false` (and records nothing) if the key was never claimed.
    pub fn record(&mut self, key: &str, references: Vec<String>) -> bool {
        match self.records.get_mut(key) {
            Some(entry) => {
                *entry = references;
                true
            }
            None => false,
        }
    }

    /// References recorded for a page, if it was claimed
    pub fn references(&self, key: &str) -> Option<&[String]> {
        self.records.get(key).map(Vec::as_slice)
    }

    /// Number of claimed pages
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Moves the page records out, leaving the map empty
    ///
    /// Only meaningful once the crawl has terminated; the filter keeps its
    /// bits, so later claims of old keys would be re-admitted.
    pub fn take_records(&mut self) -> PageRecords {
        std::mem::take(&mut self.records)
    }
}
