//! Configuration module for Site-Mapper
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Command-line values are layered on top by the binary.
//!
//! # Example
//!
//! ```no_run
//! use site_mapper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("site-mapper.toml")).unwrap();
//! println!("Crawler will run {} workers", config.crawler.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, UserAgentConfig, VisitMode};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::{parse_mode, validate, validate_crawler_config};
