//! Configuration module for Crawl-Watch
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use crawl_watch::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl-watch.toml")).unwrap();
//! println!("Polling every {}ms", config.poller.poll_interval_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{BackendConfig, Config, PollerConfig, DEFAULT_BASE_URL, DEFAULT_POLL_INTERVAL_MS};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
