//! Configuration module for Koohii-Mirror
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use koohii_mirror::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mirror.toml")).unwrap();
//! println!("Saving pages to {}", config.output.directory.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, DomainConfig, OutputConfig, SessionConfig};

// Re-export parser and validation functions
pub use parser::{compute_config_hash, load_config, read_config, read_config_with_hash};
pub use validation::{validate, validate_credentials, MIN_DELAY_MS};
