//! Output module for reporting results
//!
//! This module handles:
//! - Summarising a crawl across retry attempts
//! - Printing integrity audit results

pub mod stats;

pub use stats::{print_crawl_summary, print_integrity_report, CrawlSummary};
