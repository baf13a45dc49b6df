//! Crawler module for downloading pages
//!
//! This module contains the core crawling logic, including:
//! - The serial, rate-limited crawl loop
//! - Whole-run retry

mod coordinator;
mod retry;

pub use coordinator::{CrawlSettings, CrawlStats, Crawler, RunOutcome};
pub use retry::{retry_runs, Completion, Retried};
