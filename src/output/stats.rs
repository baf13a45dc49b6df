//! Run summaries for the command line
//!
//! This module turns retry outcomes and audit results into the summaries
//! printed at the end of a command.

use crate::crawler::{Retried, RunOutcome};
use crate::integrity::IntegrityReport;
use crate::range::Domain;
use crate::ErrorKind;
use chrono::{DateTime, Utc};

/// Summary of a crawl across all attempts
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Runs started, and the configured maximum
    pub attempts: usize,
    pub max_attempts: u32,

    /// Pages saved across every attempt
    pub artifacts_written: u64,

    pub completed: bool,

    /// Why the last attempt stopped, if it failed
    pub failure: Option<ErrorKind>,
}

impl CrawlSummary {
    /// Builds a summary from retry outcomes, finishing now
    pub fn new(
        started_at: DateTime<Utc>,
        max_attempts: u32,
        retried: &Retried<RunOutcome>,
    ) -> Self {
        Self {
            started_at,
            finished_at: Utc::now(),
            attempts: retried.attempts(),
            max_attempts,
            artifacts_written: retried.outcomes.iter().map(|o| o.artifacts_written).sum(),
            completed: retried.succeeded(),
            failure: retried.last().and_then(|o| o.failure),
        }
    }

    /// Wall-clock duration in whole seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Prints a crawl summary to stdout
pub fn print_crawl_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("  Started: {}", summary.started_at.to_rfc3339());
    println!("  Finished: {}", summary.finished_at.to_rfc3339());
    println!("  Duration: {}s", summary.duration_seconds());
    println!(
        "  Attempts: {} of {}",
        summary.attempts, summary.max_attempts
    );
    println!("  Pages saved: {}", summary.artifacts_written);
    println!();

    if summary.completed {
        println!("✓ Crawl completed");
    } else {
        match summary.failure {
            Some(kind) => println!("✗ Terminated due to fatal error ({:?})", kind),
            None => println!("✗ Terminated without completing"),
        }
    }
}

/// Prints an integrity report to stdout
pub fn print_integrity_report(report: &IntegrityReport, domain: Domain) {
    println!(
        "=== Integrity Check ({}..{}) ===\n",
        domain.lower, domain.upper
    );

    match report {
        IntegrityReport::Complete { unchecked } => {
            println!("✓ Integrity OK");
            if *unchecked > 0 {
                println!("  {} entries beyond {} were not checked", unchecked, domain.upper);
            }
        }
        IntegrityReport::Gap { first_missing } => {
            println!("✗ Integrity error, missing {}", first_missing);
        }
    }
}
