//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop. One run:
//! - Resolves the range specification against the current store
//! - Logs in exactly once
//! - Fetches, saves and waits for each codepoint in order
//! - Stops at the first error; recovery is a fresh run

use crate::config::Config;
use crate::crawler::retry::{retry_runs, Completion, Retried};
use crate::range::{Domain, Identifiers, RangeSpec};
use crate::session::{Credentials, Session};
use crate::store::ArtifactStore;
use crate::{ErrorKind, MirrorError};
use std::time::{Duration, Instant};

/// Everything a run needs besides its collaborators
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub credentials: Credentials,
    pub range: RangeSpec,
    pub domain: Domain,
    /// Wait after every saved page
    pub delay: Duration,
}

impl CrawlSettings {
    /// Builds settings from a validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSettings)` - Settings ready for a crawl
    /// * `Err(MirrorError)` - The range specification is invalid
    pub fn from_config(config: &Config) -> Result<Self, MirrorError> {
        let domain = config.domain.to_domain();
        Ok(Self {
            credentials: Credentials::new(
                config.session.username.clone(),
                config.session.password.clone(),
            ),
            range: RangeSpec::parse(config.crawler.range.as_deref(), domain)?,
            domain,
            delay: Duration::from_millis(config.crawler.delay_ms),
        })
    }
}

/// Statistics for a completed run
#[derive(Debug, Clone, Copy)]
pub struct CrawlStats {
    pub artifacts_written: u64,
    pub elapsed: Duration,
}

/// Outcome of one run, successful or not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub completed: bool,
    pub failure: Option<ErrorKind>,
    pub artifacts_written: u64,
}

impl Completion for RunOutcome {
    fn is_complete(&self) -> bool {
        self.completed
    }
}

/// Main crawler structure
pub struct Crawler<S, A> {
    session: S,
    store: A,
    settings: CrawlSettings,
}

impl<S, A> Crawler<S, A>
where
    S: Session,
    A: ArtifactStore,
{
    /// Creates a new crawler
    pub fn new(session: S, store: A, settings: CrawlSettings) -> Self {
        Self {
            session,
            store,
            settings,
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn store(&self) -> &A {
        &self.store
    }

    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    /// Resolves the codepoints the next run would visit
    ///
    /// Resume ranges are re-read from the store on every call.
    pub fn plan(&self) -> Identifiers {
        self.settings
            .range
            .resolve(self.settings.domain, &self.store)
    }

    /// Runs the crawl once
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlStats)` - Every codepoint in the plan was fetched and saved
    /// * `Err(MirrorError)` - The error that terminated the run
    pub async fn run(&self) -> Result<CrawlStats, MirrorError> {
        let start = Instant::now();
        let mut written = 0;
        self.crawl(&mut written).await?;
        Ok(CrawlStats {
            artifacts_written: written,
            elapsed: start.elapsed(),
        })
    }

    /// Runs the crawl once, folding any error into the outcome
    pub async fn run_outcome(&self) -> RunOutcome {
        let mut written = 0;
        match self.crawl(&mut written).await {
            Ok(()) => RunOutcome {
                completed: true,
                failure: None,
                artifacts_written: written,
            },
            Err(e) => {
                tracing::error!("Run terminated after {} pages: {}", written, e);
                RunOutcome {
                    completed: false,
                    failure: Some(e.kind()),
                    artifacts_written: written,
                }
            }
        }
    }

    /// Runs full crawls until one completes or `max_attempts` are used up
    pub async fn run_with_retries(&self, max_attempts: u32) -> Retried<RunOutcome> {
        retry_runs(max_attempts, || self.run_outcome()).await
    }

    async fn crawl(&self, written: &mut u64) -> Result<(), MirrorError> {
        let identifiers = self.plan();
        tracing::info!("Run covers {} codepoints", identifiers.size_hint().0);

        let context = self
            .session
            .authenticate(&self.settings.credentials)
            .await?;

        let start = Instant::now();
        for codepoint in identifiers {
            tracing::debug!("Processing {}", codepoint);

            let page = self.session.fetch(codepoint, &context).await?;
            self.store.write(codepoint, page.as_bytes())?;
            *written += 1;

            if *written % 100 == 0 {
                let rate = *written as f64 / start.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} pages saved, last {}, {:.2} pages/sec",
                    written,
                    codepoint,
                    rate
                );
            }

            tokio::time::sleep(self.settings.delay).await;
        }

        tracing::info!(
            "Run completed: {} pages saved in {:?}",
            written,
            start.elapsed()
        );
        Ok(())
    }
}
