//! Whole-run retry
//!
//! A failed run is never repaired in place: the retrier simply starts another
//! full run, up to a fixed number of attempts, with no backoff of its own.

use std::future::Future;

/// Result of one run, as seen by the retrier
pub trait Completion {
    /// Returns true if the run processed its entire sequence
    fn is_complete(&self) -> bool;
}

impl Completion for bool {
    fn is_complete(&self) -> bool {
        *self
    }
}

/// Every outcome produced while retrying, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retried<O> {
    pub outcomes: Vec<O>,
}

impl<O: Completion> Retried<O> {
    /// Number of runs started
    pub fn attempts(&self) -> usize {
        self.outcomes.len()
    }

    /// The outcome of the final run, if any run was started
    pub fn last(&self) -> Option<&O> {
        self.outcomes.last()
    }

    /// Returns true if the final run completed
    pub fn succeeded(&self) -> bool {
        self.last().is_some_and(|o| o.is_complete())
    }
}

/// Runs `run` until it completes or `max_attempts` runs have been made
///
/// Each call to `run` must be a full, independent run. Attempts are consumed
/// back to back. Exhausting them is terminal: the returned value reports
/// failure and nothing further is tried.
///
/// # Arguments
///
/// * `max_attempts` - Upper bound on the number of runs; zero runs nothing
/// * `run` - Starts one run
///
/// # Example
///
/// ```
/// use koohii_mirror::crawler::retry_runs;
///
/// # async fn example() {
/// let mut calls = 0;
/// let retried = retry_runs(3, || {
///     calls += 1;
///     let done = calls == 2;
///     async move { done }
/// })
/// .await;
/// assert!(retried.succeeded());
/// assert_eq!(retried.attempts(), 2);
/// # }
/// ```
pub async fn retry_runs<F, Fut, O>(max_attempts: u32, mut run: F) -> Retried<O>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = O>,
    O: Completion,
{
    let mut outcomes = Vec::new();

    for attempt in 1..=max_attempts {
        tracing::info!("Starting attempt {}/{}", attempt, max_attempts);

        let outcome = run().await;
        let complete = outcome.is_complete();
        outcomes.push(outcome);

        if complete {
            return Retried { outcomes };
        }

        tracing::warn!("Attempt {}/{} did not complete", attempt, max_attempts);
    }

    tracing::error!("Giving up after {} attempts", max_attempts);
    Retried { outcomes }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A run that fails `failures` times, then succeeds
    fn flaky(failures: usize) -> impl FnMut() -> std::future::Ready<bool> {
        let mut calls = 0;
        move || {
            calls += 1;
            std::future::ready(calls > failures)
        }
    }

    #[tokio::test]
    async fn test_succeeds_on_third_attempt() {
        let retried = retry_runs(3, flaky(2)).await;
        assert!(retried.succeeded());
        assert_eq!(retried.attempts(), 3);
        assert_eq!(retried.outcomes, vec![false, false, true]);
    }

    #[tokio::test]
    async fn test_exhausts_attempts() {
        let retried = retry_runs(2, flaky(2)).await;
        assert!(!retried.succeeded());
        assert_eq!(retried.attempts(), 2);
    }

    #[tokio::test]
    async fn test_stops_after_first_success() {
        let retried = retry_runs(5, flaky(0)).await;
        assert!(retried.succeeded());
        assert_eq!(retried.attempts(), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_runs_nothing() {
        let mut calls = 0;
        let retried = retry_runs(0, || {
            calls += 1;
            std::future::ready(true)
        })
        .await;
        assert!(!retried.succeeded());
        assert_eq!(retried.attempts(), 0);
        assert_eq!(calls, 0);
    }
}
