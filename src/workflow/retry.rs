//! Bounded retry of an async unit of work.
//!
//! Wraps an attempt function and re-runs it on classified-retryable
//! failures (see [`Error::is_retryable`]) up to a total attempt budget,
//! with a fixed delay between attempts. Non-retryable failures
//! short-circuit immediately, surfacing the original error.

// ============================================================================
// Imports
// ============================================================================

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::Result;

// ============================================================================
// RetryPolicy
// ============================================================================

/// Fixed-delay retry with a total attempt budget.
///
/// `max_attempts` counts the first attempt: a budget of 3 means at most
/// two retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    max_attempts: u32,

    /// Fixed wait between attempts.
    delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the given budget and inter-attempt delay.
    #[inline]
    #[must_use]
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
            delay,
        }
    }

    /// Returns the total attempt budget.
    #[inline]
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Runs `attempt_fn` until it succeeds, fails permanently, or the
    /// budget is exhausted.
    ///
    /// The attempt function receives the 1-based attempt number; on
    /// attempts > 1 it is responsible for reloading whatever underlying
    /// resource the previous attempt dirtied.
    ///
    /// # Errors
    ///
    /// Returns the first non-retryable error, or the last retryable
    /// error once the budget is spent.
    pub async fn run<T, F, Fut>(&self, mut attempt_fn: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            debug!(attempt, max_attempts = self.max_attempts, "attempt starting");
            match attempt_fn(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_retryable() && attempt < self.max_attempts => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %error,
                        "retryable failure, will retry"
                    );
                    sleep(self.delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use parking_lot::Mutex;
    use tokio::time::Instant;

    use crate::error::Error;

    fn policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_secs(2))
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_attempt() {
        let result = policy().run(|attempt| async move { Ok(attempt) }).await;
        assert_eq!(result.expect("run"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_attempted_exactly_once() {
        let calls = Mutex::new(0u32);
        let result: Result<()> = policy()
            .run(|_attempt| {
                *calls.lock() += 1;
                async { Err(Error::agent("malformed response")) }
            })
            .await;

        assert!(matches!(result, Err(Error::Agent { .. })));
        assert_eq!(*calls.lock(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retryable_exhausts_budget_with_delays() {
        let calls = Mutex::new(0u32);
        let started = Instant::now();
        let result: Result<()> = policy()
            .run(|_attempt| {
                *calls.lock() += 1;
                async { Err(Error::page_load_timeout(30_000)) }
            })
            .await;

        assert!(matches!(result, Err(Error::PageLoadTimeout { .. })));
        assert_eq!(*calls.lock(), 3);
        // max_attempts - 1 inter-attempt delays
        assert_eq!(started.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_retry() {
        let result = policy()
            .run(|attempt| async move {
                if attempt < 2 {
                    Err(Error::TabHandleUnavailable)
                } else {
                    Ok(attempt)
                }
            })
            .await;

        assert_eq!(result.expect("run"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_numbers_start_at_one() {
        let seen = Mutex::new(Vec::new());
        let _: Result<()> = policy()
            .run(|attempt| {
                seen.lock().push(attempt);
                async { Err(Error::PageInfoUnavailable) }
            })
            .await;

        assert_eq!(*seen.lock(), vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_budget_is_clamped_to_one() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.max_attempts(), 1);

        let calls = Mutex::new(0u32);
        let result: Result<()> = policy
            .run(|_attempt| {
                *calls.lock() += 1;
                async { Err(Error::page_load_timeout(1)) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(*calls.lock(), 1);
    }
}
