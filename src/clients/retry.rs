//! Retry policy for transient API failures.
//!
//! [`RetryPolicy`] bundles the attempt budget and the backoff schedule so the
//! client's retry loop can be tested independently of any network I/O.

use std::future::Future;
use std::time::Duration;

/// Default number of attempts, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default backoff schedule in milliseconds.
pub const DEFAULT_DELAYS_MS: [u64; 3] = [1000, 2000, 4000];

/// Attempt budget and backoff schedule.
///
/// The delay after failed attempt `n` (1-based) is `delays[n - 1]`; when the
/// schedule is shorter than needed its last entry repeats. No delay follows
/// the final attempt.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use superops_msp::clients::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts(), 3);
/// assert_eq!(policy.delay_after(1), Some(Duration::from_millis(1000)));
/// assert_eq!(policy.delay_after(2), Some(Duration::from_millis(2000)));
/// assert_eq!(policy.delay_after(3), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delays: Vec<Duration>,
}

impl RetryPolicy {
    /// Creates a policy with the given attempt budget and delay schedule.
    ///
    /// `max_attempts` is clamped to at least one.
    #[must_use]
    pub fn new(max_attempts: u32, delays: Vec<Duration>) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delays,
        }
    }

    /// A policy that makes exactly one attempt.
    #[must_use]
    pub fn no_retry() -> Self {
        Self::new(1, Vec::new())
    }

    /// Returns the total number of attempts.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the delay schedule.
    #[must_use]
    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    /// Returns the wait after failed attempt `attempt` (1-based), or `None`
    /// when no further attempt is allowed.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt >= self.max_attempts {
            return None;
        }
        let index = usize::try_from(attempt - 1).unwrap_or(usize::MAX);
        Some(
            self.delays
                .get(index)
                .or_else(|| self.delays.last())
                .copied()
                .unwrap_or(Duration::ZERO),
        )
    }

    /// Runs `operation` under this policy.
    ///
    /// The operation is invoked once per attempt. A failure for which
    /// `is_retryable` returns `false` is returned immediately; a retryable
    /// failure is followed by the scheduled delay and another attempt until
    /// the budget is spent, after which the last failure is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns the first non-retryable error, or the last error once all
    /// attempts are exhausted.
    pub async fn run<T, E, F, Fut, P>(&self, mut operation: F, is_retryable: P) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;

            let error = match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if !is_retryable(&error) {
                return Err(error);
            }

            let Some(delay) = self.delay_after(attempt) else {
                tracing::debug!(attempt, "Retry budget exhausted: {}", error);
                return Err(error);
            };

            tracing::warn!(
                attempt,
                max_attempts = self.max_attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "Retrying after transient failure: {}",
                error
            );
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_ATTEMPTS,
            DEFAULT_DELAYS_MS.iter().copied().map(Duration::from_millis).collect(),
        )
    }
}
