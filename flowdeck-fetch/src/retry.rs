//! Retry-with-backoff for outbound requests.
//!
//! This is a pure reliability primitive: it retries transport-level
//! failures and nothing else. HTTP responses count as success here, even
//! 4xx and 5xx, and are interpreted by the caller.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Backoff schedule for retried requests.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each subsequent one.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the given attempt budget and a 1s base delay.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::from_secs(1),
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self::new(1)
    }

    /// Sets the base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Delay taken after a failed attempt (0-indexed): `base * 2^attempt`,
    /// so the default schedule is 1s, 2s, 4s, ...
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Errors that may succeed on a later attempt.
pub trait Transient {
    /// Whether retrying could plausibly help.
    fn is_transient(&self) -> bool;
}

impl Transient for reqwest::Error {
    fn is_transient(&self) -> bool {
        // Connection failures and timeouts are worth retrying; anything
        // else (TLS setup, request building) will fail the same way again.
        self.is_connect() || self.is_timeout()
    }
}

/// Runs `op` up to `policy.max_attempts` times, sleeping between attempts.
///
/// Returns the first success, or the last error once attempts are
/// exhausted or a non-transient error occurs. No sleep happens after the
/// final attempt.
///
/// # Errors
///
/// Returns the operation's error unchanged; the caller decides how to wrap
/// an exhausted retry budget.
pub async fn retry_transient<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    E: Transient + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt + 1 < policy.max_attempts && e.is_transient() => {
                let delay = policy.delay_for_attempt(attempt);
                warn!(
                    attempt = attempt + 1,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %e,
                    "Transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    struct FlakyError {
        transient: bool,
    }

    impl fmt::Display for FlakyError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "flaky (transient: {})", self.transient)
        }
    }

    impl Transient for FlakyError {
        fn is_transient(&self) -> bool {
            self.transient
        }
    }

    #[test]
    fn backoff_schedule_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_third_attempt_after_backoff() {
        let calls = AtomicU32::new(0);
        let start = tokio::time::Instant::now();

        let result: Result<u32, FlakyError> =
            retry_transient(&RetryPolicy::default(), || async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(FlakyError { transient: true })
                } else {
                    Ok(n)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Two waits: 1s after the first failure, 2s after the second.
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_after_max_attempts_with_no_trailing_wait() {
        let calls = AtomicU32::new(0);
        let start = tokio::time::Instant::now();

        let result: Result<(), FlakyError> =
            retry_transient(&RetryPolicy::default(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FlakyError { transient: true })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // No sleep after the final attempt.
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn non_transient_errors_fail_immediately() {
        let calls = AtomicU32::new(0);

        let result: Result<(), FlakyError> =
            retry_transient(&RetryPolicy::default(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FlakyError { transient: false })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_retry_policy_makes_one_attempt() {
        let calls = AtomicU32::new(0);

        let result: Result<(), FlakyError> =
            retry_transient(&RetryPolicy::no_retry(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FlakyError { transient: true })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
