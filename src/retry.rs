//! Bounded retry with linear backoff.
//!
//! Every outbound call in the pipeline goes through [`execute`]. The schedule
//! is deliberately simple: after failed attempt `n` (1-indexed) the caller
//! sleeps `base_delay * n`, so the default policy waits 1s, then 2s. There is
//! no jitter and every error is retried the same way.
//!
//! ```
//! use scripture_enrichment::retry::RetryPolicy;
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::default();
//! assert_eq!(policy.max_attempts(), 3);
//! assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(1));
//! assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(2));
//! ```

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// How many times to attempt an operation and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    attempt_timeout: Option<Duration>,
}

/// Marker error for an attempt cut off by [`RetryPolicy::with_attempt_timeout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptTimeout(pub Duration);

impl RetryPolicy {
    /// Create a policy.
    ///
    /// # Panics
    ///
    /// Panics if `max_attempts` is zero.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        assert!(max_attempts >= 1, "RetryPolicy requires at least one attempt");
        Self {
            max_attempts,
            base_delay,
            attempt_timeout: None,
        }
    }

    /// A single attempt, no waiting.
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Bound each individual attempt. A timed-out attempt counts as failed.
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn attempt_timeout(&self) -> Option<Duration> {
        self.attempt_timeout
    }

    /// Delay after failed attempt `attempt` (1-indexed): `base_delay * attempt`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// Upper bound on the wall time of one [`execute`] call.
    ///
    /// `None` when no per-attempt timeout is configured, since a hung attempt
    /// is then unbounded.
    pub fn worst_case_latency(&self) -> Option<Duration> {
        let timeout = self.attempt_timeout?;
        let sleeping: Duration = (1..self.max_attempts)
            .map(|n| self.delay_for_attempt(n))
            .sum();
        Some(sleeping + timeout * self.max_attempts)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// Run `operation` until it succeeds or the policy is exhausted.
///
/// Returns the first success, or the error from the *last* attempt. Earlier
/// errors are logged and dropped.
pub async fn execute<T, E, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display + From<AttemptTimeout>,
{
    let mut attempt = 1;
    loop {
        let outcome = match policy.attempt_timeout {
            Some(limit) => match tokio::time::timeout(limit, operation()).await {
                Ok(result) => result,
                Err(_) => Err(E::from(AttemptTimeout(limit))),
            },
            None => operation().await,
        };

        match outcome {
            Ok(value) => {
                if attempt > 1 {
                    tracing::debug!(operation = label, attempt, "succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) if attempt < policy.max_attempts => {
                let delay = policy.delay_for_attempt(attempt);
                tracing::warn!(
                    operation = label,
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                tracing::warn!(
                    operation = label,
                    attempts = attempt,
                    error = %err,
                    "all attempts failed"
                );
                return Err(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EnrichmentError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.base_delay(), Duration::from_secs(1));
        assert_eq!(policy.attempt_timeout(), None);
    }

    #[test]
    fn test_linear_delays() {
        let policy = RetryPolicy::new(5, Duration::from_millis(250));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(250));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(500));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(1000));
    }

    #[test]
    #[should_panic(expected = "at least one attempt")]
    fn test_zero_attempts_panics() {
        let _ = RetryPolicy::new(0, Duration::from_secs(1));
    }

    #[test]
    fn test_worst_case_latency() {
        let policy = RetryPolicy::default().with_attempt_timeout(Duration::from_secs(10));
        // 1s + 2s sleeping, 3 x 10s attempts
        assert_eq!(policy.worst_case_latency(), Some(Duration::from_secs(33)));
        assert_eq!(RetryPolicy::default().worst_case_latency(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_last_error_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();

        let result: Result<(), EnrichmentError> = execute(&policy, "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Err(EnrichmentError::Other(format!("failure {}", n))) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match result {
            Err(EnrichmentError::Other(msg)) => assert_eq!(msg, "failure 3"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_on_first_success() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();

        let result: Result<u32, EnrichmentError> = execute(&policy, "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 2 {
                    Err(EnrichmentError::Other("flaky".into()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        let value = tokio_test::assert_ok!(result);
        assert_eq!(value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_timing_is_linear() {
        let stamps = std::sync::Mutex::new(Vec::new());
        let policy = RetryPolicy::default();
        let start = Instant::now();

        let _: Result<(), EnrichmentError> = execute(&policy, "timing", || {
            stamps.lock().unwrap().push(start.elapsed());
            async { Err(EnrichmentError::Other("down".into())) }
        })
        .await;

        let stamps = stamps.into_inner().unwrap();
        assert_eq!(stamps.len(), 3);
        let tolerance = Duration::from_millis(50);
        let first_gap = stamps[1] - stamps[0];
        let second_gap = stamps[2] - stamps[1];
        assert!(
            first_gap >= Duration::from_secs(1)
                && first_gap < Duration::from_secs(1) + tolerance
        );
        assert!(
            second_gap >= Duration::from_secs(2)
                && second_gap < Duration::from_secs(2) + tolerance
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_timeout_counts_as_failure() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(2, Duration::from_millis(10))
            .with_attempt_timeout(Duration::from_millis(100));

        let result: Result<(), EnrichmentError> = execute(&policy, "slow", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(matches!(
            result,
            Err(EnrichmentError::Timeout(d)) if d == Duration::from_millis(100)
        ));
    }

    #[tokio::test]
    async fn test_single_attempt_policy_does_not_sleep() {
        let calls = AtomicU32::new(0);
        let result: Result<(), EnrichmentError> = execute(&RetryPolicy::once(), "once", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(EnrichmentError::Other("nope".into())) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
