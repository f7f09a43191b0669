use std::{fmt::Display, future::Future, time::Duration};

use tactus_config::RetryConfig;

/// Bounded retry with a constant pause between attempts
///
/// `max_retries` is the total number of attempts, so the worst case waits
/// `(max_retries - 1) * delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

impl RetryPolicy {
    pub const fn new(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_retries: if max_retries == 0 { 1 } else { max_retries },
            delay,
        }
    }

    pub const fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_retries, config.delay)
    }

    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `operation` until it succeeds, fails with an error `should_retry`
    /// rejects, or the attempts run out
    ///
    /// The error from the last attempt is returned unchanged.
    pub async fn run<T, E, F, Fut, P>(&self, mut operation: F, should_retry: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: Display,
    {
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_retries && should_retry(&e) => {
                    tracing::warn!(
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "attempt failed, retrying"
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use tokio::time::Instant;

    use super::*;
    use crate::backend::BackendError;

    const DELAY: Duration = Duration::from_secs(1);

    /// Fails transiently until the `succeed_on`-th call
    async fn flaky(calls: &AtomicU32, succeed_on: u32) -> Result<&'static str, BackendError> {
        let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call >= succeed_on {
            Ok("hello")
        } else {
            Err(BackendError::Transport("connection reset".to_string()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures() {
        let policy = RetryPolicy::new(3, DELAY);
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let result = policy.run(|| flaky(&calls, 3), BackendError::is_transient).await;

        assert_eq!(result, Ok("hello"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(started.elapsed(), DELAY * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn first_success_does_not_wait() {
        let policy = RetryPolicy::new(3, DELAY);
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let result = policy.run(|| flaky(&calls, 1), BackendError::is_transient).await;

        assert_eq!(result, Ok("hello"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_attempts_return_last_error() {
        let policy = RetryPolicy::new(4, DELAY);
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let result = policy
            .run(
                || async {
                    let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    Err::<(), _>(BackendError::Request(format!("503 on call {call}")))
                },
                BackendError::is_transient,
            )
            .await;

        assert_eq!(result, Err(BackendError::Request("503 on call 4".to_string())));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(started.elapsed(), DELAY * 3);
    }

    #[tokio::test(start_paused = true)]
    async fn non_transient_error_is_returned_immediately() {
        let policy = RetryPolicy::default();
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let result = policy
            .run(
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(BackendError::Unintelligible)
                },
                BackendError::is_transient,
            )
            .await;

        assert_eq!(result, Err(BackendError::Unintelligible));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        assert_eq!(RetryPolicy::new(0, DELAY).max_retries(), 1);
    }

    #[test]
    fn builds_from_config() {
        let policy = RetryPolicy::from_config(&RetryConfig::default());
        assert_eq!(policy, RetryPolicy::default());
        assert_eq!(policy.delay(), DELAY);
    }
}
