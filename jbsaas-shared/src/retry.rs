/// Bounded exponential-backoff retry policy
///
/// Retry behavior is a value, decoupled from any presentation concern: the
/// caller receives a typed `RetryOutcome` carrying the attempts used and the
/// terminal error, and whatever layer owns user feedback subscribes to that
/// result instead of being interleaved with the loop.
///
/// Delay grows as `base × 2^(attempt − 1)` and attempts are capped (3 by
/// default), so a default policy sleeps 1s then 2s between its three tries.
///
/// # Example
///
/// ```no_run
/// use jbsaas_shared::retry::{RetryOutcome, RetryPolicy};
///
/// # async fn example() {
/// let policy = RetryPolicy::default();
///
/// let outcome: RetryOutcome<String, &str> = policy
///     .run(|attempt| async move {
///         if attempt < 3 {
///             Err("upstream flaked")
///         } else {
///             Ok("generated content".to_string())
///         }
///     })
///     .await;
///
/// match outcome {
///     RetryOutcome::Succeeded { value, attempts } => println!("{value} after {attempts}"),
///     RetryOutcome::Exhausted { error, attempts } => println!("{error} after {attempts}"),
/// }
/// # }
/// ```

use std::future::Future;
use std::time::Duration;

/// Retry policy: attempt cap and backoff base
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum attempts, including the first
    pub max_attempts: u32,

    /// Delay before the second attempt; doubles each retry
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Typed result of running an operation under a retry policy
#[derive(Debug)]
pub enum RetryOutcome<T, E> {
    /// The operation eventually succeeded
    Succeeded {
        /// The successful value
        value: T,

        /// Attempts consumed, including the successful one
        attempts: u32,
    },

    /// Every attempt failed
    Exhausted {
        /// The error from the final attempt
        error: E,

        /// Attempts consumed
        attempts: u32,
    },
}

impl<T, E> RetryOutcome<T, E> {
    /// Collapses the outcome into a plain Result, discarding attempt counts
    pub fn into_result(self) -> Result<T, E> {
        match self {
            RetryOutcome::Succeeded { value, .. } => Ok(value),
            RetryOutcome::Exhausted { error, .. } => Err(error),
        }
    }
}

impl RetryPolicy {
    /// Delay to sleep after a failed attempt (1-based)
    ///
    /// `base × 2^(attempt − 1)`, so attempt 1 waits `base`, attempt 2 waits
    /// `2 × base`, and so on.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }

    /// Runs an operation until it succeeds or attempts are exhausted
    ///
    /// The closure receives the 1-based attempt number.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> RetryOutcome<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match op(attempt).await {
                Ok(value) => {
                    return RetryOutcome::Succeeded {
                        value,
                        attempts: attempt,
                    }
                }
                Err(error) => {
                    if attempt == max_attempts {
                        return RetryOutcome::Exhausted {
                            error,
                            attempts: attempt,
                        };
                    }
                    let delay = self.delay_for(attempt);
                    tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, "Retrying");
                    tokio::time::sleep(delay).await;
                }
            }
        }

        unreachable!("loop always returns")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_delay_doubles_per_attempt() {
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        };

        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_first_try() {
        let outcome: RetryOutcome<u32, &str> =
            RetryPolicy::default().run(|_| async { Ok(7) }).await;

        match outcome {
            RetryOutcome::Succeeded { value, attempts } => {
                assert_eq!(value, 7);
                assert_eq!(attempts, 1);
            }
            _ => panic!("expected success"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_failures() {
        let calls = AtomicU32::new(0);

        let outcome: RetryOutcome<&str, &str> = RetryPolicy::default()
            .run(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Err("flaky")
                    } else {
                        Ok("done")
                    }
                }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match outcome {
            RetryOutcome::Succeeded { value, attempts } => {
                assert_eq!(value, "done");
                assert_eq!(attempts, 3);
            }
            _ => panic!("expected success"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_at_cap() {
        let calls = AtomicU32::new(0);

        let outcome: RetryOutcome<(), &str> = RetryPolicy::default()
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("always down") }
            })
            .await;

        // Never more than 3 attempts
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match outcome {
            RetryOutcome::Exhausted { error, attempts } => {
                assert_eq!(error, "always down");
                assert_eq!(attempts, 3);
            }
            _ => panic!("expected exhaustion"),
        }
    }
}
