//! Bounded retry policy and executor

use log::{debug, info, warn};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// How many attempts to make and how long to pause in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts including the first one; zero still tries once
    pub max_attempts: u32,

    /// Fixed pause after each failed attempt but the last
    pub interval: Duration,
}

impl Default for RetryPolicy {
    /// Ten attempts one second apart
    fn default() -> Self {
        Self::fixed(10, Duration::from_secs(1))
    }
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Longest time the policy can spend pausing before giving up
    pub fn total_wait(&self) -> Duration {
        self.interval
            .saturating_mul(self.max_attempts.max(1).saturating_sub(1))
    }
}

/// Failure that may go away on its own
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Drives an async operation until it succeeds or the policy is spent
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub async fn execute<F, Fut, T, E>(&self, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + Display,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let error = match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        info!("Succeeded on attempt {} of {}", attempt, max_attempts);
                    }
                    return Ok(value);
                }
                Err(error) => error,
            };

            if !error.is_retryable() {
                warn!("Attempt {} failed permanently: {}", attempt, error);
                return Err(RetryError::Aborted { attempt, error });
            }

            if attempt == max_attempts {
                warn!("Giving up after {} attempts: {}", attempt, error);
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last_error: error,
                });
            }

            debug!(
                "Attempt {}/{} failed: {}; next try in {:?}",
                attempt, max_attempts, error, self.policy.interval
            );
            sleep(self.policy.interval).await;
            attempt += 1;
        }
    }
}

/// Terminal outcome of a retried operation
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// Every attempt failed with a retryable error
    #[error("gave up after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: E },

    /// An attempt failed with an error that retrying cannot fix
    #[error("attempt {attempt} failed: {error}")]
    Aborted { attempt: u32, error: E },
}
