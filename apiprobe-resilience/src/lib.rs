//! Resilience patterns for apiprobe
//!
//! A bounded retry policy for waiting on external services. The executor
//! gives up with a terminal error once the attempts are spent.

pub mod retry;

// Re-export commonly used types
pub use retry::{RetryError, RetryExecutor, RetryPolicy, Retryable};
