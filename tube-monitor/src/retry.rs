//! Bounded retry with a fixed delay.
//!
//! Both the TfL fetch layer and the Telegram notifier retry the same way:
//! a fixed number of attempts with a constant pause between them, then
//! give up. This module is the single implementation of that policy.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::{error, warn};

/// How many times to attempt an operation and how long to pause between
/// attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub max_attempts: u32,

    /// Pause between consecutive attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Create a policy with the given attempt count and delay.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

impl Default for RetryPolicy {
    /// Three attempts, five seconds apart.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

/// Run `op` until it succeeds or the policy is exhausted.
///
/// Logs one warning per failed attempt and one error when giving up. The
/// delay is applied between attempts only; exhaustion returns without a
/// final sleep. Returns `None` when every attempt failed; callers treat
/// that as "no data" rather than an error to propagate.
pub async fn with_retries<T, E, F, Fut>(policy: &RetryPolicy, what: &str, mut op: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    for attempt in 1..=policy.max_attempts {
        match op().await {
            Ok(value) => return Some(value),
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    error = %e,
                    "{what} failed"
                );
                if attempt < policy.max_attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    error!(
        attempts = policy.max_attempts,
        "{what}: no data after exhausting retries"
    );
    None
}
