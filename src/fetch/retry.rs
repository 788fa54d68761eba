//! Exponential backoff around block source requests

use crate::config::FetchConfig;
use crate::errors::{FetchError, FetchResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

/// Next backoff: `min(current * multiplier, max_backoff_seconds)`
///
/// ```
/// use std::time::Duration;
/// use stamp_decoder::fetch::calculate_next_backoff;
///
/// let next = calculate_next_backoff(Duration::from_millis(250), 2.0, 30);
/// assert_eq!(next, Duration::from_millis(500));
/// ```
pub fn calculate_next_backoff(
    current_backoff: Duration,
    multiplier: f64,
    max_backoff_seconds: u64,
) -> Duration {
    let scaled = (current_backoff.as_millis() as f64 * multiplier) as u64;
    Duration::from_millis(scaled).min(Duration::from_secs(max_backoff_seconds))
}

/// Timeout and backoff parameters for one kind of request
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub timeout_seconds: u64,
    pub max_retries: usize,
    pub initial_backoff: Duration,
    pub backoff_multiplier: f64,
    pub max_backoff_seconds: u64,
}

impl From<&FetchConfig> for RetryPolicy {
    fn from(config: &FetchConfig) -> Self {
        Self {
            timeout_seconds: config.timeout_seconds,
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            backoff_multiplier: config.backoff_multiplier,
            max_backoff_seconds: config.max_backoff_seconds,
        }
    }
}

/// Run `attempt` until it succeeds, fails permanently, or retries run out
///
/// Each attempt is bounded by the policy timeout. Errors for which
/// [`FetchError::is_retryable`] is false are returned immediately.
pub async fn with_retries<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut attempt: F,
) -> FetchResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = FetchResult<T>>,
{
    let mut backoff = policy.initial_backoff;

    for try_number in 0..=policy.max_retries {
        let result = match timeout(Duration::from_secs(policy.timeout_seconds), attempt()).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                timeout_seconds: policy.timeout_seconds,
                operation: operation.to_string(),
            }),
        };

        match result {
            Ok(value) => {
                if try_number > 0 {
                    debug!("{} succeeded after {} retries", operation, try_number);
                }
                return Ok(value);
            }
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => {
                if try_number == policy.max_retries {
                    warn!("{} failed after {} retries: {}", operation, try_number, e);
                    break;
                }
                warn!(
                    "{} failed (attempt {}/{}), retrying in {:?}: {}",
                    operation,
                    try_number + 1,
                    policy.max_retries + 1,
                    backoff,
                    e
                );
                sleep(backoff).await;
                backoff = calculate_next_backoff(
                    backoff,
                    policy.backoff_multiplier,
                    policy.max_backoff_seconds,
                );
            }
        }
    }

    Err(FetchError::MaxRetriesExceeded {
        operation: operation.to_string(),
    })
}
