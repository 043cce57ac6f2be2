//! Bounded retry of fallible queries.

use std::{future::Future, time::Duration};

use log::{error, warn};
use tokio::time;

use crate::query::QueryError;

/// How many times a query is attempted and how long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, the first one included
    pub attempts: u32,
    /// Fixed delay between two attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            attempts: 3,
            delay: Duration::from_millis(250),
        }
    }
}

/// Runs `operation` until it succeeds or the policy gives up.
///
/// A failed attempt is retried after `policy.delay` when the error is
/// [retryable](QueryError::is_retryable) and attempts are left. The last error
/// is logged and returned. The operation always runs at least once.
///
/// # Arguments
///
/// * `policy` - Number of attempts and delay between them
/// * `label` - Description of the operation, used in logs
/// * `operation` - Factory creating the future of one attempt
pub async fn retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut operation: F,
) -> Result<T, QueryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, QueryError>>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < attempts => {
                warn!(
                    "{} failed (attempt {}/{}): {}, retrying in {:?}",
                    label, attempt, attempts, e, policy.delay
                );
                time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => {
                error!("{} failed (attempt {}/{}): {}", label, attempt, attempts, e);
                return Err(e);
            }
        }
    }
}
