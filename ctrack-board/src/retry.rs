//! Bounded retry of whole transactions on write contention

use std::future::Future;
use std::time::Duration;

use ctrack_common::config::DatabaseConfig;
use tracing::warn;

use crate::error::{Result, StructureError};

/// How often, and how patiently, a conflicted transaction is re-run
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Sleep before attempt `n + 1` is `backoff * n`
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&DatabaseConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self {
            max_attempts: config.conflict_retries.max(1),
            backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }
}

/// Run `attempt` until it succeeds, fails with a non-conflict error, or
/// the policy's attempt budget is spent.
///
/// Each call of `attempt` must run a complete transaction; nothing from a
/// failed attempt may leak into the next.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, operation: &str, mut attempt: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut n = 1;
    loop {
        match attempt().await {
            Err(StructureError::SerializationConflict) if n < policy.max_attempts => {
                warn!(
                    "{}: write conflict on attempt {}/{}, retrying",
                    operation, n, policy.max_attempts
                );
                tokio::time::sleep(policy.backoff * n).await;
                n += 1;
            }
            Err(StructureError::SerializationConflict) => {
                warn!("{}: giving up after {} conflicting attempts", operation, n);
                return Err(StructureError::SerializationConflict);
            }
            other => return other,
        }
    }
}
