use backon::{ConstantBuilder, Retryable};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::config::SourceConfig;
use crate::error::IsRetryable;

/// Fixed-delay retry policy applied around each upstream fetch.
///
/// `max_times` counts retries, so a call makes at most `max_times + 1` attempts.
/// Only errors reporting `is_retryable()` are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_times: usize,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_times: usize, delay: Duration) -> Self {
        Self { max_times, delay }
    }

    pub fn from_config(cfg: &SourceConfig) -> Self {
        Self::new(cfg.retry_max_times, cfg.retry_delay())
    }

    fn backoff(self) -> ConstantBuilder {
        ConstantBuilder::default()
            .with_delay(self.delay)
            .with_max_times(self.max_times)
    }

    pub async fn run<T, E, F, Fut>(self, operation: &'static str, f: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: IsRetryable + std::fmt::Display,
    {
        f.retry(self.backoff())
            .when(|err: &E| err.is_retryable())
            .notify(|err: &E, after: Duration| {
                warn!(
                    operation,
                    error = %err,
                    retry_in_ms = u64::try_from(after.as_millis()).unwrap_or(u64::MAX),
                    "Transient upstream failure (will retry)"
                );
            })
            .await
    }
}
