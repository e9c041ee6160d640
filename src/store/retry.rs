//! Retry with backoff for storage calls

use crate::config::RetryConfig;
use crate::error::{classify_store_error, Error, Result};
use crate::types::BackoffType;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Backoff schedule for retryable storage failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
            backoff_type: config.backoff,
        }
    }
}

impl RetryPolicy {
    /// Policy that retries without sleeping
    pub fn immediate(max_retries: u32) -> Self {
        Self::from(&RetryConfig::immediate(max_retries))
    }

    /// Calculate backoff delay for a given attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.backoff_type {
            BackoffType::Constant => self.initial_backoff,
            BackoffType::Linear => self.initial_backoff * (attempt + 1),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.initial_backoff * factor
            }
        };

        std::cmp::min(delay, self.max_backoff)
    }

    /// Run a storage call, retrying transient failures
    ///
    /// Credential and not-found errors return immediately. Once the retries
    /// are used up the last failure is wrapped in `MaxRetriesExceeded`.
    pub async fn run<T, F, Fut>(&self, operation: &str, path: &str, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = object_store::Result<T>>,
    {
        let mut attempt = 0;

        loop {
            let err = match call().await {
                Ok(value) => return Ok(value),
                Err(e) => classify_store_error(operation, path, e),
            };

            if !err.is_retryable() {
                return Err(err);
            }

            if attempt >= self.max_retries {
                return Err(Error::MaxRetriesExceeded {
                    max_retries: self.max_retries,
                    operation: operation.to_string(),
                    path: path.to_string(),
                    message: err.to_string(),
                });
            }

            let delay = self.calculate_backoff(attempt);
            warn!(
                "Storage {} on '{}' failed, attempt {}/{}, retrying in {:?}: {}",
                operation,
                path,
                attempt + 1,
                self.max_retries + 1,
                delay,
                err
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
