//! Content store access for category metadata.
//!
//! The gate never talks to the CMS directly; it goes through a
//! [`ContentStore`] handed to it in [`crate::auth::AppState`].

pub mod memory;
pub mod sanity;

use crate::models::{Category, CategoryAccess};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// Content store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Unexpected status {0}")]
    Status(u16),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl StoreError {
    /// Whether a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Network(_) | StoreError::Timeout => true,
            StoreError::Status(code) => *code == 429 || (500..600).contains(code),
            StoreError::Decode(_) => false,
        }
    }
}

/// Read-only view of blog categories.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Public category fields (no password verifier).
    ///
    /// `Ok(None)` when no category has this slug.
    async fn category_access(&self, slug: &str) -> Result<Option<CategoryAccess>, StoreError>;

    /// Full category, including the password verifier.
    async fn category(&self, slug: &str) -> Result<Option<Category>, StoreError>;
}

/// Exponential backoff settings for transient store failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
            backoff_factor: 2,
        }
    }
}

impl RetryConfig {
    /// Delay before retrying after `attempt` (1-based) failed, without jitter.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = self
            .backoff_factor
            .saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Run `operation`, retrying retryable errors with backoff and up to 10% jitter.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, mut operation: F) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                let delay = config.delay_after(attempt);
                let jitter = delay.mul_f64(rand::random::<f64>() * 0.1);
                tracing::debug!(
                    action = "store_retry",
                    attempt,
                    max_attempts,
                    error = %e,
                    "Retrying content store request"
                );
                tokio::time::sleep(delay + jitter).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
