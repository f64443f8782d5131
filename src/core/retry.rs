//! Retry logic with exponential backoff
//!
//! This module provides configurable retry behavior for the spam-detection
//! HTTP calls and other potentially transient network failures. Only
//! transient failures are retried; anything else surfaces immediately.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Options for retry behavior
#[derive(Debug, Clone)]
pub struct RetryOptions {
    /// Maximum number of attempts (including the first)
    pub max_attempts: u32,
    /// Initial delay before first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Backoff multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryOptions {
    // Short delays: the comment form is usually waiting on this call
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

/// Retry manager for executing operations with exponential backoff
///
/// # Examples
///
/// ```no_run
/// use forge_core::core::{RetryManager, RetryOptions};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let manager = RetryManager::new(RetryOptions::default());
///
///     let verdict = manager.retry(|| async {
///         // External call here
///         Ok::<_, anyhow::Error>("clean")
///     }).await?;
///
///     Ok(())
/// }
/// ```
pub struct RetryManager {
    options: RetryOptions,
}

impl RetryManager {
    /// Create a new RetryManager with the given options
    pub fn new(options: RetryOptions) -> Self {
        Self { options }
    }

    /// Execute the given async operation with retry logic
    ///
    /// # Arguments
    ///
    /// * `operation` - Async function that returns a Result
    pub async fn retry<F, Fut, T, E>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let max_attempts = self.options.max_attempts.max(1);
        let mut delay = self.options.initial_delay;

        for attempt in 1..=max_attempts {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    if !self.is_transient_error(&error) || attempt >= max_attempts {
                        return Err(error);
                    }

                    tracing::debug!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "transient failure, retrying"
                    );
                    sleep(delay).await;

                    delay = Duration::from_secs_f64(
                        delay.as_secs_f64() * self.options.backoff_multiplier,
                    )
                    .min(self.options.max_delay);
                }
            }
        }

        unreachable!("retry loop returns on the final attempt")
    }

    /// Check if an error should be retried
    ///
    /// Network-shaped failures (connect errors, resets, timeouts, DNS
    /// failures, throttling and 5xx statuses) are transient; everything
    /// else fails fast.
    fn is_transient_error<E: std::fmt::Display>(&self, error: &E) -> bool {
        let message = error.to_string().to_lowercase();

        let transient_patterns = [
            "timed out",
            "timeout",
            "connection refused",
            "connection reset",
            "connection closed",
            "dns error",
            "error sending request",
            "network unreachable",
            "temporarily unavailable",
            "server error (5",
            "429 too many requests",
        ];

        transient_patterns
            .iter()
            .any(|pattern| message.contains(pattern))
    }
}
