//! Jittered retry for bulk submissions

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use crate::config::RetryConfig;
use crate::core::{IndexerError, IndexerResult};

/// Retry with a uniformly random delay between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub retries: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: u32, min_delay: Duration, max_delay: Duration) -> Self {
        Self {
            retries,
            min_delay,
            max_delay: max_delay.max(min_delay),
        }
    }

    /// No delay between attempts
    pub fn immediate(retries: u32) -> Self {
        Self::new(retries, Duration::ZERO, Duration::ZERO)
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.retries,
            Duration::from_millis(config.min_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        )
    }

    pub fn attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    fn next_delay(&self) -> Duration {
        if self.max_delay <= self.min_delay {
            return self.min_delay;
        }
        let min = self.min_delay.as_millis() as u64;
        let max = self.max_delay.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }

    /// Run `op` until it succeeds or every attempt failed.
    ///
    /// The closure receives the 0-based attempt number. Exhaustion returns
    /// `RetriesExhausted` carrying the last error message.
    pub async fn run<F, Fut, T>(&self, what: &str, mut op: F) -> IndexerResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = IndexerResult<T>>,
    {
        let attempts = self.attempts();
        let mut attempt = 0;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    attempt += 1;
                    if attempt >= attempts {
                        return Err(IndexerError::RetriesExhausted {
                            attempts,
                            last_error: e.to_string(),
                        });
                    }

                    let delay = self.next_delay();
                    warn!(
                        attempt,
                        attempts,
                        delay_ms = delay.as_millis() as u64,
                        "{} failed, retrying: {}",
                        what,
                        e
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
