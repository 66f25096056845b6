use std::sync::Arc;
use std::time::Duration;

use saver_logging::{saver_error, saver_warn};

use crate::fetch::Fetcher;
use crate::{EmbedResult, FetchError};

/// Fixed-delay retry policy. `max_attempts` counts the first try; zero is
/// treated as one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(2000),
        }
    }
}

#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Retries the inner fetcher sequentially, sleeping only between attempts.
/// The error of the last attempt is returned once the policy is exhausted.
pub struct RetryingFetcher<F> {
    inner: F,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl<F: Fetcher> RetryingFetcher<F> {
    pub fn new(inner: F, policy: RetryPolicy) -> Self {
        Self::with_sleeper(inner, policy, Arc::new(TokioSleeper))
    }

    pub fn with_sleeper(inner: F, policy: RetryPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            inner,
            policy,
            sleeper,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }
}

#[async_trait::async_trait]
impl<F: Fetcher> Fetcher for RetryingFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<EmbedResult, FetchError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.inner.fetch(url).await {
                Ok(embed) => return Ok(embed),
                Err(err) if attempt >= max_attempts => {
                    saver_error!("Fetch failed after {} attempts: {}", attempt, err);
                    return Err(err);
                }
                Err(err) => {
                    saver_warn!(
                        "Fetch failed (attempt {}/{}): {}. retrying in {:?}",
                        attempt,
                        max_attempts,
                        err,
                        self.policy.delay
                    );
                    self.sleeper.sleep(self.policy.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
