//! Fixed-delay retry
//!
//! A low-volume client talking to one endpoint: every failed attempt waits the
//! same delay, and the attempt count is the only bound.

use std::future::Future;
use std::time::Duration;

use super::transport::TransportError;

/// Async timer used between attempts
#[allow(async_fn_in_trait)]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await
    }
}

/// How many extra attempts and how long to wait before each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// One attempt, no waiting
    pub fn once() -> Self {
        Self {
            max_retries: 0,
            delay: Duration::ZERO,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Run `op` until it succeeds or the attempts run out.
    /// Returns the last error on exhaustion.
    pub async fn run<T, F, Fut>(
        &self,
        sleeper: &impl Sleeper,
        what: &str,
        mut op: F,
    ) -> Result<T, TransportError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= self.max_attempts() => {
                    log::warn!("{} failed after {} attempt(s): {}", what, attempt, e);
                    return Err(e);
                }
                Err(e) => {
                    log::warn!(
                        "{} attempt {}/{} failed: {}; retrying in {:?}",
                        what,
                        attempt,
                        self.max_attempts(),
                        e,
                        self.delay
                    );
                    sleeper.sleep(self.delay).await;
                }
            }
        }
    }
}
