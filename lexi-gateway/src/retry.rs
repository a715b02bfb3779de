//! Bounded retry with fixed backoff.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Bounded-retry policy: a maximum attempt count and a fixed pause
/// between attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Run `op`, retrying while `retryable` holds and attempts remain.
    /// Non-retryable errors propagate immediately.
    pub async fn run<T, E, Op, Fut>(
        &self,
        mut op: Op,
        retryable: impl Fn(&E) -> bool,
    ) -> Result<T, E>
    where
        Op: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 1u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts && retryable(&e) => {
                    warn!(
                        "attempt {attempt}/{} failed ({e}), retrying in {:?}",
                        self.max_attempts, self.backoff
                    );
                    tokio::time::sleep(self.backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
