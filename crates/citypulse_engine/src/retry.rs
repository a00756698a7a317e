use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use citypulse_logging::{pulse_debug, pulse_warn};

pub const DEFAULT_ATTEMPTS: u32 = 20;
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Bounded retry with a fixed delay between attempts.
///
/// The failing path takes `(attempts - 1) * delay` of wall-clock time before
/// the last error is handed back to the caller unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            delay: DEFAULT_DELAY,
        }
    }
}

impl RetryPolicy {
    /// `attempts` counts the first call and is at least 1.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    pub fn with_attempts(self, attempts: u32) -> Self {
        Self::new(attempts, self.delay)
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        Self::new(self.attempts, delay)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn run<T, E, F, Fut>(&self, label: &str, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        pulse_debug!("{label} succeeded on attempt {attempt}");
                    }
                    return Ok(value);
                }
                Err(err) if attempt < self.attempts => {
                    pulse_warn!(
                        "{label} failed (attempt {attempt}/{}): {err}",
                        self.attempts
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    pulse_warn!("{label} failed after {attempt} attempts: {err}");
                    return Err(err);
                }
            }
        }
    }
}
