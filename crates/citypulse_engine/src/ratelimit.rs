//! Call pacing against provider quotas.
//!
//! Timing uses `tokio::time`, so paused test clocks drive both limiters.
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use citypulse_logging::{pulse_debug, pulse_warn};
use tokio::time::Instant;

/// Keeps each loop iteration at or above a target duration.
#[derive(Debug, Clone)]
pub struct IntervalPacer {
    target: Duration,
    started: Option<Instant>,
}

impl IntervalPacer {
    pub fn new(target: Duration) -> Self {
        Self {
            target,
            started: None,
        }
    }

    pub fn begin(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Sleep out whatever remains of the target interval since [`begin`](Self::begin).
    pub async fn finish(&mut self) {
        let Some(started) = self.started.take() else {
            return;
        };
        let elapsed = started.elapsed();
        if elapsed < self.target {
            tokio::time::sleep(self.target - elapsed).await;
        }
    }
}

/// Minimum delay between consecutive calls, with its own bounded retry.
#[derive(Debug, Clone)]
pub struct MinDelayLimiter {
    min_delay: Duration,
    max_retries: u32,
    error_wait: Duration,
    last_call: Option<Instant>,
}

impl MinDelayLimiter {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            max_retries: 5,
            error_wait: Duration::from_secs(5),
            last_call: None,
        }
    }

    pub fn with_retries(mut self, max_retries: u32, error_wait: Duration) -> Self {
        self.max_retries = max_retries;
        self.error_wait = error_wait;
        self
    }

    /// Wait until `min_delay` has passed since the previous call, then mark a new call.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_call {
            let ready_at = last + self.min_delay;
            if Instant::now() < ready_at {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        self.last_call = Some(Instant::now());
    }

    /// Paced call retried up to `max_retries` extra times; the last error is returned.
    pub async fn call<T, E, F, Fut>(&mut self, label: &str, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut retries = 0;
        loop {
            self.wait().await;
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if retries < self.max_retries => {
                    retries += 1;
                    pulse_debug!(
                        "{label} failed, retry {retries}/{} in {:?}: {err}",
                        self.max_retries,
                        self.error_wait
                    );
                    tokio::time::sleep(self.error_wait).await;
                }
                Err(err) => {
                    pulse_warn!("{label} gave up after {} retries: {err}", retries);
                    return Err(err);
                }
            }
        }
    }
}
