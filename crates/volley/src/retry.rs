//! Retry policy for failed attempts.
//!
//! `retry: {count, delay}` allows up to `count` additional attempts after
//! the first, with a fixed delay between attempts. An attempt counts as
//! failed when transport errored or validation failed, so a response that
//! arrived but did not satisfy its expectations is retried too.

use crate::config::RetryConfig;
use std::time::Duration;

/// Fixed-delay retry policy; no backoff curve, no jitter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first.
    pub count: u32,
    /// Delay between attempts in milliseconds.
    pub delay_ms: u64,
}

impl RetryPolicy {
    pub fn from_config(config: Option<&RetryConfig>) -> Self {
        match config {
            Some(config) => Self {
                count: config.count,
                delay_ms: config.delay,
            },
            None => Self::default(),
        }
    }

    /// Total attempts this policy allows.
    pub fn max_attempts(&self) -> u32 {
        self.count + 1
    }

    /// Whether another attempt should follow the given (1-based) one.
    pub fn should_retry(&self, attempt: u32, succeeded: bool) -> bool {
        !succeeded && attempt < self.max_attempts()
    }

    /// Sleep out the inter-attempt delay.
    pub async fn wait(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }
}
