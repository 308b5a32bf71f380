//! Retry policies for chunk dispatch.

use std::time::Duration;

use rsfga_client_core::{ClientError, NormalizedBatchOptions};

/// Decides whether a failed chunk attempt is retried, and after how long.
pub trait RetryPolicy: Send + Sync {
    /// Returns the delay before the next attempt, or `None` to give up.
    ///
    /// `failed_attempts` counts the attempts that have failed so far,
    /// including the one that produced `error`.
    fn next_delay(&self, failed_attempts: u32, error: &ClientError) -> Option<Duration>;
}

/// Retries every failure up to `max_retries` times with a fixed delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelayRetry {
    max_retries: u32,
    delay: Duration,
}

impl FixedDelayRetry {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    pub fn from_options(options: &NormalizedBatchOptions) -> Self {
        Self::new(options.max_retries, options.retry_delay)
    }
}

impl RetryPolicy for FixedDelayRetry {
    fn next_delay(&self, failed_attempts: u32, _error: &ClientError) -> Option<Duration> {
        (failed_attempts <= self.max_retries).then_some(self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_retries_by_default() {
        let policy = FixedDelayRetry::from_options(&NormalizedBatchOptions::default());
        assert_eq!(policy.next_delay(1, &ClientError::transport("x")), None);
    }

    #[test]
    fn test_retries_until_budget_is_spent() {
        let policy = FixedDelayRetry::new(2, Duration::from_millis(10));
        let err = ClientError::transport("reset");

        assert_eq!(policy.next_delay(1, &err), Some(Duration::from_millis(10)));
        assert_eq!(policy.next_delay(2, &err), Some(Duration::from_millis(10)));
        assert_eq!(policy.next_delay(3, &err), None);
    }

    #[test]
    fn test_delay_is_fixed_not_exponential() {
        let policy = FixedDelayRetry::new(5, Duration::from_millis(100));
        let err = ClientError::validation("bad");
        let delays: Vec<_> = (1..=5).filter_map(|n| policy.next_delay(n, &err)).collect();
        assert!(delays.iter().all(|d| *d == Duration::from_millis(100)));
        assert_eq!(delays.len(), 5);
    }
}
