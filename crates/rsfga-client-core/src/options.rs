//! Options controlling how a non-transactional batch write is dispatched.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::plan::MAX_TUPLES_PER_REQUEST;

/// Raw batch write options as supplied by callers or configuration.
///
/// Values are clamped into range by [`BatchOptions::normalize`] before use,
/// so out-of-range input never fails a write.
///
/// # Example YAML Configuration
///
/// ```yaml
/// batch:
///   max_parallel_requests: 4
///   max_tuples_per_chunk: 50
///   max_retries: 2
///   retry_delay_secs: 0.5
///   stop_on_first_error: false
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BatchOptions {
    /// Maximum number of chunk requests in flight at once.
    #[serde(default = "default_max_parallel_requests")]
    pub max_parallel_requests: i64,

    /// Maximum number of operations per chunk.
    #[serde(default = "default_max_tuples_per_chunk")]
    pub max_tuples_per_chunk: i64,

    /// Number of retries after a failed chunk attempt.
    #[serde(default)]
    pub max_retries: i64,

    /// Fixed delay between attempts of the same chunk, in seconds.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: f64,

    /// Stop dispatching new chunks once a chunk has definitively failed.
    #[serde(default)]
    pub stop_on_first_error: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_parallel_requests: default_max_parallel_requests(),
            max_tuples_per_chunk: default_max_tuples_per_chunk(),
            max_retries: 0,
            retry_delay_secs: default_retry_delay_secs(),
            stop_on_first_error: false,
        }
    }
}

fn default_max_parallel_requests() -> i64 {
    1
}

fn default_max_tuples_per_chunk() -> i64 {
    MAX_TUPLES_PER_REQUEST as i64
}

fn default_retry_delay_secs() -> f64 {
    1.0
}

impl BatchOptions {
    pub fn with_max_parallel_requests(mut self, value: i64) -> Self {
        self.max_parallel_requests = value;
        self
    }

    pub fn with_max_tuples_per_chunk(mut self, value: i64) -> Self {
        self.max_tuples_per_chunk = value;
        self
    }

    pub fn with_max_retries(mut self, value: i64) -> Self {
        self.max_retries = value;
        self
    }

    pub fn with_retry_delay_secs(mut self, value: f64) -> Self {
        self.retry_delay_secs = value;
        self
    }

    pub fn with_stop_on_first_error(mut self, value: bool) -> Self {
        self.stop_on_first_error = value;
        self
    }

    /// Clamps every option into its valid range.
    ///
    /// - `max_parallel_requests` below 1 becomes 1
    /// - `max_tuples_per_chunk` is clamped to `1..=100`
    /// - negative `max_retries` becomes 0
    /// - negative or non-finite `retry_delay_secs` becomes 0
    pub fn normalize(&self) -> NormalizedBatchOptions {
        let max_parallel_requests =
            usize::try_from(self.max_parallel_requests.max(1)).unwrap_or(usize::MAX);
        let max_tuples_per_chunk = self
            .max_tuples_per_chunk
            .clamp(1, MAX_TUPLES_PER_REQUEST as i64) as usize;
        let max_retries = u32::try_from(self.max_retries.max(0)).unwrap_or(u32::MAX);
        let retry_delay = if self.retry_delay_secs.is_finite() && self.retry_delay_secs > 0.0 {
            Duration::try_from_secs_f64(self.retry_delay_secs).unwrap_or(Duration::ZERO)
        } else {
            Duration::ZERO
        };

        NormalizedBatchOptions {
            max_parallel_requests,
            max_tuples_per_chunk,
            max_retries,
            retry_delay,
            stop_on_first_error: self.stop_on_first_error,
        }
    }
}

/// Batch options with every value inside its valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedBatchOptions {
    pub max_parallel_requests: usize,
    pub max_tuples_per_chunk: usize,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub stop_on_first_error: bool,
}

impl Default for NormalizedBatchOptions {
    fn default() -> Self {
        BatchOptions::default().normalize()
    }
}
