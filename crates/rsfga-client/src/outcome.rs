//! Aggregated result of a batch write.

use rsfga_client_core::{ClientError, ClientResult};
use serde::Serialize;

use crate::transport::ApiResponse;

/// Result of a batch write across all of its chunks.
///
/// Chunk failures are recorded here as data rather than returned as errors,
/// so a caller can tell total success, total failure, and partial success
/// apart. Callers that want any failure to be an error use
/// [`BatchOutcome::ensure_success`].
///
/// `total_chunks` is the number of chunks planned. When dispatch stops on the
/// first error, `successful_chunks + failed_chunks` can be lower.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    total_operations: usize,
    total_chunks: usize,
    successful_chunks: usize,
    failed_chunks: usize,
    responses: Vec<ApiResponse>,
    errors: Vec<ClientError>,
}

impl BatchOutcome {
    /// Creates an empty outcome for a planned batch.
    pub(crate) fn new(total_operations: usize, total_chunks: usize) -> Self {
        Self {
            total_operations,
            total_chunks,
            ..Default::default()
        }
    }

    /// Records a chunk that succeeded.
    pub(crate) fn record_success(&mut self, response: ApiResponse) {
        self.successful_chunks += 1;
        self.responses.push(response);
    }

    /// Records a chunk that failed after exhausting its retries.
    pub(crate) fn record_failure(&mut self, error: ClientError) {
        self.failed_chunks += 1;
        self.errors.push(error);
    }

    pub fn total_operations(&self) -> usize {
        self.total_operations
    }

    pub fn total_chunks(&self) -> usize {
        self.total_chunks
    }

    pub fn successful_chunks(&self) -> usize {
        self.successful_chunks
    }

    pub fn failed_chunks(&self) -> usize {
        self.failed_chunks
    }

    /// Responses of successful chunks, in completion order.
    pub fn responses(&self) -> &[ApiResponse] {
        &self.responses
    }

    /// Errors of failed chunks, in completion order.
    pub fn errors(&self) -> &[ClientError] {
        &self.errors
    }

    /// Fraction of planned chunks that succeeded (0.0 when nothing was planned).
    pub fn success_rate(&self) -> f64 {
        if self.total_chunks == 0 {
            return 0.0;
        }
        self.successful_chunks as f64 / self.total_chunks as f64
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed_chunks == 0 && self.total_chunks > 0
    }

    pub fn is_complete_failure(&self) -> bool {
        self.successful_chunks == 0 && self.total_chunks > 0
    }

    pub fn is_partial_success(&self) -> bool {
        self.successful_chunks > 0 && self.failed_chunks > 0
    }

    /// The earliest recorded error, if any.
    pub fn first_error(&self) -> Option<&ClientError> {
        self.errors.first()
    }

    /// Returns the first recorded error if any chunk failed.
    ///
    /// Falls back to `ClientError::AggregateFailure` when chunks failed
    /// without a recorded error.
    pub fn ensure_success(&self) -> ClientResult<()> {
        if self.failed_chunks == 0 {
            return Ok(());
        }
        Err(self
            .first_error()
            .cloned()
            .unwrap_or(ClientError::AggregateFailure {
                failed_chunks: self.failed_chunks,
                total_chunks: self.total_chunks,
            }))
    }

    /// Serializable summary for logs and reports.
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            total_operations: self.total_operations,
            total_chunks: self.total_chunks,
            successful_chunks: self.successful_chunks,
            failed_chunks: self.failed_chunks,
            success_rate: self.success_rate(),
            errors: self.errors.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Plain-data view of a [`BatchOutcome`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total_operations: usize,
    pub total_chunks: usize,
    pub successful_chunks: usize,
    pub failed_chunks: usize,
    pub success_rate: f64,
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn ok_response() -> ApiResponse {
        ApiResponse {
            status: 200,
            body: json!({}),
        }
    }

    #[test]
    fn test_empty_outcome() {
        let outcome = BatchOutcome::default();
        assert_eq!(outcome.success_rate(), 0.0);
        assert!(!outcome.is_complete_success());
        assert!(!outcome.is_complete_failure());
        assert!(!outcome.is_partial_success());
        assert!(outcome.first_error().is_none());
        assert!(outcome.ensure_success().is_ok());
    }

    #[test]
    fn test_complete_success() {
        let mut outcome = BatchOutcome::new(4, 2);
        outcome.record_success(ok_response());
        outcome.record_success(ok_response());

        assert!(outcome.is_complete_success());
        assert!(!outcome.is_partial_success());
        assert_eq!(outcome.success_rate(), 1.0);
        assert_eq!(outcome.responses().len(), 2);
        assert!(outcome.ensure_success().is_ok());
    }

    #[test]
    fn test_partial_success_reports_first_error() {
        let mut outcome = BatchOutcome::new(6, 3);
        outcome.record_success(ok_response());
        outcome.record_failure(ClientError::transport("first"));
        outcome.record_failure(ClientError::transport("second"));

        assert!(outcome.is_partial_success());
        assert!(!outcome.is_complete_success());
        assert!(!outcome.is_complete_failure());
        assert!((outcome.success_rate() - 1.0 / 3.0).abs() < f64::EPSILON);
        assert_eq!(outcome.first_error(), Some(&ClientError::transport("first")));
        assert_eq!(
            outcome.ensure_success(),
            Err(ClientError::transport("first"))
        );
    }

    #[test]
    fn test_complete_failure() {
        let mut outcome = BatchOutcome::new(1, 1);
        outcome.record_failure(ClientError::validation("bad"));
        assert!(outcome.is_complete_failure());
        assert_eq!(outcome.success_rate(), 0.0);
    }

    #[test]
    fn test_aggregate_failure_when_no_error_was_captured() {
        let outcome = BatchOutcome {
            total_operations: 2,
            total_chunks: 2,
            failed_chunks: 1,
            ..Default::default()
        };
        assert_eq!(
            outcome.ensure_success(),
            Err(ClientError::AggregateFailure {
                failed_chunks: 1,
                total_chunks: 2,
            })
        );
    }

    #[test]
    fn test_summary_serializes_counts_and_errors() {
        let mut outcome = BatchOutcome::new(3, 2);
        outcome.record_success(ok_response());
        outcome.record_failure(ClientError::transport("timeout"));

        let value = serde_json::to_value(outcome.summary()).unwrap();

        assert_eq!(value["total_operations"], 3);
        assert_eq!(value["successful_chunks"], 1);
        assert_eq!(value["failed_chunks"], 1);
        assert_eq!(value["success_rate"], 0.5);
        assert_eq!(
            value["errors"],
            Value::Array(vec![json!("transport error: timeout")])
        );
    }
}
