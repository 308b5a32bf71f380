//! Batch write orchestrator implementation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use rsfga_client_core::{
    BatchOptions, BatchPlan, ClientError, ClientResult, DeduplicationStrategy,
    IdentityDeduplicator, NormalizedBatchOptions, TupleKeys, MAX_TUPLES_PER_REQUEST,
};
use tracing::{debug, info, warn};

use crate::outcome::BatchOutcome;
use crate::request::WriteTarget;
use crate::retry::{FixedDelayRetry, RetryPolicy};
use crate::transport::{ApiResponse, Transport};

/// Terminal state of one chunk.
#[derive(Debug)]
enum ChunkResult {
    Succeeded(ApiResponse),
    Failed(ClientError),
}

/// Executes batch writes against a transport.
///
/// Deduplicates the input, then either sends one atomic request
/// (transactional mode) or plans chunks and dispatches them sequentially or
/// with bounded concurrency, retrying failed chunks.
pub struct DispatchOrchestrator<T>
where
    T: Transport,
{
    transport: Arc<T>,
    deduplicator: Arc<dyn DeduplicationStrategy>,
}

impl<T> DispatchOrchestrator<T>
where
    T: Transport,
{
    /// Creates an orchestrator using identity-based deduplication.
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            deduplicator: Arc::new(IdentityDeduplicator),
        }
    }

    /// Replaces the deduplication strategy.
    pub fn with_deduplicator(mut self, deduplicator: Arc<dyn DeduplicationStrategy>) -> Self {
        self.deduplicator = deduplicator;
        self
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Executes a batch write.
    ///
    /// Chunk failures are recorded in the returned [`BatchOutcome`]. An `Err`
    /// is only returned for invalid input, before anything is sent.
    pub async fn execute(
        &self,
        target: &WriteTarget,
        writes: Option<TupleKeys>,
        deletes: Option<TupleKeys>,
        transactional: bool,
        options: &BatchOptions,
    ) -> ClientResult<BatchOutcome> {
        target.validate()?;
        if let Some(writes) = &writes {
            writes.validate("writes")?;
        }
        if let Some(deletes) = &deletes {
            deletes.validate("deletes")?;
        }

        let (writes, deletes) = self.deduplicator.filter_duplicates(writes, deletes);
        if writes.is_none() && deletes.is_none() {
            debug!(store_id = %target.store_id, "Nothing to write after deduplication");
            return Ok(BatchOutcome::default());
        }

        let plan = BatchPlan::new(writes, deletes);
        if transactional {
            return self.execute_transactional(target, plan).await;
        }

        let options = options.normalize();
        let total_operations = plan.total_operations();
        let chunks = plan.chunk(options.max_tuples_per_chunk)?;
        let mut outcome = BatchOutcome::new(total_operations, chunks.len());

        debug!(
            store_id = %target.store_id,
            total_operations,
            total_chunks = chunks.len(),
            max_parallel_requests = options.max_parallel_requests,
            "Dispatching batch write"
        );

        let retry = FixedDelayRetry::from_options(&options);
        if options.max_parallel_requests == 1 {
            self.dispatch_sequential(target, chunks, &retry, &options, &mut outcome)
                .await;
        } else {
            self.dispatch_parallel(target, chunks, &retry, &options, &mut outcome)
                .await;
        }

        info!(
            store_id = %target.store_id,
            total_chunks = outcome.total_chunks(),
            successful_chunks = outcome.successful_chunks(),
            failed_chunks = outcome.failed_chunks(),
            "Batch write completed"
        );

        Ok(outcome)
    }

    /// Sends the whole plan as one atomic request.
    async fn execute_transactional(
        &self,
        target: &WriteTarget,
        plan: BatchPlan,
    ) -> ClientResult<BatchOutcome> {
        let total_operations = plan.total_operations();
        if total_operations > MAX_TUPLES_PER_REQUEST {
            return Err(ClientError::validation(format!(
                "transactional write contains {total_operations} tuples, exceeding the limit of \
                 {MAX_TUPLES_PER_REQUEST} per request; use non-transactional mode to split it"
            )));
        }

        let mut outcome = BatchOutcome::new(total_operations, 1);
        let result = match target.request_for(&plan) {
            Ok(request) => self.transport.send(request).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(response) => outcome.record_success(response),
            Err(error) => {
                warn!(store_id = %target.store_id, %error, "Transactional write failed");
                outcome.record_failure(error);
            }
        }

        Ok(outcome)
    }

    /// Dispatches chunks one at a time, in planned order.
    async fn dispatch_sequential(
        &self,
        target: &WriteTarget,
        chunks: Vec<BatchPlan>,
        retry: &dyn RetryPolicy,
        options: &NormalizedBatchOptions,
        outcome: &mut BatchOutcome,
    ) {
        let total = chunks.len();
        for (index, chunk) in chunks.iter().enumerate() {
            match self.dispatch_chunk(target, index, chunk, retry).await {
                ChunkResult::Succeeded(response) => outcome.record_success(response),
                ChunkResult::Failed(error) => {
                    outcome.record_failure(error);
                    if options.stop_on_first_error {
                        warn!(
                            store_id = %target.store_id,
                            skipped_chunks = total - index - 1,
                            "Stopping batch write after first failed chunk"
                        );
                        break;
                    }
                }
            }
        }
    }

    /// Dispatches chunks with at most `max_parallel_requests` in flight.
    ///
    /// Chunks start in planned order but may complete in any order. Once a
    /// chunk fails with `stop_on_first_error` set, chunks that have not started
    /// are skipped; chunks already in flight still finish and are recorded.
    async fn dispatch_parallel(
        &self,
        target: &WriteTarget,
        chunks: Vec<BatchPlan>,
        retry: &dyn RetryPolicy,
        options: &NormalizedBatchOptions,
        outcome: &mut BatchOutcome,
    ) {
        let halted = AtomicBool::new(false);
        let stop_on_first_error = options.stop_on_first_error;

        let mut results = stream::iter(chunks.iter().enumerate())
            .map(|(index, chunk)| {
                let halted = &halted;
                async move {
                    if halted.load(Ordering::Acquire) {
                        return None;
                    }
                    let result = self.dispatch_chunk(target, index, chunk, retry).await;
                    if stop_on_first_error && matches!(result, ChunkResult::Failed(_)) {
                        halted.store(true, Ordering::Release);
                    }
                    Some(result)
                }
            })
            .buffer_unordered(options.max_parallel_requests);

        let mut skipped = 0usize;
        while let Some(result) = results.next().await {
            match result {
                Some(ChunkResult::Succeeded(response)) => outcome.record_success(response),
                Some(ChunkResult::Failed(error)) => outcome.record_failure(error),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(
                store_id = %target.store_id,
                skipped_chunks = skipped,
                "Stopped dispatching chunks after first failed chunk"
            );
        }
    }

    /// Sends one chunk, retrying according to `retry`.
    async fn dispatch_chunk(
        &self,
        target: &WriteTarget,
        index: usize,
        chunk: &BatchPlan,
        retry: &dyn RetryPolicy,
    ) -> ChunkResult {
        let request = match target.request_for(chunk) {
            Ok(request) => request,
            Err(error) => return ChunkResult::Failed(error),
        };

        let mut failed_attempts: u32 = 0;
        loop {
            debug!(
                chunk = index,
                attempt = failed_attempts + 1,
                operations = chunk.total_operations(),
                "Sending chunk"
            );

            let error = match self.transport.send(request.clone()).await {
                Ok(response) => return ChunkResult::Succeeded(response),
                Err(error) => error,
            };
            failed_attempts += 1;

            match retry.next_delay(failed_attempts, &error) {
                Some(delay) => {
                    warn!(
                        chunk = index,
                        attempt = failed_attempts,
                        delay_ms = delay.as_millis() as u64,
                        %error,
                        "Chunk attempt failed, retrying"
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                None => {
                    warn!(
                        chunk = index,
                        attempts = failed_attempts,
                        %error,
                        "Chunk failed"
                    );
                    return ChunkResult::Failed(error);
                }
            }
        }
    }
}
