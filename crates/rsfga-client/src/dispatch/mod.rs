//! Batch tuple write dispatch.
//!
//! Turns an arbitrary number of writes and deletes into one or more write
//! requests:
//!
//! 1. **Deduplication**: duplicates collapse to their first occurrence and a
//!    delete overrides a write of the same tuple
//! 2. **Transactional mode**: everything goes out in one atomic request,
//!    capped at 100 operations
//! 3. **Non-transactional mode**: the batch is chunked and chunks are sent
//!    sequentially or with bounded concurrency, each with its own retries
//!
//! Chunk failures never surface as `Err`; they are collected in the
//! [`BatchOutcome`](crate::outcome::BatchOutcome).

mod orchestrator;

pub use orchestrator::DispatchOrchestrator;
