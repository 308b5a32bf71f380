//! rsfga-client-core: Batch tuple primitives for the RSFGA client
//!
//! This crate contains the pure, I/O-free parts of the batch write engine:
//! - Tuple key types and the ordered tuple collection
//! - Deduplication with delete-wins conflict resolution
//! - Batch planning and chunking under the per-request limit
//! - Batch options and their normalization
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │             rsfga-client-core                │
//! ├─────────────────────────────────────────────┤
//! │  model.rs   - TupleKey, TupleKeys           │
//! │  dedup.rs   - Duplicate/conflict removal    │
//! │  plan.rs    - BatchPlan chunking            │
//! │  options.rs - BatchOptions normalization    │
//! │  error.rs   - ClientError taxonomy          │
//! └─────────────────────────────────────────────┘
//! ```

pub mod dedup;
pub mod error;
pub mod model;
pub mod options;
pub mod plan;

#[cfg(test)]
mod batch_proptest;

// Re-export commonly used types at the crate root
pub use dedup::{filter_duplicates, DeduplicationStrategy, IdentityDeduplicator};
pub use error::{ClientError, ClientResult};
pub use model::{RelationshipCondition, TupleIdentity, TupleKey, TupleKeys};
pub use options::{BatchOptions, NormalizedBatchOptions};
pub use plan::{BatchPlan, MAX_TUPLES_PER_REQUEST};
