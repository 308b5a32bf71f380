//! rsfga-client: Client SDK for OpenFGA-compatible authorization servers
//!
//! This crate contains the I/O side of the client:
//! - HTTP transport and write request construction
//! - Batch write dispatch with chunking, bounded concurrency, and retries
//! - Aggregated batch outcomes with partial-success reporting
//! - Configuration and logging setup
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                rsfga-client                  │
//! ├─────────────────────────────────────────────┤
//! │  client.rs        - FgaClient facade        │
//! │  dispatch/        - Batch orchestrator      │
//! │  outcome.rs       - BatchOutcome            │
//! │  retry.rs         - Retry policies          │
//! │  request.rs       - Write request body      │
//! │  transport/       - Transport, HTTP         │
//! │  config.rs        - Configuration loading   │
//! │  observability.rs - Logging setup           │
//! └─────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod config;
pub mod dispatch;
pub mod observability;
pub mod outcome;
pub mod request;
pub mod retry;
pub mod transport;

// Re-exports for convenience
pub use client::FgaClient;
pub use config::{ClientConfig, ConfigLoadError};
pub use dispatch::DispatchOrchestrator;
pub use outcome::{BatchOutcome, BatchSummary};
pub use request::WriteTarget;
pub use retry::{FixedDelayRetry, RetryPolicy};
pub use rsfga_client_core::{
    BatchOptions, BatchPlan, ClientError, ClientResult, DeduplicationStrategy,
    IdentityDeduplicator, RelationshipCondition, TupleKey, TupleKeys, MAX_TUPLES_PER_REQUEST,
};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
