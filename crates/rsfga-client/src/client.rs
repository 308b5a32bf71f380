//! Public client facade.

use std::sync::Arc;

use rsfga_client_core::{BatchOptions, ClientResult, DeduplicationStrategy, TupleKeys};

use crate::config::ClientConfig;
use crate::dispatch::DispatchOrchestrator;
use crate::outcome::BatchOutcome;
use crate::request::WriteTarget;
use crate::transport::{ApiRequest, HttpTransport, Transport};

/// Client for an OpenFGA-compatible authorization server.
///
/// # Example
///
/// ```ignore
/// use rsfga_client::{FgaClient, TupleKey, TupleKeys, BatchOptions};
///
/// let client = FgaClient::from_config(&ClientConfig::from_env()?)?;
/// let writes = TupleKeys::new(vec![TupleKey::new("user:alice", "viewer", "document:readme")]);
/// let outcome = client
///     .write_tuples(&store_id, None, Some(writes), None, false, &BatchOptions::default())
///     .await?;
/// outcome.ensure_success()?;
/// ```
pub struct FgaClient<T = HttpTransport>
where
    T: Transport,
{
    orchestrator: DispatchOrchestrator<T>,
    default_options: BatchOptions,
}

impl FgaClient<HttpTransport> {
    /// Creates a client talking HTTP to the configured server.
    ///
    /// The configured batch options become the defaults for
    /// [`write_tuples_with_defaults`](Self::write_tuples_with_defaults).
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let transport = HttpTransport::from_settings(&config.api)?;
        Ok(Self::new(Arc::new(transport)).with_default_options(config.batch.clone()))
    }
}

impl<T> FgaClient<T>
where
    T: Transport,
{
    /// Creates a client over an existing transport.
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            orchestrator: DispatchOrchestrator::new(transport),
            default_options: BatchOptions::default(),
        }
    }

    pub fn with_default_options(mut self, options: BatchOptions) -> Self {
        self.default_options = options;
        self
    }

    /// Replaces the deduplication strategy used for batch writes.
    pub fn with_deduplicator(mut self, deduplicator: Arc<dyn DeduplicationStrategy>) -> Self {
        self.orchestrator = self.orchestrator.with_deduplicator(deduplicator);
        self
    }

    pub fn default_options(&self) -> &BatchOptions {
        &self.default_options
    }

    pub fn transport(&self) -> &Arc<T> {
        self.orchestrator.transport()
    }

    /// The most recent request sent through the transport.
    pub fn last_request(&self) -> Option<ApiRequest> {
        self.transport().last_request()
    }

    /// Writes and deletes tuples in `store_id`.
    ///
    /// With `transactional` set, all operations go out in one atomic request
    /// (at most 100 after deduplication). Otherwise they are chunked and
    /// dispatched according to `options`, and per-chunk failures are reported
    /// in the returned [`BatchOutcome`].
    ///
    /// # Errors
    ///
    /// Returns a validation error, before anything is sent, for an empty
    /// store ID, an invalid tuple, or an oversized transactional write.
    pub async fn write_tuples(
        &self,
        store_id: &str,
        authorization_model_id: Option<&str>,
        writes: Option<TupleKeys>,
        deletes: Option<TupleKeys>,
        transactional: bool,
        options: &BatchOptions,
    ) -> ClientResult<BatchOutcome> {
        let target = WriteTarget::new(store_id, authorization_model_id.map(str::to_string));
        self.orchestrator
            .execute(&target, writes, deletes, transactional, options)
            .await
    }

    /// Like [`write_tuples`](Self::write_tuples), with the client's default options.
    pub async fn write_tuples_with_defaults(
        &self,
        store_id: &str,
        authorization_model_id: Option<&str>,
        writes: Option<TupleKeys>,
        deletes: Option<TupleKeys>,
        transactional: bool,
    ) -> ClientResult<BatchOutcome> {
        self.write_tuples(
            store_id,
            authorization_model_id,
            writes,
            deletes,
            transactional,
            &self.default_options,
        )
        .await
    }

    /// Writes tuples in non-transactional mode with the default options.
    pub async fn write(
        &self,
        store_id: &str,
        authorization_model_id: Option<&str>,
        writes: TupleKeys,
    ) -> ClientResult<BatchOutcome> {
        self.write_tuples_with_defaults(store_id, authorization_model_id, Some(writes), None, false)
            .await
    }

    /// Deletes tuples in non-transactional mode with the default options.
    pub async fn delete(
        &self,
        store_id: &str,
        authorization_model_id: Option<&str>,
        deletes: TupleKeys,
    ) -> ClientResult<BatchOutcome> {
        self.write_tuples_with_defaults(store_id, authorization_model_id, None, Some(deletes), false)
            .await
    }
}
