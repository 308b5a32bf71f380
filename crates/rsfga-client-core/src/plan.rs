//! Batch planning: splitting writes and deletes into request-sized chunks.

use crate::error::{ClientError, ClientResult};
use crate::model::{TupleKey, TupleKeys};

/// Maximum number of tuple operations (writes plus deletes) the server
/// accepts in a single write request.
pub const MAX_TUPLES_PER_REQUEST: usize = 100;

/// A set of writes and deletes destined for one or more write requests.
///
/// An absent side is `None`, never an empty collection, so request bodies
/// built from a plan never carry empty `writes` or `deletes` members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchPlan {
    writes: Option<TupleKeys>,
    deletes: Option<TupleKeys>,
}

impl BatchPlan {
    /// Creates a plan. Empty collections are normalized to `None`.
    pub fn new(writes: Option<TupleKeys>, deletes: Option<TupleKeys>) -> Self {
        Self {
            writes: writes.filter(|w| !w.is_empty()),
            deletes: deletes.filter(|d| !d.is_empty()),
        }
    }

    pub fn writes(&self) -> Option<&TupleKeys> {
        self.writes.as_ref()
    }

    pub fn deletes(&self) -> Option<&TupleKeys> {
        self.deletes.as_ref()
    }

    /// Consumes the plan, returning `(writes, deletes)`.
    pub fn into_parts(self) -> (Option<TupleKeys>, Option<TupleKeys>) {
        (self.writes, self.deletes)
    }

    /// Total number of operations across both sides.
    pub fn total_operations(&self) -> usize {
        self.writes.as_ref().map_or(0, TupleKeys::len)
            + self.deletes.as_ref().map_or(0, TupleKeys::len)
    }

    pub fn is_empty(&self) -> bool {
        self.total_operations() == 0
    }

    /// Returns true if the plan does not fit in one chunk of `chunk_size`.
    pub fn requires_chunking(&self, chunk_size: usize) -> bool {
        self.total_operations() > chunk_size
    }

    /// Splits the plan into chunks of at most `chunk_size` operations.
    ///
    /// Each chunk is filled from the front of the remaining writes first and
    /// then topped up from the front of the remaining deletes. Concatenating
    /// the chunks' writes (or deletes) in order reproduces the original
    /// sequence exactly.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `chunk_size` is zero or larger than
    /// [`MAX_TUPLES_PER_REQUEST`].
    pub fn chunk(self, chunk_size: usize) -> ClientResult<Vec<BatchPlan>> {
        if chunk_size == 0 || chunk_size > MAX_TUPLES_PER_REQUEST {
            return Err(ClientError::validation(format!(
                "chunk size must be between 1 and {MAX_TUPLES_PER_REQUEST}, got {chunk_size}"
            )));
        }

        if self.is_empty() {
            return Ok(Vec::new());
        }

        if !self.requires_chunking(chunk_size) {
            return Ok(vec![self]);
        }

        let total = self.total_operations();
        let (writes, deletes) = self.into_parts();
        let mut writes = writes.map(TupleKeys::into_vec).unwrap_or_default().into_iter();
        let mut deletes = deletes.map(TupleKeys::into_vec).unwrap_or_default().into_iter();

        let mut chunks = Vec::with_capacity(total.div_ceil(chunk_size));
        loop {
            let chunk_writes: Vec<TupleKey> = writes.by_ref().take(chunk_size).collect();
            let capacity = chunk_size - chunk_writes.len();
            let chunk_deletes: Vec<TupleKey> = deletes.by_ref().take(capacity).collect();

            if chunk_writes.is_empty() && chunk_deletes.is_empty() {
                break;
            }

            chunks.push(BatchPlan::new(
                Some(TupleKeys::new(chunk_writes)),
                Some(TupleKeys::new(chunk_deletes)),
            ));
        }

        Ok(chunks)
    }
}
