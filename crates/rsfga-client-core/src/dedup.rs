//! Duplicate and conflict removal for batch writes.
//!
//! Within writes and within deletes, the first occurrence of a tuple wins.
//! Across the two sides, a delete wins: a tuple present in both is dropped
//! from the writes. Matching uses the full tuple identity, condition included,
//! so a conditioned write is never removed by an unconditioned delete.

use std::collections::HashSet;

use crate::model::{TupleIdentity, TupleKeys};

/// Strategy for removing redundant entries from a batch of writes and deletes.
pub trait DeduplicationStrategy: Send + Sync {
    /// Returns the filtered `(writes, deletes)` pair.
    ///
    /// A side that ends up with no tuples is returned as `None`.
    fn filter_duplicates(
        &self,
        writes: Option<TupleKeys>,
        deletes: Option<TupleKeys>,
    ) -> (Option<TupleKeys>, Option<TupleKeys>);
}

/// Default strategy keyed on [`TupleKey::identity`](crate::model::TupleKey::identity).
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityDeduplicator;

impl DeduplicationStrategy for IdentityDeduplicator {
    fn filter_duplicates(
        &self,
        writes: Option<TupleKeys>,
        deletes: Option<TupleKeys>,
    ) -> (Option<TupleKeys>, Option<TupleKeys>) {
        filter_duplicates(writes, deletes)
    }
}

/// Removes duplicates within each side and drops writes that are also deleted.
pub fn filter_duplicates(
    writes: Option<TupleKeys>,
    deletes: Option<TupleKeys>,
) -> (Option<TupleKeys>, Option<TupleKeys>) {
    let (writes, _) = dedup_side(writes);
    let (deletes, deleted) = dedup_side(deletes);

    let writes = writes.map(|keys| {
        keys.into_iter()
            .filter(|key| !deleted.contains(&key.identity()))
            .collect::<TupleKeys>()
    });

    (non_empty(writes), non_empty(deletes))
}

/// Keeps the first occurrence of each identity, preserving order.
fn dedup_side(keys: Option<TupleKeys>) -> (Option<TupleKeys>, HashSet<TupleIdentity>) {
    let Some(keys) = keys else {
        return (None, HashSet::new());
    };

    let mut seen: HashSet<TupleIdentity> = HashSet::with_capacity(keys.len());
    let unique = keys
        .into_iter()
        .filter(|key| seen.insert(key.identity()))
        .collect::<TupleKeys>();

    (Some(unique), seen)
}

fn non_empty(keys: Option<TupleKeys>) -> Option<TupleKeys> {
    keys.filter(|k| !k.is_empty())
}
