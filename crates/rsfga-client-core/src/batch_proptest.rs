//! Property-based tests for deduplication and chunking.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::dedup::filter_duplicates;
    use crate::model::{RelationshipCondition, TupleIdentity, TupleKey, TupleKeys};
    use crate::plan::BatchPlan;

    /// Small alphabets so generated batches contain plenty of duplicates.
    fn tuple_strategy() -> impl Strategy<Value = TupleKey> {
        (
            "user:[a-c]",
            prop_oneof!["viewer", "editor"],
            "document:[1-2]",
            proptest::option::of(prop_oneof!["in_region", "before_expiry"]),
        )
            .prop_map(|(user, relation, object, condition)| {
                let key = TupleKey::new(user, relation, object);
                match condition {
                    Some(name) => key.with_condition(RelationshipCondition::new(name)),
                    None => key,
                }
            })
    }

    fn side_strategy() -> impl Strategy<Value = Option<TupleKeys>> {
        proptest::option::of(
            proptest::collection::vec(tuple_strategy(), 0..40).prop_map(TupleKeys::new),
        )
    }

    fn len(keys: &Option<TupleKeys>) -> usize {
        keys.as_ref().map_or(0, TupleKeys::len)
    }

    /// True if `sub` appears in `full` in the same relative order.
    fn is_subsequence(sub: &[TupleKey], full: &[TupleKey]) -> bool {
        let mut rest = full.iter();
        sub.iter().all(|item| rest.any(|candidate| candidate == item))
    }

    proptest! {
        #[test]
        fn test_dedup_never_grows_either_side(writes in side_strategy(), deletes in side_strategy()) {
            let (w, d) = filter_duplicates(writes.clone(), deletes.clone());
            prop_assert!(len(&w) <= len(&writes));
            prop_assert!(len(&d) <= len(&deletes));
        }

        #[test]
        fn test_dedup_output_is_unique_and_ordered(writes in side_strategy(), deletes in side_strategy()) {
            let (w, d) = filter_duplicates(writes.clone(), deletes.clone());

            for (out, input) in [(&w, &writes), (&d, &deletes)] {
                if let Some(out) = out {
                    let input = input.as_ref().map(TupleKeys::as_slice).unwrap_or_default();
                    prop_assert!(is_subsequence(out.as_slice(), input));
                    let mut identities: Vec<TupleIdentity> = out.iter().map(TupleKey::identity).collect();
                    let before = identities.len();
                    identities.sort();
                    identities.dedup();
                    prop_assert_eq!(before, identities.len());
                }
            }
        }

        #[test]
        fn test_dedup_deletes_keep_first_occurrences(deletes in side_strategy()) {
            let (_, d) = filter_duplicates(None, deletes.clone());
            let mut expected: Vec<TupleKey> = Vec::new();
            for key in deletes.into_iter().flatten() {
                if !expected.contains(&key) {
                    expected.push(key);
                }
            }
            prop_assert_eq!(d.map(TupleKeys::into_vec).unwrap_or_default(), expected);
        }

        #[test]
        fn test_dedup_writes_never_overlap_deletes(writes in side_strategy(), deletes in side_strategy()) {
            let (w, d) = filter_duplicates(writes, deletes);
            if let (Some(w), Some(d)) = (w, d) {
                for key in w.iter() {
                    prop_assert!(!d.iter().any(|del| del == key));
                }
            }
        }

        #[test]
        fn test_dedup_is_idempotent(writes in side_strategy(), deletes in side_strategy()) {
            let once = filter_duplicates(writes, deletes);
            let twice = filter_duplicates(once.0.clone(), once.1.clone());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_chunks_reassemble_original_order(
            writes in side_strategy(),
            deletes in side_strategy(),
            chunk_size in 1usize..=100,
        ) {
            let plan = BatchPlan::new(writes, deletes);
            let expected_writes: Vec<TupleKey> = plan.writes().map(|w| w.as_slice().to_vec()).unwrap_or_default();
            let expected_deletes: Vec<TupleKey> = plan.deletes().map(|d| d.as_slice().to_vec()).unwrap_or_default();
            let total = plan.total_operations();

            let chunks = plan.chunk(chunk_size).unwrap();

            let mut all_writes = Vec::new();
            let mut all_deletes = Vec::new();
            for chunk in &chunks {
                prop_assert!(chunk.total_operations() <= chunk_size);
                prop_assert!(!chunk.is_empty());
                all_writes.extend(chunk.writes().into_iter().flatten().cloned());
                all_deletes.extend(chunk.deletes().into_iter().flatten().cloned());
            }
            prop_assert_eq!(all_writes, expected_writes);
            prop_assert_eq!(all_deletes, expected_deletes);
            prop_assert_eq!(chunks.len(), total.div_ceil(chunk_size));
        }

        #[test]
        fn test_no_writes_follow_a_chunk_with_deletes(
            writes in side_strategy(),
            deletes in side_strategy(),
            chunk_size in 1usize..=10,
        ) {
            let chunks = BatchPlan::new(writes, deletes).chunk(chunk_size).unwrap();
            let mut seen_deletes = false;
            for chunk in &chunks {
                if seen_deletes {
                    prop_assert!(chunk.writes().is_none());
                }
                seen_deletes |= chunk.deletes().is_some();
            }
        }

        #[test]
        fn test_plan_that_fits_is_single_chunk(writes in side_strategy(), deletes in side_strategy()) {
            let plan = BatchPlan::new(writes, deletes);
            prop_assume!(!plan.is_empty());
            let chunks = plan.clone().chunk(100).unwrap();
            prop_assert_eq!(chunks, vec![plan]);
        }
    }
}
