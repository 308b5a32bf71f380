//! Tuple key value types and the ordered tuple collection used for writes and deletes.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClientError, ClientResult};

/// Condition attached to a relationship tuple.
///
/// `name` must match a condition defined in the authorization model. The
/// optional `context` holds parameter values evaluated with the condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipCondition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
}

impl RelationshipCondition {
    /// Creates a condition without context parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: None,
        }
    }

    /// Sets the context parameters for this condition.
    pub fn with_context(mut self, context: Map<String, Value>) -> Self {
        self.context = Some(context);
        self
    }
}

/// A relationship tuple key: `user` has `relation` on `object`, optionally
/// under a condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TupleKey {
    /// The user (e.g., "user:alice" or "group:eng#member").
    pub user: String,
    /// The relation (e.g., "viewer").
    pub relation: String,
    /// The object (e.g., "document:readme").
    pub object: String,
    /// Optional condition for conditional relationships.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<RelationshipCondition>,
}

impl TupleKey {
    /// Creates an unconditioned tuple key.
    pub fn new(
        user: impl Into<String>,
        relation: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            relation: relation.into(),
            object: object.into(),
            condition: None,
        }
    }

    /// Attaches a condition to this tuple key.
    pub fn with_condition(mut self, condition: RelationshipCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Returns the composite identity used for deduplication.
    ///
    /// Two keys have the same identity exactly when they are equal, including
    /// the condition name and context. Context objects are compared in
    /// canonical form, so key insertion order does not matter.
    pub fn identity(&self) -> TupleIdentity {
        TupleIdentity {
            user: self.user.clone(),
            relation: self.relation.clone(),
            object: self.object.clone(),
            condition: self.condition.as_ref().map(|c| {
                let context = c
                    .context
                    .as_ref()
                    .map(|ctx| canonical_json(&Value::Object(ctx.clone())).to_string());
                (c.name.clone(), context)
            }),
        }
    }

    /// Checks that user, relation, and object are non-empty.
    pub fn validate(&self) -> ClientResult<()> {
        if self.user.is_empty() {
            return Err(ClientError::validation("user cannot be empty"));
        }
        if self.relation.is_empty() {
            return Err(ClientError::validation("relation cannot be empty"));
        }
        if self.object.is_empty() {
            return Err(ClientError::validation("object cannot be empty"));
        }
        Ok(())
    }
}

/// Field-wise identity of a [`TupleKey`].
///
/// Each field is kept separately, so no choice of field contents can make two
/// different keys collide. The condition context is held as canonical JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TupleIdentity {
    user: String,
    relation: String,
    object: String,
    condition: Option<(String, Option<String>)>,
}

/// Rebuilds `value` with every object's keys inserted in sorted order.
///
/// The rendering is the same whether or not `serde_json` preserves insertion
/// order.
fn canonical_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, Value> =
                map.iter().map(|(k, v)| (k, canonical_json(v))).collect();
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), v))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonical_json).collect()),
        other => other.clone(),
    }
}

impl fmt::Display for TupleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.object, self.relation, self.user)?;
        if let Some(condition) = &self.condition {
            write!(f, " [{}]", condition.name)?;
        }
        Ok(())
    }
}

/// Ordered collection of tuple keys.
///
/// Serializes to the wire fragment `{ "tuple_keys": [...] }` used by the
/// `writes` and `deletes` members of a write request. Insertion order is
/// preserved by every batching step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TupleKeys {
    tuple_keys: Vec<TupleKey>,
}

impl TupleKeys {
    /// Creates a collection from an owned vector.
    pub fn new(tuple_keys: Vec<TupleKey>) -> Self {
        Self { tuple_keys }
    }

    /// Creates a collection by cloning a slice.
    pub fn from_slice(tuple_keys: &[TupleKey]) -> Self {
        Self {
            tuple_keys: tuple_keys.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.tuple_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuple_keys.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TupleKey> {
        self.tuple_keys.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TupleKey> {
        self.tuple_keys.iter()
    }

    pub fn as_slice(&self) -> &[TupleKey] {
        &self.tuple_keys
    }

    pub fn into_vec(self) -> Vec<TupleKey> {
        self.tuple_keys
    }

    /// Validates every key, reporting the index of the first invalid one.
    pub fn validate(&self, side: &str) -> ClientResult<()> {
        for (index, key) in self.tuple_keys.iter().enumerate() {
            if let Err(ClientError::Validation { message }) = key.validate() {
                return Err(ClientError::validation(format!(
                    "invalid tuple at index {index} in {side}: {message}"
                )));
            }
        }
        Ok(())
    }
}

impl From<Vec<TupleKey>> for TupleKeys {
    fn from(tuple_keys: Vec<TupleKey>) -> Self {
        Self::new(tuple_keys)
    }
}

impl FromIterator<TupleKey> for TupleKeys {
    fn from_iter<I: IntoIterator<Item = TupleKey>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for TupleKeys {
    type Item = TupleKey;
    type IntoIter = std::vec::IntoIter<TupleKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.tuple_keys.into_iter()
    }
}

impl<'a> IntoIterator for &'a TupleKeys {
    type Item = &'a TupleKey;
    type IntoIter = std::slice::Iter<'a, TupleKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.tuple_keys.iter()
    }
}

impl Index<usize> for TupleKeys {
    type Output = TupleKey;

    fn index(&self, index: usize) -> &Self::Output {
        &self.tuple_keys[index]
    }
}
