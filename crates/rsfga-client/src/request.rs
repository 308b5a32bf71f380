//! Write request construction.

use rsfga_client_core::{BatchPlan, ClientError, ClientResult, TupleKeys};
use serde::Serialize;

use crate::transport::ApiRequest;

/// Destination of a batch write: a store and, optionally, a pinned model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteTarget {
    pub store_id: String,
    pub authorization_model_id: Option<String>,
}

/// Wire body of `POST /stores/{store_id}/write`.
///
/// Absent members are omitted rather than sent as empty arrays.
#[derive(Debug, Serialize)]
struct WriteRequestBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    writes: Option<&'a TupleKeys>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deletes: Option<&'a TupleKeys>,
    #[serde(skip_serializing_if = "Option::is_none")]
    authorization_model_id: Option<&'a str>,
}

impl WriteTarget {
    pub fn new(store_id: impl Into<String>, authorization_model_id: Option<String>) -> Self {
        Self {
            store_id: store_id.into(),
            authorization_model_id,
        }
    }

    /// Rejects an empty store ID or an empty model ID.
    pub fn validate(&self) -> ClientResult<()> {
        if self.store_id.trim().is_empty() {
            return Err(ClientError::validation("store_id cannot be empty"));
        }
        if matches!(&self.authorization_model_id, Some(id) if id.trim().is_empty()) {
            return Err(ClientError::validation(
                "authorization_model_id cannot be empty when provided",
            ));
        }
        Ok(())
    }

    /// Builds the write request carrying every operation in `plan`.
    pub fn request_for(&self, plan: &BatchPlan) -> ClientResult<ApiRequest> {
        let body = WriteRequestBody {
            writes: plan.writes(),
            deletes: plan.deletes(),
            authorization_model_id: self.authorization_model_id.as_deref(),
        };
        Ok(ApiRequest::post(
            format!("/stores/{}/write", self.store_id),
            serde_json::to_value(&body)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use rsfga_client_core::TupleKey;
    use serde_json::json;

    #[test]
    fn test_request_omits_absent_members() {
        let target = WriteTarget::new("store-1", None);
        let plan = BatchPlan::new(
            Some(TupleKeys::new(vec![TupleKey::new(
                "user:alice",
                "viewer",
                "document:1",
            )])),
            None,
        );

        let request = target.request_for(&plan).unwrap();

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/stores/store-1/write");
        assert_eq!(
            request.body,
            Some(json!({
                "writes": {"tuple_keys": [
                    {"user": "user:alice", "relation": "viewer", "object": "document:1"}
                ]}
            }))
        );
    }

    #[test]
    fn test_request_includes_deletes_and_model_id() {
        let target = WriteTarget::new("store-1", Some("model-1".to_string()));
        let plan = BatchPlan::new(
            None,
            Some(TupleKeys::new(vec![TupleKey::new(
                "user:bob",
                "editor",
                "document:2",
            )])),
        );

        let body = target.request_for(&plan).unwrap().body.unwrap();

        assert!(body.get("writes").is_none());
        assert_eq!(body["deletes"]["tuple_keys"][0]["user"], "user:bob");
        assert_eq!(body["authorization_model_id"], "model-1");
    }

    #[test]
    fn test_validate_rejects_empty_ids() {
        assert!(WriteTarget::new("", None).validate().is_err());
        assert!(WriteTarget::new("store", Some(" ".to_string()))
            .validate()
            .is_err());
        assert!(WriteTarget::new("store", Some("model".to_string()))
            .validate()
            .is_ok());
    }
}
