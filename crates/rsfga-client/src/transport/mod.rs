//! Transport abstraction for talking to an OpenFGA-compatible server.
//!
//! The batch engine only needs to send a request and get a response or an
//! error back. [`HttpTransport`] is the production implementation; tests
//! inject their own.

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use reqwest::Method;
use rsfga_client_core::ClientResult;
use serde_json::Value;

/// A request to the API, relative to the transport's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path beginning with `/` (e.g., "/stores/01H.../write").
    pub path: String,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Creates a POST request with a JSON body.
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// A successful API response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Decoded JSON body (`Null` for an empty body).
    pub body: Value,
}

/// Sends requests to the server.
///
/// Implementations must be thread-safe (Send + Sync): a batch write may
/// issue several requests concurrently through the same transport.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Sends a request.
    ///
    /// Returns `ClientError::Transport` for network failures and
    /// `ClientError::Service` for non-success responses.
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse>;

    /// Returns the most recently sent request, for diagnostics.
    fn last_request(&self) -> Option<ApiRequest>;
}
