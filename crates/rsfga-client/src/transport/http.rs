//! HTTP transport backed by `reqwest`.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use rsfga_client_core::{ClientError, ClientResult};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{ApiRequest, ApiResponse, Transport};
use crate::config::ApiSettings;

/// Default request timeout when none is configured.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport that sends JSON requests over HTTP.
///
/// Owns a single `reqwest::Client` for its whole lifetime so the connection
/// pool is reused across requests.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    api_token: Option<String>,
    last_request: Mutex<Option<ApiRequest>>,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl HttpTransport {
    /// Creates a transport for `base_url` with the default timeout.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a transport for `base_url` with a request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let parsed = Url::parse(base_url).map_err(|e| {
            ClientError::validation(format!("invalid API URL '{base_url}': {e}"))
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            api_token: None,
            last_request: Mutex::new(None),
        })
    }

    /// Creates a transport from API settings.
    pub fn from_settings(settings: &ApiSettings) -> ClientResult<Self> {
        let transport =
            Self::with_timeout(&settings.url, Duration::from_secs(settings.timeout_secs))?;
        Ok(match &settings.api_token {
            Some(token) if !token.is_empty() => transport.with_api_token(token.clone()),
            _ => transport,
        })
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn remember(&self, request: &ApiRequest) {
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *last = Some(request.clone());
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        self.remember(&request);

        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.client.request(request.method.clone(), &url);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::transport(e.to_string()))?;

        debug!(status = status.as_u16(), "Received response");

        if !status.is_success() {
            return Err(service_error(status, &text));
        }

        let body = success_body(&text);

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }

    fn last_request(&self) -> Option<ApiRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// Decodes the body of a 2xx response.
///
/// The write has already been applied by then, so a body that isn't JSON is
/// kept as a string instead of failing the request.
fn success_body(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    match serde_json::from_str(trimmed) {
        Ok(body) => body,
        Err(error) => {
            warn!(%error, "Success response body is not JSON, keeping it as text");
            Value::String(trimmed.to_string())
        }
    }
}

/// Maps a non-success response to a service error.
///
/// OpenFGA error bodies look like `{"code": "...", "message": "..."}`. Bodies
/// that don't follow that shape fall back to the status reason.
fn service_error(status: StatusCode, text: &str) -> ClientError {
    let body: Value = serde_json::from_str(text).unwrap_or(Value::Null);
    let reason = status.canonical_reason().unwrap_or("unknown status");

    let code = match body.get("code") {
        Some(Value::String(code)) => code.clone(),
        Some(Value::Number(code)) => code.to_string(),
        _ => reason.to_lowercase().replace(' ', "_"),
    };
    let message = match body.get("message").and_then(Value::as_str) {
        Some(message) => message.to_string(),
        None if !text.trim().is_empty() && body.is_null() => text.trim().to_string(),
        None => reason.to_string(),
    };

    ClientError::Service {
        status: status.as_u16(),
        code,
        message,
    }
}
