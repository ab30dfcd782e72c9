//! HTTP client abstraction for backend calls.
//!
//! The `HttpClient` trait decouples the orchestration logic from the
//! transport, enabling testability with a mock implementation. Requests carry
//! an absolute URL, optional headers, and either a JSON or raw-byte body,
//! covering both case-creation calls and plan-directed uploads.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use crate::error::{IntakeError, Result};

/// Body of an outgoing request.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Bytes(Bytes),
}

/// One request to execute against a backend.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    /// Extra headers; entries with empty values are skipped.
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn empty(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn json(
        method: impl Into<String>,
        url: impl Into<String>,
        body: serde_json::Value,
    ) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Json(body),
        }
    }

    pub fn bytes(method: impl Into<String>, url: impl Into<String>, body: Bytes) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Bytes(body),
        }
    }
}

/// Response from an HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Reason phrase for the status, when the transport knows one.
    pub status_text: Option<String>,
    /// Response body as a string
    pub body: String,
}

impl HttpResponse {
    /// Success is any 2xx status; no particular body is required.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for executing HTTP requests.
///
/// The production implementation uses reqwest; tests swap in
/// [`MockHttpClient`] so no sockets are opened.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request.
    ///
    /// # Errors
    /// Returns an error if the request fails at the transport level (network,
    /// invalid method or URL). Non-success status codes are not errors here;
    /// callers inspect the returned status.
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

// ============================================================================
// Production implementation using reqwest
// ============================================================================

/// Production HTTP client using reqwest.
#[derive(Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let method: reqwest::Method = request
            .method
            .parse()
            .map_err(|_| IntakeError::InvalidMethod(request.method.clone()))?;

        let mut req = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            if !value.is_empty() {
                req = req.header(name, value);
            }
        }
        req = match &request.body {
            RequestBody::Empty => req,
            RequestBody::Json(value) => req.json(value),
            RequestBody::Bytes(content) => req.body(content.clone()),
        };

        let response = req.send().await?;
        let status = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .map(str::to_string);
        let body = response.text().await?;

        tracing::debug!(status, response_len = body.len(), "HTTP request completed");

        Ok(HttpResponse {
            status,
            status_text,
            body,
        })
    }
}

// ============================================================================
// Mock implementation for tests
// ============================================================================

/// Mock HTTP client.
///
/// Responses are queued per `"{method} {url}"` key and returned in FIFO
/// order; every executed request is recorded for later inspection.
#[derive(Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, Vec<Result<HttpResponse>>>>>,
    calls: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for a `"{method} {url}"` key.
    pub fn add_response(&self, key: &str, response: Result<HttpResponse>) {
        self.responses
            .lock()
            .entry(key.to_string())
            .or_default()
            .push(response);
    }

    /// Shorthand for queueing a plain response.
    pub fn respond(&self, key: &str, status: u16, body: &str) {
        self.add_response(
            key,
            Ok(HttpResponse {
                status,
                status_text: None,
                body: body.to_string(),
            }),
        );
    }

    /// All requests executed so far, in order.
    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.calls.lock().push(request.clone());

        let key = format!("{} {}", request.method, request.url);
        let mut responses = self.responses.lock();

        if let Some(queue) = responses.get_mut(&key) {
            if !queue.is_empty() {
                return queue.remove(0);
            }
        }

        Err(IntakeError::Internal(format!(
            "no mock response configured for {}",
            key
        )))
    }
}
