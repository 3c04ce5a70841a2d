//! HTTP gateway
//!
//! The API clients describe requests as plain data and hand them to an
//! [`HttpGateway`]. `ReqwestGateway` talks to a live service;
//! `MockGateway` replays canned responses for tests.

mod mock;
mod reqwest_gateway;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, SoundEditError};

pub use mock::MockGateway;
pub use reqwest_gateway::ReqwestGateway;

/// HTTP verbs used by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// One file in a multipart upload.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    /// Form field name (`file` or `files`)
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Request payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FilePart>),
}

/// A request relative to the service base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute service path, e.g. `/api/v1/multitrack/list`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Set a JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Set a multipart body.
    pub fn multipart(mut self, parts: Vec<FilePart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    /// Value of the first query parameter named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Status and raw body of a completed request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Status text, e.g. `Not Found`
    pub reason: String,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Response with the canonical status text for `status`.
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("")
            .to_string();
        Self {
            status,
            reason,
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `detail` message from a service error body, if there is one.
    fn detail(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_slice(&self.body).ok()?;
        value.get("detail")?.as_str().map(str::to_string)
    }

    /// Turn a non-success status into `RequestFailed`.
    pub fn error_for_status(self, operation: &str) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }

        let reason = match self.detail() {
            Some(detail) => format!("{}: {}", self.reason, detail),
            None => self.reason.clone(),
        };
        tracing::warn!(operation, status = self.status, %reason, "audio service request failed");
        Err(SoundEditError::request_failed(operation, self.status, reason))
    }

    /// Check the status and parse the body as JSON.
    pub fn json<T: DeserializeOwned>(self, operation: &str) -> Result<T> {
        let response = self.error_for_status(operation)?;
        serde_json::from_slice(&response.body).map_err(|e| SoundEditError::InvalidResponse {
            operation: operation.to_string(),
            reason: e.to_string(),
        })
    }

    /// Check the status and return the raw body.
    pub fn bytes(self, operation: &str) -> Result<Vec<u8>> {
        Ok(self.error_for_status(operation)?.body)
    }
}

/// Something that can carry an [`ApiRequest`] to the service.
pub trait HttpGateway {
    /// Send the request and return whatever status came back.
    ///
    /// Only transport failures are errors here; status handling is left
    /// to the caller.
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse>;

    /// Absolute URL for a service path.
    fn url_for(&self, path: &str) -> String;
}

impl<G: HttpGateway + ?Sized> HttpGateway for &G {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        (**self).execute(request)
    }

    fn url_for(&self, path: &str) -> String {
        (**self).url_for(path)
    }
}

impl<G: HttpGateway + ?Sized> HttpGateway for Box<G> {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        (**self).execute(request)
    }

    fn url_for(&self, path: &str) -> String {
        (**self).url_for(path)
    }
}
