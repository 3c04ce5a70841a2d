//! Canned-response gateway for tests
//!
//! Records every request it receives and answers with queued responses in
//! order. Running out of responses looks like an unreachable service.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::{ApiRequest, ApiResponse, HttpGateway};
use crate::config::DEFAULT_BASE_URL;
use crate::error::{Result, SoundEditError};

/// In-memory gateway that never touches the network.
pub struct MockGateway {
    base_url: String,
    responses: Mutex<VecDeque<ApiResponse>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Queue a response.
    pub fn push_response(&self, response: ApiResponse) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(response);
        self
    }

    /// Queue a JSON response.
    pub fn push_json(&self, status: u16, body: serde_json::Value) -> &Self {
        self.push_response(ApiResponse::new(status, body.to_string().into_bytes()))
    }

    /// Queue a raw byte response.
    pub fn push_bytes(&self, status: u16, body: impl Into<Vec<u8>>) -> &Self {
        self.push_response(ApiResponse::new(status, body.into()))
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests().pop()
    }

    /// Responses still queued.
    pub fn pending(&self) -> usize {
        self.responses.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpGateway for MockGateway {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .ok_or_else(|| SoundEditError::Connection {
                message: format!("no canned response for {} {}", request.method.as_str(), request.path),
            })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
