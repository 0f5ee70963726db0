//! Scripted transport for protocol tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use http::StatusCode;
use serde_json::Value;

use crate::errors::ApiError;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport};

/// Replays a scripted sequence of outcomes, one per `execute` call, and
/// records every request it saw for ordering assertions.
#[derive(Default)]
pub(crate) struct MockTransport {
    script: Mutex<VecDeque<Result<ApiResponse, ApiError>>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_response(&self, status: StatusCode, body: Value) {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse { status, body }));
    }

    pub(crate) fn push_error(&self, error: ApiError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    /// The `(method, path)` of every executed request, in order.
    pub(crate) fn calls(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|r| (r.method.to_string(), r.path.clone()))
            .collect()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.calls.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("Unscripted request: {} {}", request.method, request.path))
    }
}
