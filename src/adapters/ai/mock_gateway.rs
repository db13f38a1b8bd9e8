//! Mock Model Gateway for testing.
//!
//! Provides a configurable mock implementation of the ModelGateway port,
//! allowing tests to run without calling the real model service.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order by text and vision calls alike
//! - Error injection for failure-path testing
//! - Simulated delays for concurrency testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let gateway = MockGateway::new()
//!     .with_response(r#"{"医疗意图": "症状自诊智能体"}"#)
//!     .with_response("【病情分析】...");
//!
//! let reply = gateway.complete_text(request).await?;
//! assert_eq!(gateway.call_count(), 1);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    GatewayError, GatewayInfo, ModelGateway, TextCompletionRequest, VisionCompletionRequest,
};

/// Reply used when the queue is empty.
pub const DEFAULT_MOCK_REPLY: &str = "Mock response";

/// Mock model gateway for testing.
#[derive(Debug, Clone)]
pub struct MockGateway {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    info: GatewayInfo,
    delay: Duration,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success(String),
    Error(MockError),
}

/// Mock failures, mirroring the gateway error taxonomy.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Service answered with a non-success status.
    Status { status: u16, body: String },
    /// Transport failure.
    Network { message: String },
    /// No answer in time.
    Timeout { timeout_secs: u64 },
    /// Unreadable body.
    Parse { message: String },
}

impl From<MockError> for GatewayError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::Status { status, body } => GatewayError::status(status, body),
            MockError::Network { message } => GatewayError::network(message),
            MockError::Timeout { timeout_secs } => GatewayError::Timeout { timeout_secs },
            MockError::Parse { message } => GatewayError::parse(message),
        }
    }
}

impl From<GatewayError> for MockError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Status { status, body } => MockError::Status { status, body },
            GatewayError::Network(message) => MockError::Network { message },
            GatewayError::Timeout { timeout_secs } => MockError::Timeout { timeout_secs },
            GatewayError::Parse(message) => MockError::Parse { message },
        }
    }
}

/// A call received by the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Text(TextCompletionRequest),
    Vision(VisionCompletionRequest),
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

/// Locks a mutex, recovering the data if a panicking test poisoned it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            info: GatewayInfo::new("mock", "mock-text", "mock-vision"),
            delay: Duration::ZERO,
        }
    }

    /// Adds a successful reply to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        lock(&self.responses).push_back(MockResponse::Success(content.into()));
        self
    }

    /// Adds a failure to the queue.
    pub fn with_error(self, error: impl Into<MockError>) -> Self {
        lock(&self.responses).push_back(MockResponse::Error(error.into()));
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_gateway_info(mut self, info: GatewayInfo) -> Self {
        self.info = info;
        self
    }

    /// Number of calls of either kind.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// All calls in arrival order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Text calls in arrival order.
    pub fn text_calls(&self) -> Vec<TextCompletionRequest> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Text(request) => Some(request.clone()),
                RecordedCall::Vision(_) => None,
            })
            .collect()
    }

    /// Vision calls in arrival order.
    pub fn vision_calls(&self) -> Vec<VisionCompletionRequest> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Vision(request) => Some(request.clone()),
                RecordedCall::Text(_) => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    async fn respond(&self, call: RecordedCall) -> Result<String, GatewayError> {
        lock(&self.calls).push(call);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let next = lock(&self.responses).pop_front();
        match next {
            Some(MockResponse::Success(content)) => Ok(content),
            Some(MockResponse::Error(err)) => Err(err.into()),
            None => Ok(DEFAULT_MOCK_REPLY.to_string()),
        }
    }
}

#[async_trait]
impl ModelGateway for MockGateway {
    async fn complete_text(&self, request: TextCompletionRequest) -> Result<String, GatewayError> {
        self.respond(RecordedCall::Text(request)).await
    }

    async fn complete_vision(
        &self,
        request: VisionCompletionRequest,
    ) -> Result<String, GatewayError> {
        self.respond(RecordedCall::Vision(request)).await
    }

    fn gateway_info(&self) -> GatewayInfo {
        self.info.clone()
    }
}
