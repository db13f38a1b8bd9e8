//! Model Gateway Port - Interface for the remote completion service.
//!
//! Agents compose a conversation (or a text + image pair) and hand it to this
//! port; adapters translate it to the provider's wire format.
//!
//! # Design
//!
//! - One outbound call per request; the port never retries
//! - Provider-agnostic message format restricted to `system` and `user` roles
//! - Typed errors carrying status and body for diagnosis
//!
//! # Example
//!
//! ```ignore
//! let request = TextCompletionRequest::new()
//!     .with_message(Message::system("You are helpful"))
//!     .with_message(Message::user("Hello"))
//!     .with_temperature(0.1);
//!
//! let reply = gateway.complete_text(request).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for model completion calls.
///
/// Implementations must not block the executor thread while waiting for the
/// remote service; concurrent callers must make progress independently.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Completes a text conversation.
    async fn complete_text(&self, request: TextCompletionRequest) -> Result<String, GatewayError>;

    /// Completes a prompt about an inline image.
    async fn complete_vision(
        &self,
        request: VisionCompletionRequest,
    ) -> Result<String, GatewayError>;

    /// Describes the gateway and its default models.
    fn gateway_info(&self) -> GatewayInfo;
}

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Fixed instructions for the model.
    System,
    /// End-user input.
    User,
}

/// A single conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Request for a text completion.
///
/// Unset options fall back to the gateway's defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextCompletionRequest {
    /// Ordered turns; the system turn comes first.
    pub messages: Vec<Message>,
    /// Model override.
    pub model: Option<String>,
    /// Sampling temperature (0.0 = near deterministic).
    pub temperature: Option<f32>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
}

impl TextCompletionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn.
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Request for a vision completion: one prompt plus one base64 image.
#[derive(Debug, Clone, PartialEq)]
pub struct VisionCompletionRequest {
    pub prompt: String,
    /// Base64-encoded JPEG bytes (no `data:` prefix).
    pub image_base64: String,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl VisionCompletionRequest {
    pub fn new(prompt: impl Into<String>, image_base64: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image_base64: image_base64.into(),
            model: None,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Gateway description, surfaced on the config endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayInfo {
    /// Gateway name (e.g. "openai-compatible", "mock").
    pub name: String,
    /// Default model for text completions.
    pub text_model: String,
    /// Default model for vision completions.
    pub vision_model: String,
}

impl GatewayInfo {
    pub fn new(
        name: impl Into<String>,
        text_model: impl Into<String>,
        vision_model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            text_model: text_model.into(),
            vision_model: vision_model.into(),
        }
    }
}

/// Model gateway errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The service answered with a non-success status.
    #[error("API调用失败: {status} - {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The request never completed (DNS, connect, reset).
    #[error("network error: {0}")]
    Network(String),

    /// No response within the configured timeout.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The response body did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
}

impl GatewayError {
    /// Creates a status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Whether a caller-side retry could plausibly succeed.
    ///
    /// The gateway itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Status { status, .. } => *status == 429 || *status >= 500,
            GatewayError::Network(_) | GatewayError::Timeout { .. } => true,
            GatewayError::Parse(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_request_builder_keeps_turn_order() {
        let request = TextCompletionRequest::new()
            .with_message(Message::system("rules"))
            .with_message(Message::user("question"))
            .with_model("qwen3-max")
            .with_temperature(0.1)
            .with_max_tokens(256);

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert_eq!(request.messages[1].role, MessageRole::User);
        assert_eq!(request.messages[1].content, "question");
        assert_eq!(request.model.as_deref(), Some("qwen3-max"));
        assert_eq!(request.temperature, Some(0.1));
        assert_eq!(request.max_tokens, Some(256));
    }

    #[test]
    fn text_request_defaults_are_unset() {
        let request = TextCompletionRequest::new();
        assert!(request.messages.is_empty());
        assert!(request.model.is_none());
        assert!(request.temperature.is_none());
        assert!(request.max_tokens.is_none());
    }

    #[test]
    fn vision_request_builder_works() {
        let request = VisionCompletionRequest::new("describe", "aGVsbG8=")
            .with_max_tokens(3000)
            .with_model("qwen3-vl-plus");

        assert_eq!(request.prompt, "describe");
        assert_eq!(request.image_base64, "aGVsbG8=");
        assert_eq!(request.max_tokens, Some(3000));
        assert_eq!(request.model.as_deref(), Some("qwen3-vl-plus"));
        assert!(request.temperature.is_none());
    }

    #[test]
    fn status_error_carries_status_and_body() {
        let err = GatewayError::status(500, "upstream exploded");
        assert_eq!(err.to_string(), "API调用失败: 500 - upstream exploded");
    }

    #[test]
    fn retryable_classification() {
        assert!(GatewayError::status(429, "").is_retryable());
        assert!(GatewayError::status(503, "").is_retryable());
        assert!(GatewayError::network("reset").is_retryable());
        assert!(GatewayError::Timeout { timeout_secs: 30 }.is_retryable());

        assert!(!GatewayError::status(400, "").is_retryable());
        assert!(!GatewayError::status(401, "").is_retryable());
        assert!(!GatewayError::parse("bad json").is_retryable());
    }

    #[test]
    fn message_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MessageRole::System).unwrap(), "\"system\"");
        assert_eq!(serde_json::to_string(&MessageRole::User).unwrap(), "\"user\"");
    }
}
