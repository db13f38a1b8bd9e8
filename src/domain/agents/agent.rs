//! The Agent trait and its input/error types.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use super::{AgentDescriptor, AgentKind};
use crate::domain::foundation::Envelope;
use crate::ports::GatewayError;

/// Payload handed to an agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentInput {
    /// Free text (message, question, or extracted report).
    Text(String),
    /// An image with the patient's description of the symptoms.
    Image {
        /// Base64 JPEG bytes.
        image_base64: String,
        symptoms: String,
    },
}

impl AgentInput {
    pub fn text(text: impl Into<String>) -> Self {
        AgentInput::Text(text.into())
    }

    pub fn image(image_base64: impl Into<String>, symptoms: impl Into<String>) -> Self {
        AgentInput::Image {
            image_base64: image_base64.into(),
            symptoms: symptoms.into(),
        }
    }

    /// Returns the text of a text input, or the mismatch error for `agent`.
    pub fn into_text(self, agent: AgentKind) -> Result<String, AgentError> {
        match self {
            AgentInput::Text(text) => Ok(text),
            AgentInput::Image { .. } => Err(AgentError::UnsupportedInput {
                agent,
                expected: "text",
            }),
        }
    }

    /// Returns `(image_base64, symptoms)` of an image input, or the mismatch
    /// error for `agent`.
    pub fn into_image(self, agent: AgentKind) -> Result<(String, String), AgentError> {
        match self {
            AgentInput::Image {
                image_base64,
                symptoms,
            } => Ok((image_base64, symptoms)),
            AgentInput::Text(_) => Err(AgentError::UnsupportedInput {
                agent,
                expected: "image",
            }),
        }
    }
}

/// Errors raised while an agent runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error("LLM调用失败: {0}")]
    Gateway(#[source] GatewayError),

    #[error("视觉模型调用失败: {0}")]
    Vision(#[source] GatewayError),

    #[error("{agent} expects {expected} input")]
    UnsupportedInput {
        agent: AgentKind,
        expected: &'static str,
    },
}

impl From<GatewayError> for AgentError {
    fn from(err: GatewayError) -> Self {
        AgentError::Gateway(err)
    }
}

/// A specialized agent: fixed instructions plus one gateway invocation.
///
/// Implementations are cheap to build and hold no mutable state; the
/// registry creates a fresh one per request.
#[async_trait]
pub trait Agent: Send + Sync {
    fn descriptor(&self) -> &AgentDescriptor;

    fn kind(&self) -> AgentKind {
        self.descriptor().kind
    }

    /// Runs the agent and returns its payload object.
    async fn run(&self, input: AgentInput) -> Result<Map<String, Value>, AgentError>;

    /// Runs the agent and wraps the outcome in an envelope.
    ///
    /// Failures become `"<failure prefix>: <error>"` with the default failure
    /// code; nothing propagates past this call.
    async fn process(&self, input: AgentInput) -> Envelope {
        let kind = self.kind();
        match self.run(input).await {
            Ok(payload) => Envelope::success(Value::Object(payload)),
            Err(err) => {
                tracing::warn!(agent = %kind, error = %err, "agent run failed");
                Envelope::failure(format!("{}: {}", kind.failure_prefix(), err))
            }
        }
    }
}
