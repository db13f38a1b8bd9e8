//! MedicalChatHandler - routes a free-text message to the agent that should answer it.
//!
//! The message is classified first; the classifier's reply decides between
//! small talk and one of the three medical agents, which then answers the
//! original (trimmed) message.

use serde_json::{json, Map, Value};

use crate::domain::agents::{AgentInput, AgentKind, AgentRegistry, Intent};
use crate::domain::foundation::Envelope;

/// Failure message for blank chat input.
pub const EMPTY_MESSAGE: &str = "请输入有效的消息内容";

/// Command to answer a chat message.
#[derive(Debug, Clone)]
pub struct MedicalChatCommand {
    pub message: String,
}

/// Handler for the main chat flow.
///
/// Every outcome is an [`Envelope`]: validation failures, classification
/// failures, and agent failures are reported, never raised.
#[derive(Clone)]
pub struct MedicalChatHandler {
    registry: AgentRegistry,
}

impl MedicalChatHandler {
    pub fn new(registry: AgentRegistry) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, cmd: MedicalChatCommand) -> Envelope {
        let message = cmd.message.trim();
        if message.is_empty() {
            return Envelope::failure(EMPTY_MESSAGE);
        }

        // 1. Classify
        let classified = self
            .registry
            .create_kind(AgentKind::IntentRecognition)
            .process(AgentInput::text(message))
            .await;
        if !classified.is_success() {
            return classified;
        }
        let classification = match classified.into_data() {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        // 2. Interpret
        let intent = match Intent::interpret(&classification) {
            Ok(intent) => intent,
            Err(err) => {
                tracing::warn!(error = %err, "classification could not be routed");
                return Envelope::failure(err.to_string());
            }
        };
        let target = intent.target();
        tracing::info!(agent = %target, "routing chat message");

        // 3. Dispatch
        let answered = self
            .registry
            .create_kind(target)
            .process(AgentInput::text(message))
            .await;
        if !answered.is_success() {
            return answered;
        }

        Envelope::success(json!({
            "intent_recognition": classification,
            "agent_type": target.display_name(),
            "response": answered.into_data().unwrap_or(Value::Null),
        }))
    }
}
