//! AskQuestionHandler - free-text consultations answered by a single agent.
//!
//! Backs the health education and medication endpoints; both take one
//! question, apply the payment gate, and hand the trimmed question to their
//! agent.

use super::payment_gate::check_payment;
use crate::domain::agents::{AgentInput, AgentKind, AgentRegistry};
use crate::domain::foundation::Envelope;

/// Failure message for a blank health education question.
pub const EMPTY_QUESTION_MESSAGE: &str = "请输入有效的问题";

/// Failure message for a blank medication question.
pub const EMPTY_MEDICATION_QUESTION_MESSAGE: &str = "请输入有效的药物咨询问题";

/// Command carrying one consultation question.
#[derive(Debug, Clone)]
pub struct AskQuestionCommand {
    pub question: String,
    pub payment_verified: bool,
}

/// Handler for single-question consultations.
#[derive(Clone)]
pub struct AskQuestionHandler {
    registry: AgentRegistry,
    kind: AgentKind,
    empty_message: &'static str,
}

impl AskQuestionHandler {
    /// Questions answered by the health education agent.
    pub fn health_education(registry: AgentRegistry) -> Self {
        Self {
            registry,
            kind: AgentKind::HealthEducation,
            empty_message: EMPTY_QUESTION_MESSAGE,
        }
    }

    /// Questions answered by the medication agent.
    pub fn medication(registry: AgentRegistry) -> Self {
        Self {
            registry,
            kind: AgentKind::Medication,
            empty_message: EMPTY_MEDICATION_QUESTION_MESSAGE,
        }
    }

    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    pub async fn handle(&self, cmd: AskQuestionCommand) -> Envelope {
        if let Some(blocked) =
            check_payment(self.registry.catalog(), self.kind, cmd.payment_verified)
        {
            return blocked;
        }

        let question = cmd.question.trim();
        if question.is_empty() {
            return Envelope::failure(self.empty_message);
        }

        self.registry
            .create_kind(self.kind)
            .process(AgentInput::text(question))
            .await
    }
}
