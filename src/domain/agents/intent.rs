//! Interpretation of the classifier's structured reply.

use serde_json::{Map, Value};
use thiserror::Error;

use super::AgentKind;

/// Key marking a non-medical message; its value is ignored.
pub const NON_MEDICAL_KEY: &str = "非医疗意图";

/// Key whose value names the medical subtype.
pub const MEDICAL_KEY: &str = "医疗意图";

/// The three medical subtypes the classifier may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MedicalIntent {
    Triage,
    SelfDiagnosis,
    CaseGeneration,
}

impl MedicalIntent {
    pub const ALL: [MedicalIntent; 3] = [
        MedicalIntent::Triage,
        MedicalIntent::SelfDiagnosis,
        MedicalIntent::CaseGeneration,
    ];

    /// Agent that handles this subtype.
    pub fn agent_kind(&self) -> AgentKind {
        match self {
            MedicalIntent::Triage => AgentKind::Triage,
            MedicalIntent::SelfDiagnosis => AgentKind::SelfDiagnosis,
            MedicalIntent::CaseGeneration => AgentKind::CaseGeneration,
        }
    }

    /// Label the classifier emits; the handling agent's display name.
    pub fn label(&self) -> &'static str {
        self.agent_kind().display_name()
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|intent| intent.label() == label)
    }
}

/// Outcome of classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    NonMedical,
    Medical(MedicalIntent),
}

impl Intent {
    /// Reads a classification object.
    ///
    /// The non-medical marker wins when both keys are present. A medical value
    /// outside the closed vocabulary is reported with the value included.
    pub fn interpret(classification: &Map<String, Value>) -> Result<Self, IntentError> {
        if classification.contains_key(NON_MEDICAL_KEY) {
            return Ok(Intent::NonMedical);
        }

        let value = classification
            .get(MEDICAL_KEY)
            .ok_or(IntentError::UnrecognizedFormat)?;

        let label = match value {
            Value::String(label) => label.clone(),
            other => other.to_string(),
        };

        MedicalIntent::from_label(&label)
            .map(Intent::Medical)
            .ok_or(IntentError::UnrecognizedMedicalType(label))
    }

    /// Agent that should answer the message.
    pub fn target(&self) -> AgentKind {
        match self {
            Intent::NonMedical => AgentKind::Chat,
            Intent::Medical(medical) => medical.agent_kind(),
        }
    }
}

/// Classification result could not be mapped to an [`Intent`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("意图识别结果格式错误")]
    UnrecognizedFormat,

    #[error("未识别的医疗意图类型: {0}")]
    UnrecognizedMedicalType(String),
}
