//! Agents module - specialized prompt agents and their registry.
//!
//! An agent owns one fixed instruction template and one gateway invocation.
//! The [`AgentRegistry`] builds a fresh agent per request from its symbolic
//! name; the [`Intent`] type reads the classifier's reply to decide which
//! agent answers a chat message.
//!
//! Adding an agent takes an [`AgentKind`] variant (name, display name,
//! description, failure prefix), its instructions in `prompts`, and one type
//! implementing [`Agent`] wired into the registry.

mod agent;
mod descriptor;
mod intent;
mod kind;
mod prompts;
mod registry;
mod variants;

pub use agent::{Agent, AgentError, AgentInput};
pub use descriptor::{AgentCatalog, AgentDescriptor, DEFAULT_PRICE_FEN};
pub use intent::{Intent, IntentError, MedicalIntent, MEDICAL_KEY, NON_MEDICAL_KEY};
pub use kind::{AgentKind, UnknownAgentError};
pub use prompts::instructions_for;
pub use registry::AgentRegistry;
pub use variants::{
    CaseGenerationAgent, ChatAgent, DermatologyAgent, HealthEducationAgent,
    IntentRecognitionAgent, MedicationAgent, ReportInterpretationAgent, SelfDiagnosisAgent,
    TextInvocation, TriageAgent, CLASSIFICATION_MAX_TOKENS, CLASSIFICATION_TEMPERATURE,
    LONG_OUTPUT_MAX_TOKENS,
};
