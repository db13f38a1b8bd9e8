//! Registry mapping agent names to fresh agent instances.

use std::sync::Arc;

use super::variants::{
    CaseGenerationAgent, ChatAgent, DermatologyAgent, HealthEducationAgent,
    IntentRecognitionAgent, MedicationAgent, ReportInterpretationAgent, SelfDiagnosisAgent,
    TriageAgent,
};
use super::{Agent, AgentCatalog, AgentKind, UnknownAgentError};
use crate::ports::{GatewayInfo, ModelGateway};

/// Builds agents on demand.
///
/// Every agent shares the same gateway and copies its descriptor from the
/// catalog; neither is mutated after construction, so the registry can be
/// shared across requests behind an `Arc`.
#[derive(Clone)]
pub struct AgentRegistry {
    gateway: Arc<dyn ModelGateway>,
    catalog: Arc<AgentCatalog>,
}

impl AgentRegistry {
    pub fn new(gateway: Arc<dyn ModelGateway>, catalog: Arc<AgentCatalog>) -> Self {
        Self { gateway, catalog }
    }

    /// Creates the agent registered under `name`.
    pub fn create(&self, name: &str) -> Result<Box<dyn Agent>, UnknownAgentError> {
        let kind: AgentKind = name.parse()?;
        Ok(self.create_kind(kind))
    }

    /// Creates the agent for `kind`.
    pub fn create_kind(&self, kind: AgentKind) -> Box<dyn Agent> {
        tracing::debug!(agent = %kind, "creating agent");
        let descriptor = self.catalog.get(kind).clone();
        let gateway = Arc::clone(&self.gateway);
        match kind {
            AgentKind::IntentRecognition => Box::new(IntentRecognitionAgent::new(descriptor, gateway)),
            AgentKind::Chat => Box::new(ChatAgent::new(descriptor, gateway)),
            AgentKind::Triage => Box::new(TriageAgent::new(descriptor, gateway)),
            AgentKind::SelfDiagnosis => Box::new(SelfDiagnosisAgent::new(descriptor, gateway)),
            AgentKind::CaseGeneration => Box::new(CaseGenerationAgent::new(descriptor, gateway)),
            AgentKind::ReportInterpretation => {
                Box::new(ReportInterpretationAgent::new(descriptor, gateway))
            }
            AgentKind::HealthEducation => Box::new(HealthEducationAgent::new(descriptor, gateway)),
            AgentKind::Dermatology => Box::new(DermatologyAgent::new(descriptor, gateway)),
            AgentKind::Medication => Box::new(MedicationAgent::new(descriptor, gateway)),
        }
    }

    pub fn catalog(&self) -> &AgentCatalog {
        &self.catalog
    }

    /// Registered agent names in canonical order.
    pub fn names(&self) -> Vec<&'static str> {
        AgentKind::ALL.iter().map(|kind| kind.as_str()).collect()
    }

    pub fn gateway_info(&self) -> GatewayInfo {
        self.gateway.gateway_info()
    }
}
