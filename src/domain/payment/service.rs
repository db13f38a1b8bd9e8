//! Services that can be purchased.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::agents::AgentKind;

/// A purchasable service; each unlocks exactly one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaidService {
    Report,
    Medication,
    Education,
    Dermatology,
}

impl PaidService {
    pub const ALL: [PaidService; 4] = [
        PaidService::Report,
        PaidService::Medication,
        PaidService::Education,
        PaidService::Dermatology,
    ];

    /// Service type as used by clients and in order numbers.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaidService::Report => "report",
            PaidService::Medication => "medication",
            PaidService::Education => "education",
            PaidService::Dermatology => "dermatology",
        }
    }

    /// The agent this service unlocks.
    pub fn agent_kind(&self) -> AgentKind {
        match self {
            PaidService::Report => AgentKind::ReportInterpretation,
            PaidService::Medication => AgentKind::Medication,
            PaidService::Education => AgentKind::HealthEducation,
            PaidService::Dermatology => AgentKind::Dermatology,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PaidService::Report => "报告解读",
            PaidService::Medication => "药物咨询",
            PaidService::Education => "健康科普",
            PaidService::Dermatology => "皮肤病诊断",
        }
    }

    /// Order description shown to the payer.
    pub fn description(&self) -> &'static str {
        match self {
            PaidService::Report => "医学报告智能解读服务",
            PaidService::Medication => "专业药物咨询指导服务",
            PaidService::Education => "权威健康知识科普服务",
            PaidService::Dermatology => "皮肤病智能诊断分析服务",
        }
    }

    /// Service that unlocks `kind`, if any.
    pub fn for_agent(kind: AgentKind) -> Option<Self> {
        Self::ALL.into_iter().find(|service| service.agent_kind() == kind)
    }
}

impl fmt::Display for PaidService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaidService {
    type Err = UnknownServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|service| service.as_str() == s)
            .ok_or_else(|| UnknownServiceError(s.to_string()))
    }
}

/// Requested service type is not sold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("不支持的服务类型")]
pub struct UnknownServiceError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_service_types() {
        assert_eq!("report".parse::<PaidService>().unwrap(), PaidService::Report);
        assert_eq!("education".parse::<PaidService>().unwrap(), PaidService::Education);
    }

    #[test]
    fn rejects_agent_names_as_service_types() {
        let err = "report_interpretation".parse::<PaidService>().unwrap_err();
        assert_eq!(err.to_string(), "不支持的服务类型");
    }

    #[test]
    fn each_service_unlocks_a_distinct_agent() {
        for service in PaidService::ALL {
            assert_eq!(PaidService::for_agent(service.agent_kind()), Some(service));
        }
        assert_eq!(PaidService::for_agent(AgentKind::Chat), None);
    }
}
