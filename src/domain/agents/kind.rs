//! AgentKind enum naming the nine specialized agents.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The agent types the registry can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    IntentRecognition,
    Chat,
    Triage,
    SelfDiagnosis,
    CaseGeneration,
    ReportInterpretation,
    HealthEducation,
    Dermatology,
    Medication,
}

static BY_NAME: Lazy<HashMap<&'static str, AgentKind>> =
    Lazy::new(|| AgentKind::ALL.iter().map(|kind| (kind.as_str(), *kind)).collect());

impl AgentKind {
    /// All agent kinds in canonical order.
    pub const ALL: [AgentKind; 9] = [
        AgentKind::IntentRecognition,
        AgentKind::Chat,
        AgentKind::Triage,
        AgentKind::SelfDiagnosis,
        AgentKind::CaseGeneration,
        AgentKind::ReportInterpretation,
        AgentKind::HealthEducation,
        AgentKind::Dermatology,
        AgentKind::Medication,
    ];

    /// Symbolic registry name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::IntentRecognition => "intent_recognition",
            AgentKind::Chat => "chat",
            AgentKind::Triage => "triage",
            AgentKind::SelfDiagnosis => "self_diagnosis",
            AgentKind::CaseGeneration => "case_generation",
            AgentKind::ReportInterpretation => "report_interpretation",
            AgentKind::HealthEducation => "health_education",
            AgentKind::Dermatology => "dermatology",
            AgentKind::Medication => "medication",
        }
    }

    /// Human-readable name shown to users.
    pub fn display_name(&self) -> &'static str {
        match self {
            AgentKind::IntentRecognition => "意图识别智能体",
            AgentKind::Chat => "闲聊智能体",
            AgentKind::Triage => "智能分诊智能体",
            AgentKind::SelfDiagnosis => "症状自诊智能体",
            AgentKind::CaseGeneration => "病例生成智能体",
            AgentKind::ReportInterpretation => "报告解读智能体",
            AgentKind::HealthEducation => "健康科普智能体",
            AgentKind::Dermatology => "皮肤病咨询智能体",
            AgentKind::Medication => "药物咨询智能体",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AgentKind::IntentRecognition => "判断用户输入是医疗意图还是非医疗用途，并分类医疗具体用途",
            AgentKind::Chat => "处理非医疗意图的对话",
            AgentKind::Triage => "根据患者病情推荐合适的科室",
            AgentKind::SelfDiagnosis => "根据患者病情生成病情分析、诊断和处置建议",
            AgentKind::CaseGeneration => "引导收集病情并整理成结构化病历",
            AgentKind::ReportInterpretation => "解读医学检查检验报告",
            AgentKind::HealthEducation => "提供权威医学知识科普",
            AgentKind::Dermatology => "分析皮肤病图片并提供诊断建议",
            AgentKind::Medication => "基于药品说明书提供用药指导",
        }
    }

    /// Prefix for the failure message when this agent's run fails.
    pub fn failure_prefix(&self) -> &'static str {
        match self {
            AgentKind::IntentRecognition => "意图识别失败",
            AgentKind::Chat => "闲聊处理失败",
            AgentKind::Triage => "智能分诊失败",
            AgentKind::SelfDiagnosis => "症状自诊失败",
            AgentKind::CaseGeneration => "病例生成失败",
            AgentKind::ReportInterpretation => "报告解读失败",
            AgentKind::HealthEducation => "健康科普失败",
            AgentKind::Dermatology => "皮肤病咨询失败",
            AgentKind::Medication => "药物咨询失败",
        }
    }

    /// Returns the 0-based index of this kind in [`AgentKind::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Whether the agent reads an image rather than text.
    pub fn is_vision(&self) -> bool {
        matches!(self, AgentKind::Dermatology)
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = UnknownAgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BY_NAME
            .get(s)
            .copied()
            .ok_or_else(|| UnknownAgentError { name: s.to_string() })
    }
}

/// Requested agent name is not registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("未知的智能体类型: {name}")]
pub struct UnknownAgentError {
    pub name: String,
}
