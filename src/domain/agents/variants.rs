//! Concrete agents.
//!
//! Text agents differ only in their invocation parameters, so they are
//! generated by [`text_agent!`]. The classifier parses its reply and the
//! dermatology agent calls the vision model; both are written out by hand.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::prompts::instructions_for;
use super::{Agent, AgentDescriptor, AgentError, AgentInput, AgentKind};
use crate::domain::foundation::parse_structured;
use crate::ports::{Message, ModelGateway, TextCompletionRequest, VisionCompletionRequest};

/// Token budget for long-form agent outputs.
pub const LONG_OUTPUT_MAX_TOKENS: u32 = 3000;

/// Sampling temperature for classification.
pub const CLASSIFICATION_TEMPERATURE: f32 = 0.1;

/// Token budget for classification; the reply is a one-key JSON object.
pub const CLASSIFICATION_MAX_TOKENS: u32 = 256;

/// Fixed parameters of one text agent call.
#[derive(Debug, Clone, Copy)]
pub struct TextInvocation {
    /// Prepended to the input in the user turn.
    pub user_prefix: &'static str,
    /// Key under which the reply is returned.
    pub output_key: &'static str,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl TextInvocation {
    /// Builds `[system(instructions), user(prefix + input)]`.
    pub fn request(&self, kind: AgentKind, input: &str) -> TextCompletionRequest {
        let mut request = TextCompletionRequest::new()
            .with_message(Message::system(instructions_for(kind)))
            .with_message(Message::user(format!("{}{}", self.user_prefix, input)));
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        request
    }
}

fn single_entry(key: &str, value: String) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert(key.to_string(), Value::String(value));
    payload
}

/// Generates a text agent struct and its [`Agent`] implementation.
///
/// The struct holds its descriptor and a shared gateway; `run` sends the
/// invocation's two-turn conversation and returns the reply under the
/// invocation's output key.
macro_rules! text_agent {
    ($(#[$meta:meta])* $name:ident, $invocation:expr) => {
        $(#[$meta])*
        pub struct $name {
            descriptor: AgentDescriptor,
            gateway: Arc<dyn ModelGateway>,
        }

        impl $name {
            pub const INVOCATION: TextInvocation = $invocation;

            pub fn new(descriptor: AgentDescriptor, gateway: Arc<dyn ModelGateway>) -> Self {
                Self { descriptor, gateway }
            }
        }

        #[async_trait]
        impl Agent for $name {
            fn descriptor(&self) -> &AgentDescriptor {
                &self.descriptor
            }

            async fn run(&self, input: AgentInput) -> Result<Map<String, Value>, AgentError> {
                let kind = self.descriptor.kind;
                let text = input.into_text(kind)?;
                let request = Self::INVOCATION.request(kind, &text);
                let reply = self.gateway.complete_text(request).await?;
                Ok(single_entry(Self::INVOCATION.output_key, reply))
            }
        }
    };
}

text_agent!(
    /// Replies to non-medical small talk.
    ChatAgent,
    TextInvocation {
        user_prefix: "",
        output_key: "reply",
        temperature: None,
        max_tokens: None,
    }
);

text_agent!(
    /// Recommends a department.
    TriageAgent,
    TextInvocation {
        user_prefix: "患者病情：",
        output_key: "triage_result",
        temperature: None,
        max_tokens: None,
    }
);

text_agent!(
    /// Analyses symptoms into a preliminary diagnosis.
    SelfDiagnosisAgent,
    TextInvocation {
        user_prefix: "患者症状描述：",
        output_key: "diagnosis_result",
        temperature: None,
        max_tokens: Some(LONG_OUTPUT_MAX_TOKENS),
    }
);

text_agent!(
    /// Organises a description into a structured case record.
    CaseGenerationAgent,
    TextInvocation {
        user_prefix: "患者信息：",
        output_key: "case_result",
        temperature: None,
        max_tokens: Some(LONG_OUTPUT_MAX_TOKENS),
    }
);

text_agent!(
    /// Interprets the extracted text of a lab or imaging report.
    ReportInterpretationAgent,
    TextInvocation {
        user_prefix: "请解读以下医学报告：\n\n",
        output_key: "interpretation_result",
        temperature: None,
        max_tokens: Some(LONG_OUTPUT_MAX_TOKENS),
    }
);

text_agent!(
    /// Explains a health topic for lay readers.
    HealthEducationAgent,
    TextInvocation {
        user_prefix: "请科普以下健康问题：",
        output_key: "education_result",
        temperature: None,
        max_tokens: Some(LONG_OUTPUT_MAX_TOKENS),
    }
);

text_agent!(
    /// Answers medication questions.
    MedicationAgent,
    TextInvocation {
        user_prefix: "药物咨询问题：",
        output_key: "medication_result",
        temperature: None,
        max_tokens: Some(LONG_OUTPUT_MAX_TOKENS),
    }
);

/// Classifies a message into the closed intent vocabulary.
///
/// The payload is the classifier's reply run through
/// [`parse_structured`], so a well-behaved model yields a one-key object
/// and anything else yields `{"content": ...}`.
pub struct IntentRecognitionAgent {
    descriptor: AgentDescriptor,
    gateway: Arc<dyn ModelGateway>,
}

impl IntentRecognitionAgent {
    pub const INVOCATION: TextInvocation = TextInvocation {
        user_prefix: "",
        output_key: "",
        temperature: Some(CLASSIFICATION_TEMPERATURE),
        max_tokens: Some(CLASSIFICATION_MAX_TOKENS),
    };

    pub fn new(descriptor: AgentDescriptor, gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            descriptor,
            gateway,
        }
    }
}

#[async_trait]
impl Agent for IntentRecognitionAgent {
    fn descriptor(&self) -> &AgentDescriptor {
        &self.descriptor
    }

    async fn run(&self, input: AgentInput) -> Result<Map<String, Value>, AgentError> {
        let kind = self.descriptor.kind;
        let text = input.into_text(kind)?;
        let reply = self
            .gateway
            .complete_text(Self::INVOCATION.request(kind, &text))
            .await?;
        let parsed = parse_structured(&reply);
        tracing::debug!(keys = ?parsed.keys().collect::<Vec<_>>(), "classification parsed");
        Ok(parsed)
    }
}

/// Reads a skin photo together with the described symptoms.
pub struct DermatologyAgent {
    descriptor: AgentDescriptor,
    gateway: Arc<dyn ModelGateway>,
}

impl DermatologyAgent {
    pub const OUTPUT_KEY: &'static str = "dermatology_result";

    pub fn new(descriptor: AgentDescriptor, gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            descriptor,
            gateway,
        }
    }

    /// Instructions followed by the patient's own words.
    pub fn prompt(symptoms: &str) -> String {
        format!(
            "{}\n\n患者症状描述：{}",
            instructions_for(AgentKind::Dermatology),
            symptoms
        )
    }
}

#[async_trait]
impl Agent for DermatologyAgent {
    fn descriptor(&self) -> &AgentDescriptor {
        &self.descriptor
    }

    async fn run(&self, input: AgentInput) -> Result<Map<String, Value>, AgentError> {
        let (image_base64, symptoms) = input.into_image(self.descriptor.kind)?;
        let request = VisionCompletionRequest::new(Self::prompt(&symptoms), image_base64)
            .with_max_tokens(LONG_OUTPUT_MAX_TOKENS);
        let reply = self
            .gateway
            .complete_vision(request)
            .await
            .map_err(AgentError::Vision)?;
        Ok(single_entry(Self::OUTPUT_KEY, reply))
    }
}
