//! DermatologyConsultationHandler - analyses a photo of the affected skin.

use std::sync::Arc;

use super::payment_gate::check_payment;
use crate::domain::agents::{AgentInput, AgentKind, AgentRegistry};
use crate::domain::foundation::{validate_file_size, validate_file_type, Envelope, UploadKind};
use crate::ports::ImageNormalizer;

/// Command carrying an uploaded skin photo and optional symptom notes.
#[derive(Debug, Clone)]
pub struct DermatologyConsultationCommand {
    pub file_name: String,
    pub content: Vec<u8>,
    pub symptoms: String,
    pub payment_verified: bool,
}

/// Handler for dermatology consultations.
#[derive(Clone)]
pub struct DermatologyConsultationHandler {
    registry: AgentRegistry,
    normalizer: Arc<dyn ImageNormalizer>,
    max_file_size: usize,
}

impl DermatologyConsultationHandler {
    pub fn new(
        registry: AgentRegistry,
        normalizer: Arc<dyn ImageNormalizer>,
        max_file_size: usize,
    ) -> Self {
        Self {
            registry,
            normalizer,
            max_file_size,
        }
    }

    pub async fn handle(&self, cmd: DermatologyConsultationCommand) -> Envelope {
        let kind = AgentKind::Dermatology;
        if let Some(blocked) = check_payment(self.registry.catalog(), kind, cmd.payment_verified) {
            return blocked;
        }

        if let Err(err) = validate_file_type(&cmd.file_name, UploadKind::Image) {
            return Envelope::failure(err.to_string());
        }
        if let Err(err) = validate_file_size(cmd.content.len(), self.max_file_size) {
            return Envelope::failure(err.to_string());
        }

        let normalizer = Arc::clone(&self.normalizer);
        let content = cmd.content;
        let normalized = tokio::task::spawn_blocking(move || normalizer.normalize(&content)).await;

        let image_base64 = match normalized {
            Ok(Ok(encoded)) => encoded,
            Ok(Err(err)) => {
                tracing::warn!(file = %cmd.file_name, error = %err, "image normalization failed");
                return Envelope::failure(format!("{}: {}", kind.failure_prefix(), err));
            }
            Err(join) => {
                tracing::error!(error = %join, "image normalization task failed");
                return Envelope::failure(format!("{}: {}", kind.failure_prefix(), join));
            }
        };

        self.registry
            .create_kind(kind)
            .process(AgentInput::image(image_base64, cmd.symptoms))
            .await
    }
}
