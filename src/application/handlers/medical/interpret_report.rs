//! InterpretReportHandler - explains an uploaded medical report.

use std::sync::Arc;

use super::payment_gate::check_payment;
use crate::domain::agents::{AgentInput, AgentKind, AgentRegistry};
use crate::domain::foundation::{
    validate_file_size, validate_file_type, DocumentFormat, Envelope, UploadKind,
};
use crate::ports::DocumentExtractor;

/// Failure message when a report yields no text.
pub const EMPTY_REPORT_MESSAGE: &str = "文件内容为空或无法解析";

/// Command to interpret an uploaded report.
#[derive(Debug, Clone)]
pub struct InterpretReportCommand {
    pub file_name: String,
    pub content: Vec<u8>,
    pub payment_verified: bool,
}

/// Handler for report interpretation.
///
/// Validation runs in order: payment gate, file type, file size, extraction.
/// Only a report with non-blank text reaches the model.
#[derive(Clone)]
pub struct InterpretReportHandler {
    registry: AgentRegistry,
    extractor: Arc<dyn DocumentExtractor>,
    max_file_size: usize,
}

impl InterpretReportHandler {
    pub fn new(
        registry: AgentRegistry,
        extractor: Arc<dyn DocumentExtractor>,
        max_file_size: usize,
    ) -> Self {
        Self {
            registry,
            extractor,
            max_file_size,
        }
    }

    pub async fn handle(&self, cmd: InterpretReportCommand) -> Envelope {
        let kind = AgentKind::ReportInterpretation;
        if let Some(blocked) = check_payment(self.registry.catalog(), kind, cmd.payment_verified) {
            return blocked;
        }

        if let Err(err) = validate_file_type(&cmd.file_name, UploadKind::Document) {
            return Envelope::failure(err.to_string());
        }
        if let Err(err) = validate_file_size(cmd.content.len(), self.max_file_size) {
            return Envelope::failure(err.to_string());
        }
        let Some(format) = DocumentFormat::from_file_name(&cmd.file_name) else {
            return Envelope::failure("不支持的文件格式");
        };

        let extractor = Arc::clone(&self.extractor);
        let content = cmd.content;
        let extracted =
            tokio::task::spawn_blocking(move || extractor.extract(format, &content)).await;

        let report = match extracted {
            Ok(Ok(text)) => text,
            Ok(Err(err)) => {
                tracing::warn!(file = %cmd.file_name, error = %err, "report extraction failed");
                return Envelope::failure(format!("{}: {}", kind.failure_prefix(), err));
            }
            Err(join) => {
                tracing::error!(error = %join, "report extraction task failed");
                return Envelope::failure(format!("{}: {}", kind.failure_prefix(), join));
            }
        };

        if report.trim().is_empty() {
            return Envelope::failure(EMPTY_REPORT_MESSAGE);
        }

        self.registry
            .create_kind(kind)
            .process(AgentInput::text(report))
            .await
    }
}
