//! HTTP handlers for the medical endpoints.
//!
//! These handlers connect Axum routes to the medical command handlers. Every
//! response is HTTP 200 with an [`Envelope`] body; the envelope's `code`
//! carries the logical status.

use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{Json, Multipart, Query, State};
use axum::http::StatusCode;

use crate::application::handlers::medical::{
    AskQuestionCommand, AskQuestionHandler, DermatologyConsultationCommand,
    DermatologyConsultationHandler, InterpretReportCommand, InterpretReportHandler,
    MedicalChatCommand, MedicalChatHandler,
};
use crate::domain::agents::AgentRegistry;
use crate::domain::foundation::{Envelope, UploadError};
use crate::ports::{DocumentExtractor, ImageNormalizer};

use super::dto::{ChatRequest, PaymentGateParams, QuestionRequest, UploadedFile};

/// Multipart field holding the uploaded file.
pub const FILE_FIELD: &str = "file";

/// Multipart field holding the optional symptom notes.
pub const SYMPTOMS_FIELD: &str = "symptoms";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the medical endpoints.
#[derive(Clone)]
pub struct MedicalAppState {
    pub registry: AgentRegistry,
    pub extractor: Arc<dyn DocumentExtractor>,
    pub normalizer: Arc<dyn ImageNormalizer>,
    /// Upload limit in bytes.
    pub max_file_size: usize,
}

impl MedicalAppState {
    pub fn new(
        registry: AgentRegistry,
        extractor: Arc<dyn DocumentExtractor>,
        normalizer: Arc<dyn ImageNormalizer>,
        max_file_size: usize,
    ) -> Self {
        Self {
            registry,
            extractor,
            normalizer,
            max_file_size,
        }
    }

    pub fn chat_handler(&self) -> MedicalChatHandler {
        MedicalChatHandler::new(self.registry.clone())
    }

    pub fn report_handler(&self) -> InterpretReportHandler {
        InterpretReportHandler::new(
            self.registry.clone(),
            self.extractor.clone(),
            self.max_file_size,
        )
    }

    pub fn education_handler(&self) -> AskQuestionHandler {
        AskQuestionHandler::health_education(self.registry.clone())
    }

    pub fn medication_handler(&self) -> AskQuestionHandler {
        AskQuestionHandler::medication(self.registry.clone())
    }

    pub fn dermatology_handler(&self) -> DermatologyConsultationHandler {
        DermatologyConsultationHandler::new(
            self.registry.clone(),
            self.normalizer.clone(),
            self.max_file_size,
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Multipart
// ════════════════════════════════════════════════════════════════════════════════

/// Fields of an upload form.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    symptoms: String,
}

/// Maps a multipart failure to the envelope shown to the client.
///
/// A body cut off by the request size limit reports the upload limit.
fn upload_failure(err: MultipartError, max_file_size: usize) -> Envelope {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::debug!(limit = max_file_size, "upload exceeded body limit");
        return Envelope::failure(UploadError::TooLarge { max_bytes: max_file_size }.to_string());
    }
    Envelope::failure(format!("上传内容解析失败: {}", err))
}

async fn read_upload_form(
    mut multipart: Multipart,
    max_file_size: usize,
) -> Result<UploadForm, Envelope> {
    let mut form = UploadForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return Err(upload_failure(err, max_file_size)),
        };

        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content = field
                    .bytes()
                    .await
                    .map_err(|err| upload_failure(err, max_file_size))?;
                form.file = Some(UploadedFile {
                    file_name,
                    content: content.to_vec(),
                });
            }
            Some(SYMPTOMS_FIELD) => {
                form.symptoms = field
                    .text()
                    .await
                    .map_err(|err| upload_failure(err, max_file_size))?;
            }
            _ => {}
        }
    }

    Ok(form)
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/medical-chat - Classify a message and answer it
pub async fn medical_chat(
    State(state): State<MedicalAppState>,
    Json(request): Json<ChatRequest>,
) -> Json<Envelope> {
    let cmd = MedicalChatCommand {
        message: request.message,
    };
    Json(state.chat_handler().handle(cmd).await)
}

/// POST /api/report-interpretation - Interpret an uploaded report
pub async fn report_interpretation(
    State(state): State<MedicalAppState>,
    Query(params): Query<PaymentGateParams>,
    multipart: Multipart,
) -> Json<Envelope> {
    let form = match read_upload_form(multipart, state.max_file_size).await {
        Ok(form) => form,
        Err(failure) => return Json(failure),
    };
    let Some(file) = form.file else {
        return Json(Envelope::failure("请上传文件"));
    };

    let cmd = InterpretReportCommand {
        file_name: file.file_name,
        content: file.content,
        payment_verified: params.payment_verified,
    };
    Json(state.report_handler().handle(cmd).await)
}

/// POST /api/health-education - Answer a health education question
pub async fn health_education(
    State(state): State<MedicalAppState>,
    Query(params): Query<PaymentGateParams>,
    Json(request): Json<QuestionRequest>,
) -> Json<Envelope> {
    let cmd = AskQuestionCommand {
        question: request.question,
        payment_verified: params.payment_verified,
    };
    Json(state.education_handler().handle(cmd).await)
}

/// POST /api/dermatology-consultation - Analyse an uploaded skin photo
pub async fn dermatology_consultation(
    State(state): State<MedicalAppState>,
    Query(params): Query<PaymentGateParams>,
    multipart: Multipart,
) -> Json<Envelope> {
    let form = match read_upload_form(multipart, state.max_file_size).await {
        Ok(form) => form,
        Err(failure) => return Json(failure),
    };
    let Some(file) = form.file else {
        return Json(Envelope::failure("请上传图片"));
    };

    let cmd = DermatologyConsultationCommand {
        file_name: file.file_name,
        content: file.content,
        symptoms: form.symptoms,
        payment_verified: params.payment_verified,
    };
    Json(state.dermatology_handler().handle(cmd).await)
}

/// POST /api/medication-consultation - Answer a medication question
pub async fn medication_consultation(
    State(state): State<MedicalAppState>,
    Query(params): Query<PaymentGateParams>,
    Json(request): Json<QuestionRequest>,
) -> Json<Envelope> {
    let cmd = AskQuestionCommand {
        question: request.question,
        payment_verified: params.payment_verified,
    };
    Json(state.medication_handler().handle(cmd).await)
}
