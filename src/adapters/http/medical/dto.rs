//! HTTP DTOs for the medical endpoints.

use serde::Deserialize;

/// Body of `POST /api/medical-chat`.
///
/// A missing `message` reads as empty and is rejected by the handler.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Body of the single-question consultation endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRequest {
    #[serde(default)]
    pub question: String,
}

/// Query string accepted by every gated endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentGateParams {
    #[serde(default)]
    pub payment_verified: bool,
}

/// A file read from a multipart upload.
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    pub file_name: String,
    pub content: Vec<u8>,
}
