//! Document Extractor Port - plain text out of uploaded reports.
//!
//! The report interpretation flow only ever sees text; recognizing the
//! container format and failing on corrupt input is the adapter's job.

use thiserror::Error;

use crate::domain::foundation::DocumentFormat;

/// Port for turning report bytes into plain text.
///
/// # Contract
///
/// Implementations must:
/// - Return the document's text in reading order
/// - Fail with `ExtractionError` on unsupported or corrupt input rather than
///   returning partial garbage
///
/// Extraction is CPU-bound; async callers should run it on a blocking thread.
pub trait DocumentExtractor: Send + Sync {
    /// Extracts text from `bytes` interpreted as `format`.
    fn extract(&self, format: DocumentFormat, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Errors raised while extracting report text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("Word文档解析失败: {0}")]
    Docx(String),

    #[error("PDF文档解析失败: {0}")]
    Pdf(String),
}
