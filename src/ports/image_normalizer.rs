//! Image Normalizer Port - prepares uploaded photos for vision calls.

use thiserror::Error;

/// Port for converting arbitrary uploaded image bytes into the base64 JPEG
/// the vision model expects.
///
/// Implementations convert format, reduce size, and encode; CPU-bound like
/// [`super::DocumentExtractor`].
pub trait ImageNormalizer: Send + Sync {
    /// Returns base64-encoded JPEG bytes without a `data:` prefix.
    fn normalize(&self, bytes: &[u8]) -> Result<String, ImageError>;
}

/// Image processing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("图片处理失败: {0}")]
    Decode(String),

    #[error("图片处理失败: {0}")]
    Encode(String),
}
