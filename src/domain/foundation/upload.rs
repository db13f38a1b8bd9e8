//! Upload validation for report documents and skin images.
//!
//! Checks run before any bytes are handed to an extractor or the model, so a
//! rejected upload never costs a remote call.

use thiserror::Error;

const DOCUMENT_EXTENSIONS: &[&str] = &["docx", "pdf", "txt"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif"];
const MIB: usize = 1024 * 1024;

/// What an upload is expected to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// A medical report (Word, PDF, or plain text).
    Document,
    /// A photo of the affected skin.
    Image,
}

impl UploadKind {
    /// Lower-case extensions accepted for this kind.
    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            UploadKind::Document => DOCUMENT_EXTENSIONS,
            UploadKind::Image => IMAGE_EXTENSIONS,
        }
    }
}

/// Container format of an uploaded report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Docx,
    Pdf,
    PlainText,
}

impl DocumentFormat {
    /// Detects the format from a file name's extension.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        match file_extension(file_name)?.as_str() {
            "docx" => Some(DocumentFormat::Docx),
            "pdf" => Some(DocumentFormat::Pdf),
            "txt" => Some(DocumentFormat::PlainText),
            _ => None,
        }
    }
}

/// Upload rejected before processing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("不支持的文件类型，请上传Word或PDF文件")]
    UnsupportedDocument,

    #[error("不支持的图片格式，请上传JPG、PNG等图片文件")]
    UnsupportedImage,

    #[error("文件大小超过限制 ({}MB)", .max_bytes / MIB)]
    TooLarge { max_bytes: usize },
}

/// Returns the lower-case extension after the last dot, if there is one.
pub fn file_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Checks that the file name carries an extension allowed for `kind`.
pub fn validate_file_type(file_name: &str, kind: UploadKind) -> Result<(), UploadError> {
    let allowed = file_extension(file_name)
        .is_some_and(|ext| kind.allowed_extensions().contains(&ext.as_str()));

    if allowed {
        Ok(())
    } else {
        Err(match kind {
            UploadKind::Document => UploadError::UnsupportedDocument,
            UploadKind::Image => UploadError::UnsupportedImage,
        })
    }
}

/// Checks that an upload does not exceed `max_bytes`.
pub fn validate_file_size(size: usize, max_bytes: usize) -> Result<(), UploadError> {
    if size <= max_bytes {
        Ok(())
    } else {
        Err(UploadError::TooLarge { max_bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(file_extension("Report.PDF"), Some("pdf".to_string()));
        assert_eq!(file_extension("archive.tar.gz"), Some("gz".to_string()));
    }

    #[test]
    fn missing_extension_is_none() {
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension("trailing."), None);
    }

    #[test]
    fn documents_accept_word_pdf_and_text() {
        for name in ["a.docx", "b.PDF", "c.txt"] {
            assert!(validate_file_type(name, UploadKind::Document).is_ok(), "{name}");
        }
        assert_eq!(
            validate_file_type("scan.png", UploadKind::Document),
            Err(UploadError::UnsupportedDocument)
        );
        assert_eq!(
            validate_file_type("legacy.doc", UploadKind::Document),
            Err(UploadError::UnsupportedDocument)
        );
    }

    #[test]
    fn images_accept_common_formats() {
        for name in ["a.jpg", "b.JPEG", "c.png", "d.bmp", "e.gif"] {
            assert!(validate_file_type(name, UploadKind::Image).is_ok(), "{name}");
        }
        assert_eq!(
            validate_file_type("photo.heic", UploadKind::Image),
            Err(UploadError::UnsupportedImage)
        );
    }

    #[test]
    fn size_limit_is_inclusive() {
        let max = 10 * 1024 * 1024;
        assert!(validate_file_size(max, max).is_ok());

        let err = validate_file_size(max + 1, max).unwrap_err();
        assert_eq!(err.to_string(), "文件大小超过限制 (10MB)");
    }

    #[test]
    fn document_format_from_name() {
        assert_eq!(DocumentFormat::from_file_name("x.docx"), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_file_name("x.Pdf"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_file_name("x.txt"), Some(DocumentFormat::PlainText));
        assert_eq!(DocumentFormat::from_file_name("x.doc"), None);
    }
}
