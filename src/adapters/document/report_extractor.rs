//! Report text extraction for Word, PDF and plain-text uploads.
//!
//! Word documents are zip archives; the body lives in `word/document.xml`
//! and is read paragraph by paragraph with quick-xml. PDFs go through
//! `pdf-extract`. Plain text is decoded as UTF-8, replacing invalid bytes.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader as XmlReader;
use zip::ZipArchive;

use crate::domain::foundation::DocumentFormat;
use crate::ports::{DocumentExtractor, ExtractionError};

const DOCUMENT_XML_PATH: &str = "word/document.xml";

/// Extracts report text from the supported upload formats.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportTextExtractor;

impl ReportTextExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ExtractionError::Docx(format!("failed to open archive: {}", e)))?;

        let mut entry = archive
            .by_name(DOCUMENT_XML_PATH)
            .map_err(|e| ExtractionError::Docx(format!("missing {}: {}", DOCUMENT_XML_PATH, e)))?;

        let mut xml = String::new();
        entry
            .read_to_string(&mut xml)
            .map_err(|e| ExtractionError::Docx(format!("failed to read {}: {}", DOCUMENT_XML_PATH, e)))?;

        docx_paragraphs(&xml)
    }

    fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
        // pdf-extract's font parser can panic on some embedded fonts.
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(bytes)
        }));

        match result {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(ExtractionError::Pdf(e.to_string())),
            Err(_) => Err(ExtractionError::Pdf("unsupported PDF content".to_string())),
        }
    }
}

impl DocumentExtractor for ReportTextExtractor {
    fn extract(&self, format: DocumentFormat, bytes: &[u8]) -> Result<String, ExtractionError> {
        let text = match format {
            DocumentFormat::Docx => Self::extract_docx(bytes)?,
            DocumentFormat::Pdf => Self::extract_pdf(bytes)?,
            DocumentFormat::PlainText => String::from_utf8_lossy(bytes).into_owned(),
        };

        tracing::debug!(?format, bytes = bytes.len(), chars = text.chars().count(), "report text extracted");
        Ok(text)
    }
}

/// Joins the text runs of each `w:p` paragraph, one paragraph per line.
fn docx_paragraphs(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = XmlReader::from_str(xml);
    let mut buf = Vec::new();
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => current = Some(String::new()),
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" => {
                    if let Some(paragraph) = current.as_mut() {
                        paragraph.push('\t');
                    }
                }
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let content = t
                    .unescape()
                    .map_err(|e| ExtractionError::Docx(e.to_string()))?;
                if let Some(paragraph) = current.as_mut() {
                    paragraph.push_str(&content);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    if let Some(paragraph) = current.take() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractionError::Docx(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs.join("\n"))
}
