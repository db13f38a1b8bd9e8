//! Document adapters - Implementations for report text extraction.
//!
//! - `ReportTextExtractor` - Word (zip + quick-xml), PDF (pdf-extract) and plain text

mod report_extractor;

pub use report_extractor::ReportTextExtractor;
