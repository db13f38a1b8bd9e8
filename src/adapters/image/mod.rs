//! Image adapters.
//!
//! - `JpegNormalizer` - Decodes uploads and re-encodes them as bounded-size base64 JPEG

mod jpeg_normalizer;

pub use jpeg_normalizer::{JpegNormalizer, DEFAULT_JPEG_QUALITY, DEFAULT_MAX_DIMENSION};
