//! Upload limits and image normalization settings

use serde::Deserialize;

use super::error::ValidationError;

const MAX_UPLOAD_CEILING: usize = 100 * 1024 * 1024;
const MIN_IMAGE_DIMENSION: u32 = 64;

/// Upload configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Largest accepted report or photo, in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: usize,

    /// Longest edge of photos sent to the vision model
    #[serde(default = "default_max_image_dimension")]
    pub max_image_dimension: u32,

    /// JPEG quality for normalized photos
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl UploadConfig {
    /// Validate upload configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_file_size_bytes == 0 || self.max_file_size_bytes > MAX_UPLOAD_CEILING {
            return Err(ValidationError::InvalidUploadLimit);
        }
        if self.max_image_dimension < MIN_IMAGE_DIMENSION {
            return Err(ValidationError::InvalidImageDimension);
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ValidationError::InvalidJpegQuality);
        }
        Ok(())
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size(),
            max_image_dimension: default_max_image_dimension(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

fn default_max_file_size() -> usize {
    10 * 1024 * 1024
}

fn default_max_image_dimension() -> u32 {
    2048
}

fn default_jpeg_quality() -> u8 {
    85
}
