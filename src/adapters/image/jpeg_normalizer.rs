//! JPEG normalizer - uploaded photos to base64 JPEG for the vision model.
//!
//! Any format the `image` crate decodes is accepted. Transparent pixels are
//! flattened onto white, oversized images are scaled down to fit
//! `max_dimension` (aspect ratio kept), and the result is re-encoded as JPEG.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage};

use crate::ports::{ImageError, ImageNormalizer};

/// Default longest side after normalization, in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 2048;

/// Default JPEG quality.
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Re-encodes uploads as bounded-size JPEG.
#[derive(Debug, Clone, Copy)]
pub struct JpegNormalizer {
    max_dimension: u32,
    quality: u8,
}

impl Default for JpegNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DIMENSION, DEFAULT_JPEG_QUALITY)
    }
}

impl JpegNormalizer {
    pub fn new(max_dimension: u32, quality: u8) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
            quality: quality.clamp(1, 100),
        }
    }

    fn flatten(image: &DynamicImage) -> RgbImage {
        let rgba = image.to_rgba8();
        RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            let pixel = rgba.get_pixel(x, y);
            let alpha = u16::from(pixel[3]);
            let blend = |channel: u8| -> u8 {
                ((u16::from(channel) * alpha + 255 * (255 - alpha)) / 255) as u8
            };
            Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])])
        })
    }

    fn bounded(&self, rgb: RgbImage) -> RgbImage {
        if rgb.width() <= self.max_dimension && rgb.height() <= self.max_dimension {
            return rgb;
        }
        DynamicImage::ImageRgb8(rgb)
            .resize(self.max_dimension, self.max_dimension, FilterType::Triangle)
            .to_rgb8()
    }

    /// Returns the normalized JPEG bytes.
    pub fn to_jpeg(&self, bytes: &[u8]) -> Result<Vec<u8>, ImageError> {
        let image =
            image::load_from_memory(bytes).map_err(|e| ImageError::Decode(e.to_string()))?;
        let (width, height) = (image.width(), image.height());

        let rgb = self.bounded(Self::flatten(&image));

        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, self.quality)
            .encode_image(&rgb)
            .map_err(|e| ImageError::Encode(e.to_string()))?;

        tracing::debug!(
            width,
            height,
            out_width = rgb.width(),
            out_height = rgb.height(),
            out_bytes = jpeg.len(),
            "image normalized"
        );
        Ok(jpeg)
    }
}

impl ImageNormalizer for JpegNormalizer {
    fn normalize(&self, bytes: &[u8]) -> Result<String, ImageError> {
        Ok(BASE64.encode(self.to_jpeg(bytes)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32, pixel: Rgba<u8>) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, pixel);
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut bytes, ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn png_becomes_jpeg() {
        let jpeg = JpegNormalizer::default()
            .to_jpeg(&png(16, 8, Rgba([200, 10, 10, 255])))
            .unwrap();

        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[test]
    fn oversized_images_are_scaled_to_fit() {
        let jpeg = JpegNormalizer::new(32, 85)
            .to_jpeg(&png(128, 64, Rgba([0, 0, 255, 255])))
            .unwrap();

        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 16));
    }

    #[test]
    fn small_images_are_not_upscaled() {
        let jpeg = JpegNormalizer::new(2048, 85)
            .to_jpeg(&png(10, 10, Rgba([0, 0, 0, 255])))
            .unwrap();

        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (10, 10));
    }

    #[test]
    fn transparency_is_flattened_onto_white() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0])));
        let flattened = JpegNormalizer::flatten(&image);
        assert_eq!(flattened.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn normalize_returns_plain_base64() {
        let encoded = JpegNormalizer::default()
            .normalize(&png(4, 4, Rgba([1, 2, 3, 255])))
            .unwrap();

        assert!(!encoded.starts_with("data:"));
        let bytes = BASE64.decode(encoded).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = JpegNormalizer::default().normalize(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ImageError::Decode(_)));
        assert!(err.to_string().starts_with("图片处理失败: "));
    }
}
