//! Image decoding with content-based format detection and dimension limits.

use image::{DynamicImage, ImageDecoder as _, ImageFormat};
use std::io::Cursor;
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

use super::normalize::PixelMode;
use super::validate::Validator;

/// Image decoder with configurable limits.
#[derive(Debug, Clone)]
pub struct ImageDecoder {
    limits: LimitsConfig,
    validator: Validator,
}

/// Result of decoding an image.
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Detected container format
    pub format: ImageFormat,
    /// Pixel layout as decoded, before normalization
    pub mode: PixelMode,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Source file size in bytes
    pub file_size: u64,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self {
            validator: Validator::new(limits.clone()),
            limits,
        }
    }

    /// Validate and decode a file from disk.
    pub fn decode(&self, path: &Path) -> Result<DecodedImage, PipelineError> {
        let container = self.validator.validate(path)?;
        tracing::trace!("  Sniffed {} container: {:?}", container, path);

        let bytes = std::fs::read(path).map_err(|e| PipelineError::io(path, e))?;
        self.decode_bytes(bytes, path)
    }

    /// Decode an in-memory buffer. `path` is used for error context and as a
    /// format hint when the content is ambiguous.
    pub fn decode_bytes(&self, bytes: Vec<u8>, path: &Path) -> Result<DecodedImage, PipelineError> {
        let file_size = bytes.len() as u64;
        let decode_err = |e: image::ImageError| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;
        let format = match reader.format() {
            Some(f) => f,
            None => ImageFormat::from_path(path).map_err(|_| PipelineError::UnsupportedFormat {
                path: path.to_path_buf(),
                format: path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            })?,
        };

        let decoder = reader.into_decoder().map_err(decode_err)?;
        let (width, height) = decoder.dimensions();
        if width > self.limits.max_image_dimension || height > self.limits.max_image_dimension {
            return Err(PipelineError::ImageTooLarge {
                path: path.to_path_buf(),
                width,
                height,
                max_dim: self.limits.max_image_dimension,
            });
        }

        let image = DynamicImage::from_decoder(decoder).map_err(decode_err)?;
        let mode = PixelMode::of(&image);
        tracing::debug!(
            "Decoded {:?}: {}x{} {:?} ({})",
            path,
            width,
            height,
            mode,
            format_to_string(format)
        );

        Ok(DecodedImage {
            image,
            format,
            mode,
            width,
            height,
            file_size,
        })
    }
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_string(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        ImageFormat::WebP => "webp".to_string(),
        ImageFormat::Gif => "gif".to_string(),
        ImageFormat::Tiff => "tiff".to_string(),
        ImageFormat::Bmp => "bmp".to_string(),
        _ => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(image: &DynamicImage) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_format_to_string() {
        assert_eq!(format_to_string(ImageFormat::Jpeg), "jpeg");
        assert_eq!(format_to_string(ImageFormat::Png), "png");
        assert_eq!(format_to_string(ImageFormat::WebP), "webp");
        // No codec enabled for these
        assert_eq!(format_to_string(ImageFormat::Avif), "unknown");
    }

    #[test]
    fn test_format_detected_by_content() {
        let decoder = ImageDecoder::new(LimitsConfig::default());
        let bytes = png_bytes(&DynamicImage::new_rgb8(4, 3));

        let result = decoder
            .decode_bytes(bytes, Path::new("misnamed.jpg"))
            .unwrap();
        assert_eq!(result.format, ImageFormat::Png);
        assert_eq!((result.width, result.height), (4, 3));
        assert_eq!(result.mode, PixelMode::Rgb8);
    }

    #[test]
    fn test_sixteen_bit_mode_is_reported() {
        let decoder = ImageDecoder::new(LimitsConfig::default());
        let bytes = png_bytes(&DynamicImage::new_luma16(2, 2));

        let result = decoder.decode_bytes(bytes, Path::new("depth.png")).unwrap();
        assert_eq!(result.mode, PixelMode::Gray16);
    }

    #[test]
    fn test_dimension_limit() {
        let limits = LimitsConfig {
            max_image_dimension: 8,
            ..LimitsConfig::default()
        };
        let decoder = ImageDecoder::new(limits);
        let bytes = png_bytes(&DynamicImage::new_rgb8(16, 4));

        let err = decoder
            .decode_bytes(bytes, Path::new("wide.png"))
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::ImageTooLarge { width: 16, .. }));
    }

    #[test]
    fn test_corrupt_payload_is_decode_error() {
        let decoder = ImageDecoder::new(LimitsConfig::default());
        let mut bytes = png_bytes(&DynamicImage::new_rgb8(8, 8));
        bytes.truncate(20);

        let err = decoder
            .decode_bytes(bytes, Path::new("truncated.png"))
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }
}
