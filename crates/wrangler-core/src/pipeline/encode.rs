//! Encoding for the three output containers.
//!
//! Images are encoded into memory first so a failed encode never leaves a
//! truncated file behind.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::DynamicImage;
use std::path::Path;

use crate::config::EncodingConfig;
use crate::error::PipelineError;
use crate::types::OutputFormat;

/// Encodes images with format-appropriate settings.
#[derive(Debug, Clone)]
pub struct ImageEncoder {
    config: EncodingConfig,
}

impl ImageEncoder {
    /// Create a new encoder with the given settings.
    pub fn new(config: EncodingConfig) -> Self {
        Self { config }
    }

    /// Encode to an in-memory buffer. `path` is only used for error context.
    ///
    /// The image must already be finalized for `format` (see
    /// [`finalize_for`](super::color::finalize_for)).
    pub fn encode(
        &self,
        image: &DynamicImage,
        format: OutputFormat,
        path: &Path,
    ) -> Result<Vec<u8>, PipelineError> {
        let mut buffer = Vec::new();
        let result = match format {
            OutputFormat::Jpeg => image.write_with_encoder(JpegEncoder::new_with_quality(
                &mut buffer,
                self.config.jpeg_quality,
            )),
            OutputFormat::Png => image.write_with_encoder(PngEncoder::new_with_quality(
                &mut buffer,
                self.png_compression(),
                FilterType::Adaptive,
            )),
            OutputFormat::WebP => image.write_with_encoder(WebPEncoder::new_lossless(&mut buffer)),
        };

        result.map_err(|e| PipelineError::Encode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(buffer)
    }

    /// Encode and write to `path`, creating the parent directory if needed.
    ///
    /// Returns the number of bytes written.
    pub fn write(
        &self,
        image: &DynamicImage,
        format: OutputFormat,
        path: &Path,
    ) -> Result<u64, PipelineError> {
        let bytes = self.encode(image, format, path)?;
        ensure_parent_dir(path)?;
        std::fs::write(path, &bytes).map_err(|e| PipelineError::io(path, e))?;

        tracing::debug!(
            "Wrote {} {}x{} to {:?} ({} bytes)",
            format,
            image.width(),
            image.height(),
            path,
            bytes.len()
        );
        Ok(bytes.len() as u64)
    }

    fn png_compression(&self) -> CompressionType {
        match self.config.png_compression.as_str() {
            "fast" => CompressionType::Fast,
            "best" => CompressionType::Best,
            _ => CompressionType::Default,
        }
    }
}

/// Create the destination's parent directory when it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> Result<(), PipelineError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))
        }
        _ => Ok(()),
    }
}
