//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

use crate::types::{CollisionPolicy, OutputFormat};

/// Defaults used when the caller does not spell out operation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Resize target width in pixels
    pub width: u32,

    /// Resize target height in pixels
    pub height: u32,

    /// Output container for resize, invert and converting renames
    pub format: OutputFormat,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            format: OutputFormat::Jpeg,
        }
    }
}

/// Encoder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// JPEG quality, 1-100
    pub jpeg_quality: u8,

    /// PNG compression: "fast", "default" or "best"
    pub png_compression: String,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 95,
            png_compression: "best".to_string(),
        }
    }
}

/// Processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Input extensions picked up when a directory is given
    pub supported_formats: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            supported_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "bmp".to_string(),
                "gif".to_string(),
                "tif".to_string(),
                "tiff".to_string(),
                "webp".to_string(),
                "heic".to_string(),
                "heif".to_string(),
            ],
        }
    }
}

/// Batch runner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Max events buffered between the runner task and its observer
    pub event_buffer: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { event_buffer: 64 }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum source file size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum decoded dimension (width or height)
    pub max_image_dimension: u32,

    /// Maximum resize target dimension
    pub max_target_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 200,
            max_image_dimension: 20000,
            max_target_dimension: 10000,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// What to do when a destination file already exists
    pub collision: CollisionPolicy,

    /// Directory used when neither an explicit directory nor in-place output
    /// is requested (supports `~`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_dir: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            collision: CollisionPolicy::Suffix,
            default_dir: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
