//! Error types for the Wrangler transformation pipeline.
//!
//! Errors are split by when they can happen: configuration and job errors are
//! raised before a batch starts, pipeline errors belong to a single item and
//! never escape the batch runner.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Wrangler operations.
#[derive(Error, Debug)]
pub enum WranglerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Job rejected before any item was processed
    #[error("Invalid job: {0}")]
    Job(#[from] JobError),

    /// Single-item pipeline errors (only surfaced when running one item directly)
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The background batch task panicked or was aborted
    #[error("Batch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pre-flight job validation errors. A job that fails here never starts.
#[derive(Error, Debug)]
pub enum JobError {
    /// Parameters that make the whole batch meaningless
    #[error("{0}")]
    InvalidParameters(String),
}

/// Per-item processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Source file does not exist
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Image encoding failed
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// Container not recognised
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Decoded dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Destination exists and the collision policy forbids replacing it
    #[error("Destination already exists: {0}")]
    DestinationExists(PathBuf),

    /// Copy target is the source itself
    #[error("Refusing to copy {0} onto itself")]
    SameFile(PathBuf),

    /// Filesystem failure while reading or writing
    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience type alias for Wrangler results.
pub type Result<T> = std::result::Result<T, WranglerError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
