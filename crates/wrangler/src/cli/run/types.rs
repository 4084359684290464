//! Command-line value enums and their mapping onto core types.

use clap::ValueEnum;
use wrangler_core::{CollisionPolicy, OutputFormat, ReportFormat};

/// Output image container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ImageFormat {
    /// Lossy, no transparency
    #[value(alias = "jpg")]
    Jpeg,
    /// Lossless, keeps transparency
    Png,
    /// Lossless WebP, keeps transparency
    Webp,
}

impl From<ImageFormat> for OutputFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => OutputFormat::Jpeg,
            ImageFormat::Png => OutputFormat::Png,
            ImageFormat::Webp => OutputFormat::WebP,
        }
    }
}

/// What to do when an output file already exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Collision {
    /// Replace the existing file
    Overwrite,
    /// Write name_1.ext, name_2.ext, ... instead
    Suffix,
    /// Fail that file and keep going
    Fail,
}

impl From<Collision> for CollisionPolicy {
    fn from(collision: Collision) -> Self {
        match collision {
            Collision::Overwrite => CollisionPolicy::Overwrite,
            Collision::Suffix => CollisionPolicy::Suffix,
            Collision::Fail => CollisionPolicy::Fail,
        }
    }
}

/// Report file formats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Single JSON document
    #[default]
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<ReportKind> for ReportFormat {
    fn from(kind: ReportKind) -> Self {
        match kind {
            ReportKind::Json => ReportFormat::Json,
            ReportKind::Jsonl => ReportFormat::JsonLines,
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportKind::Json => write!(f, "json"),
            ReportKind::Jsonl => write!(f, "jsonl"),
        }
    }
}
