//! Core data types shared by the pipeline, the batch runner and front ends.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Encode targets. Exactly three containers are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossy, opaque-only
    #[serde(alias = "jpg")]
    Jpeg,
    /// Lossless, keeps alpha
    Png,
    /// Keeps alpha
    WebP,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Canonical lowercase file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    /// Whether the container can store an alpha channel.
    pub fn supports_alpha(self) -> bool {
        !matches!(self, Self::Jpeg)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jpeg => write!(f, "JPEG"),
            Self::Png => write!(f, "PNG"),
            Self::WebP => write!(f, "WEBP"),
        }
    }
}

/// What to do when a resolved destination already exists on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Replace the existing file
    Overwrite,
    /// Append `_1`, `_2`, ... to the stem until the name is free
    #[default]
    Suffix,
    /// Fail the item
    Fail,
}

impl CollisionPolicy {
    /// Parse policy from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "overwrite" => Some(Self::Overwrite),
            "suffix" => Some(Self::Suffix),
            "fail" => Some(Self::Fail),
            _ => None,
        }
    }
}

/// The three batch operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Resize,
    Invert,
    Rename,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resize => write!(f, "resize"),
            Self::Invert => write!(f, "invert"),
            Self::Rename => write!(f, "rename"),
        }
    }
}

/// How a single item ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ItemOutcome {
    Succeeded,
    Failed { reason: String },
    /// Never started because the batch was cancelled first
    Cancelled,
}

/// Per-item entry of the final batch report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemReport {
    /// 1-based position in the job
    pub index: usize,

    /// Source file as given in the job
    pub source: PathBuf,

    /// Written file, when the item succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

impl ItemReport {
    /// Whether the item produced an output.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ItemOutcome::Succeeded)
    }
}

/// Processing statistics for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProcessingStats {
    /// Items transformed successfully
    pub succeeded: usize,

    /// Items that failed
    pub failed: usize,

    /// Items skipped because the batch was cancelled
    pub skipped: usize,

    /// Processing rate in images per second
    pub images_per_second: f64,

    /// Total processing time in seconds
    pub total_seconds: f64,
}

/// The structured result of a whole batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub operation: Operation,

    /// One entry per source, in job order
    pub items: Vec<ItemReport>,

    pub stats: ProcessingStats,

    /// True when the run stopped early on request
    pub cancelled: bool,
}

impl BatchReport {
    /// Items that failed, in job order.
    pub fn failures(&self) -> impl Iterator<Item = &ItemReport> {
        self.items
            .iter()
            .filter(|item| matches!(item.outcome, ItemOutcome::Failed { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("JPEG"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::parse("jpg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::parse("Png"), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::parse("webp"), Some(OutputFormat::WebP));
        assert_eq!(OutputFormat::parse("gif"), None);
    }

    #[test]
    fn test_output_format_extension() {
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::WebP.extension(), "webp");
    }

    #[test]
    fn test_only_jpeg_lacks_alpha() {
        assert!(!OutputFormat::Jpeg.supports_alpha());
        assert!(OutputFormat::Png.supports_alpha());
        assert!(OutputFormat::WebP.supports_alpha());
    }

    #[test]
    fn test_output_format_serde_accepts_jpg_alias() {
        let parsed: OutputFormat = serde_json::from_str("\"jpg\"").unwrap();
        assert_eq!(parsed, OutputFormat::Jpeg);
        assert_eq!(serde_json::to_string(&OutputFormat::WebP).unwrap(), "\"webp\"");
    }

    #[test]
    fn test_item_report_serializes_flat_outcome() {
        let item = ItemReport {
            index: 2,
            source: PathBuf::from("/photos/broken.png"),
            output: None,
            outcome: ItemOutcome::Failed {
                reason: "Decode error".to_string(),
            },
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"status\":\"failed\""));
        assert!(json.contains("\"reason\":\"Decode error\""));
        assert!(!json.contains("output"));
    }

    #[test]
    fn test_report_failures_filters_in_order() {
        let report = BatchReport {
            operation: Operation::Invert,
            items: vec![
                ItemReport {
                    index: 1,
                    source: PathBuf::from("a.png"),
                    output: Some(PathBuf::from("out/a.png")),
                    outcome: ItemOutcome::Succeeded,
                },
                ItemReport {
                    index: 2,
                    source: PathBuf::from("b.png"),
                    output: None,
                    outcome: ItemOutcome::Failed {
                        reason: "boom".into(),
                    },
                },
            ],
            stats: ProcessingStats::default(),
            cancelled: false,
        };
        let failed: Vec<_> = report.failures().map(|i| i.index).collect();
        assert_eq!(failed, vec![2]);
    }
}
