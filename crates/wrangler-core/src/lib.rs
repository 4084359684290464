//! Wrangler Core - Embeddable batch image transformation library.
//!
//! Wrangler resizes, inverts, and renames/re-encodes batches of image files,
//! writing the results next to their sources or into a chosen directory.
//!
//! # Architecture
//!
//! Each item goes through the same stages, one item at a time:
//!
//! ```text
//! Validate → Decode → Normalize → Transform → Finalize → Resolve path → Encode/Write
//! ```
//!
//! A batch runs on a background tokio task. Progress, per-item status and the
//! final report arrive as ordered events; a failing item is recorded and the
//! batch moves on.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wrangler_core::{
//!     BatchJob, BatchRunner, Config, OutputDirectoryPolicy, OutputFormat, ResizeConfig,
//!     TransformConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> wrangler_core::Result<()> {
//!     let config = Config::load()?;
//!     let job = BatchJob::new(
//!         vec!["./photo.png".into()],
//!         TransformConfig::Resize(ResizeConfig::new(800, 600, OutputFormat::Jpeg)),
//!         OutputDirectoryPolicy::ExplicitDirectory("./out".into()),
//!         &config.limits,
//!     )?;
//!
//!     let report = BatchRunner::new(&config).start(job).finish().await?;
//!     println!("{} succeeded", report.stats.succeeded);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod batch;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod transform;
pub mod types;

// Re-exports for convenient access
pub use batch::{
    BatchEvent, BatchHandle, BatchJob, BatchRunner, CancelFlag, ProgressEvent, ProgressObserver,
    StatusEvent, StatusKind,
};
pub use config::Config;
pub use error::{ConfigError, JobError, PipelineError, PipelineResult, Result, WranglerError};
pub use output::{ReportFormat, ReportWriter};
pub use pipeline::{FileDiscovery, OutputDirectoryPolicy, RenameRule};
pub use transform::{InvertConfig, RenameConfig, ResizeConfig, TransformConfig};
pub use types::{
    BatchReport, CollisionPolicy, ItemOutcome, ItemReport, Operation, OutputFormat,
    ProcessingStats,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
