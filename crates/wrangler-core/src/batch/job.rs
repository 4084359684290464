//! Validated batch job description.

use std::path::PathBuf;

use crate::config::LimitsConfig;
use crate::error::JobError;
use crate::pipeline::OutputDirectoryPolicy;
use crate::transform::TransformConfig;
use crate::types::{CollisionPolicy, Operation};

/// One run: ordered sources, one operation, one destination policy.
///
/// Only constructible through [`BatchJob::new`], which rejects parameters
/// that would make every item fail.
#[derive(Debug, Clone)]
pub struct BatchJob {
    sources: Vec<PathBuf>,
    transform: TransformConfig,
    directory: OutputDirectoryPolicy,
    collision: CollisionPolicy,
}

impl BatchJob {
    pub fn new(
        sources: Vec<PathBuf>,
        transform: TransformConfig,
        directory: OutputDirectoryPolicy,
        limits: &LimitsConfig,
    ) -> Result<Self, JobError> {
        if sources.is_empty() {
            return Err(JobError::InvalidParameters(
                "No source files to process".to_string(),
            ));
        }

        transform.validate(limits.max_target_dimension)?;

        if let OutputDirectoryPolicy::ExplicitDirectory(dir) = &directory {
            if dir.as_os_str().is_empty() {
                return Err(JobError::InvalidParameters(
                    "Output directory is empty".to_string(),
                ));
            }
            if dir.exists() && !dir.is_dir() {
                return Err(JobError::InvalidParameters(format!(
                    "Output path {:?} exists and is not a directory",
                    dir
                )));
            }
        }

        Ok(Self {
            sources,
            transform,
            directory,
            collision: CollisionPolicy::default(),
        })
    }

    pub fn with_collision_policy(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn transform(&self) -> &TransformConfig {
        &self.transform
    }

    pub fn directory(&self) -> &OutputDirectoryPolicy {
        &self.directory
    }

    pub fn collision(&self) -> CollisionPolicy {
        self.collision
    }

    pub fn operation(&self) -> Operation {
        self.transform.operation()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
