//! The three batch operations and the shared machinery they run on.
//!
//! Every operation follows the same shape: decode (unless copying bytes),
//! normalize, transform, finalize for the target container, resolve the
//! destination, claim it under the collision policy, write.

pub mod invert;
pub mod rename;
pub mod resize;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::Config;
use crate::error::{JobError, PipelineError};
use crate::pipeline::{
    DecodedImage, ImageDecoder, ImageEncoder, OutputDirectoryPolicy, OutputPathResolver,
    RenameRule, TargetExtension,
};
use crate::types::{CollisionPolicy, Operation, OutputFormat};

pub use invert::{InvertConfig, InvertTransform};
pub use rename::{RenameConfig, RenameTransform};
pub use resize::{ResizeConfig, ResizeTransform};

/// One operation applied to one source file.
pub trait Transform: Send + Sync {
    /// Which operation this is.
    fn operation(&self) -> Operation;

    /// Transform `source` and return the path that was written.
    fn apply(&self, source: &Path, ctx: &TransformContext) -> Result<PathBuf, PipelineError>;
}

/// Typed per-operation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum TransformConfig {
    Resize(ResizeConfig),
    Invert(InvertConfig),
    Rename(RenameConfig),
}

impl TransformConfig {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Resize(_) => Operation::Resize,
            Self::Invert(_) => Operation::Invert,
            Self::Rename(_) => Operation::Rename,
        }
    }

    /// The filename rule applied to every output of this operation.
    pub fn rule(&self) -> &RenameRule {
        match self {
            Self::Resize(c) => &c.rule,
            Self::Invert(c) => &c.rule,
            Self::Rename(c) => &c.rule,
        }
    }

    /// Check parameters that would make the whole batch meaningless.
    pub fn validate(&self, max_target_dimension: u32) -> Result<(), JobError> {
        match self {
            Self::Resize(c) => {
                if c.width == 0 || c.height == 0 {
                    return Err(JobError::InvalidParameters(format!(
                        "Target size must be positive, got {}x{}",
                        c.width, c.height
                    )));
                }
                if c.width > max_target_dimension || c.height > max_target_dimension {
                    return Err(JobError::InvalidParameters(format!(
                        "Target size {}x{} exceeds the limit of {} pixels per side",
                        c.width, c.height, max_target_dimension
                    )));
                }
            }
            Self::Invert(_) => {}
            Self::Rename(c) => {
                if c.rule.is_noop() {
                    return Err(JobError::InvalidParameters(
                        "Rename needs replace text or a prefix".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Instantiate the transform.
    pub fn build(&self) -> Box<dyn Transform> {
        match self {
            Self::Resize(c) => Box::new(ResizeTransform::new(c.clone())),
            Self::Invert(c) => Box::new(InvertTransform::new(c.clone())),
            Self::Rename(c) => Box::new(RenameTransform::new(c.clone())),
        }
    }
}

/// Stages shared by all transforms in one batch.
#[derive(Debug, Clone)]
pub struct TransformContext {
    decoder: ImageDecoder,
    encoder: ImageEncoder,
    resolver: OutputPathResolver,
    collision: CollisionPolicy,
}

impl TransformContext {
    pub fn new(
        config: &Config,
        directory: OutputDirectoryPolicy,
        collision: CollisionPolicy,
    ) -> Self {
        Self {
            decoder: ImageDecoder::new(config.limits.clone()),
            encoder: ImageEncoder::new(config.encoding.clone()),
            resolver: OutputPathResolver::new(directory),
            collision,
        }
    }

    /// Validate and decode a source.
    pub fn decode(&self, source: &Path) -> Result<DecodedImage, PipelineError> {
        self.decoder.decode(source)
    }

    /// Resolve the destination for `source` and claim it under the
    /// collision policy.
    pub fn destination(
        &self,
        source: &Path,
        rule: &RenameRule,
        extension: TargetExtension,
    ) -> Result<PathBuf, PipelineError> {
        let resolved = self.resolver.resolve(source, rule, extension)?;
        self.collision.claim(resolved)
    }

    /// Derive the destination for an encoded output and write it there.
    pub fn write(
        &self,
        source: &Path,
        image: &DynamicImage,
        format: OutputFormat,
        rule: &RenameRule,
    ) -> Result<PathBuf, PipelineError> {
        let destination = self.destination(source, rule, TargetExtension::Format(format))?;
        self.encoder.write(image, format, &destination)?;
        Ok(destination)
    }
}

/// A transform bound to its context: what the batch runner calls per item.
pub struct TransformProcessor {
    transform: Box<dyn Transform>,
    context: TransformContext,
}

impl TransformProcessor {
    pub fn new(transform: Box<dyn Transform>, context: TransformContext) -> Self {
        Self { transform, context }
    }

    pub fn operation(&self) -> Operation {
        self.transform.operation()
    }

    /// Process a single source file.
    pub fn process(&self, source: &Path) -> Result<PathBuf, PipelineError> {
        let start = Instant::now();
        tracing::debug!("Processing ({}): {:?}", self.operation(), source);

        let output = self.transform.apply(source, &self.context)?;

        tracing::debug!(
            "Processed {:?} -> {:?} in {:?}",
            source,
            output,
            start.elapsed()
        );
        Ok(output)
    }
}
