//! Rename, either as a byte-faithful copy or as a re-encode.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::pipeline::encode::ensure_parent_dir;
use crate::pipeline::paths::is_same_file;
use crate::pipeline::{finalize_for, normalize, RenameRule, TargetExtension};
use crate::types::{Operation, OutputFormat};

use super::{Transform, TransformContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameConfig {
    pub rule: RenameRule,
    /// Copy bytes unchanged and keep the source extension
    pub preserve_format: bool,
    /// Re-encode target when `preserve_format` is off
    pub output_format: OutputFormat,
}

impl RenameConfig {
    /// Copy under the new name, keeping the original container.
    pub fn preserving(rule: RenameRule) -> Self {
        Self {
            rule,
            preserve_format: true,
            output_format: OutputFormat::Jpeg,
        }
    }

    /// Re-encode into `output_format` under the new name.
    pub fn converting(rule: RenameRule, output_format: OutputFormat) -> Self {
        Self {
            rule,
            preserve_format: false,
            output_format,
        }
    }
}

pub struct RenameTransform {
    config: RenameConfig,
}

impl RenameTransform {
    pub fn new(config: RenameConfig) -> Self {
        Self { config }
    }

    fn copy(&self, source: &Path, ctx: &TransformContext) -> Result<PathBuf, PipelineError> {
        if !source.is_file() {
            return Err(PipelineError::FileNotFound(source.to_path_buf()));
        }

        let destination = ctx.destination(source, &self.config.rule, TargetExtension::KeepSource)?;
        if is_same_file(source, &destination) {
            return Err(PipelineError::SameFile(destination));
        }

        ensure_parent_dir(&destination)?;
        let bytes =
            std::fs::copy(source, &destination).map_err(|e| PipelineError::io(&destination, e))?;
        tracing::debug!("Copied {:?} to {:?} ({} bytes)", source, destination, bytes);
        Ok(destination)
    }
}

impl Transform for RenameTransform {
    fn operation(&self) -> Operation {
        Operation::Rename
    }

    fn apply(&self, source: &Path, ctx: &TransformContext) -> Result<PathBuf, PipelineError> {
        if self.config.preserve_format {
            return self.copy(source, ctx);
        }

        let decoded = ctx.decode(source)?;
        let image = finalize_for(normalize(decoded.image), self.config.output_format);
        ctx.write(source, &image, self.config.output_format, &self.config.rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::pipeline::OutputDirectoryPolicy;
    use crate::types::CollisionPolicy;
    use image::{DynamicImage, Rgba, RgbaImage};

    fn context(policy: OutputDirectoryPolicy, collision: CollisionPolicy) -> TransformContext {
        TransformContext::new(&Config::default(), policy, collision)
    }

    #[test]
    fn test_copy_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("IMG_0001.jpg");
        DynamicImage::new_rgb8(8, 8).save(&source).unwrap();

        let ctx = context(OutputDirectoryPolicy::OriginalDirectory, CollisionPolicy::Suffix);
        let transform =
            RenameTransform::new(RenameConfig::preserving(RenameRule::new("IMG", "PIC", "2024_")));

        let written = transform.apply(&source, &ctx).unwrap();
        assert_eq!(written, dir.path().join("2024_PIC_0001.jpg"));
        assert_eq!(
            std::fs::read(&source).unwrap(),
            std::fs::read(&written).unwrap()
        );
    }

    #[test]
    fn test_copy_onto_itself_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("photo.png");
        std::fs::write(&source, b"not really a png").unwrap();

        // Rule that leaves this stem unchanged
        let ctx = context(OutputDirectoryPolicy::OriginalDirectory, CollisionPolicy::Overwrite);
        let transform =
            RenameTransform::new(RenameConfig::preserving(RenameRule::new("IMG", "PIC", "")));

        assert!(matches!(
            transform.apply(&source, &ctx),
            Err(PipelineError::SameFile(_))
        ));
        assert_eq!(std::fs::read(&source).unwrap(), b"not really a png");
    }

    #[test]
    fn test_copy_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(OutputDirectoryPolicy::OriginalDirectory, CollisionPolicy::Suffix);
        let transform =
            RenameTransform::new(RenameConfig::preserving(RenameRule::new("", "", "x_")));

        assert!(matches!(
            transform.apply(&dir.path().join("gone.jpg"), &ctx),
            Err(PipelineError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_convert_flattens_for_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("clear.png");
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0])))
            .save(&source)
            .unwrap();

        let out_dir = dir.path().join("out");
        let ctx = context(
            OutputDirectoryPolicy::ExplicitDirectory(out_dir.clone()),
            CollisionPolicy::Suffix,
        );
        let transform = RenameTransform::new(RenameConfig::converting(
            RenameRule::new("", "", "new_"),
            OutputFormat::Jpeg,
        ));

        let written = transform.apply(&source, &ctx).unwrap();
        assert_eq!(written, out_dir.join("new_clear.jpg"));

        let decoded = image::open(&written).unwrap().to_rgb8();
        assert!(decoded.pixels().all(|p| p.0.iter().all(|&c| c > 245)));
    }
}
