//! Color inversion. Output is always opaque RGB.

use image::{imageops, DynamicImage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::pipeline::{finalize_for, flatten_on_white, normalize, RenameRule};
use crate::types::{Operation, OutputFormat};

use super::{Transform, TransformContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvertConfig {
    pub output_format: OutputFormat,
    #[serde(default)]
    pub rule: RenameRule,
}

impl InvertConfig {
    pub fn new(output_format: OutputFormat) -> Self {
        Self {
            output_format,
            rule: RenameRule::default(),
        }
    }

    pub fn with_rule(mut self, rule: RenameRule) -> Self {
        self.rule = rule;
        self
    }
}

pub struct InvertTransform {
    config: InvertConfig,
}

impl InvertTransform {
    pub fn new(config: InvertConfig) -> Self {
        Self { config }
    }
}

impl Transform for InvertTransform {
    fn operation(&self) -> Operation {
        Operation::Invert
    }

    fn apply(&self, source: &Path, ctx: &TransformContext) -> Result<PathBuf, PipelineError> {
        let decoded = ctx.decode(source)?;
        let inverted = finalize_for(render(decoded.image), self.config.output_format);
        ctx.write(source, &inverted, self.config.output_format, &self.config.rule)
    }
}

/// Invert every color channel (`v -> 255 - v`).
///
/// Transparent areas are composited onto white first, so they come out
/// black.
pub fn render(image: DynamicImage) -> DynamicImage {
    let image = normalize(image);
    let mut rgb = flatten_on_white(&image);
    imageops::invert(&mut rgb);
    DynamicImage::ImageRgb8(rgb)
}
