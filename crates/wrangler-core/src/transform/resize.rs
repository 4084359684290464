//! Resample to exact target dimensions.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba32FImage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::pipeline::{finalize_for, normalize, RenameRule};
use crate::types::{Operation, OutputFormat};

use super::{Transform, TransformContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeConfig {
    pub width: u32,
    pub height: u32,
    pub output_format: OutputFormat,
    #[serde(default)]
    pub rule: RenameRule,
}

impl ResizeConfig {
    pub fn new(width: u32, height: u32, output_format: OutputFormat) -> Self {
        Self {
            width,
            height,
            output_format,
            rule: RenameRule::default(),
        }
    }

    pub fn with_rule(mut self, rule: RenameRule) -> Self {
        self.rule = rule;
        self
    }
}

pub struct ResizeTransform {
    config: ResizeConfig,
}

impl ResizeTransform {
    pub fn new(config: ResizeConfig) -> Self {
        Self { config }
    }
}

impl Transform for ResizeTransform {
    fn operation(&self) -> Operation {
        Operation::Resize
    }

    fn apply(&self, source: &Path, ctx: &TransformContext) -> Result<PathBuf, PipelineError> {
        let decoded = ctx.decode(source)?;
        let resized = render(
            decoded.image,
            self.config.width,
            self.config.height,
            self.config.output_format,
        );
        ctx.write(source, &resized, self.config.output_format, &self.config.rule)
    }
}

/// Resample to exactly `width x height` with Lanczos3 and prepare the result
/// for `format`. Aspect ratio is not preserved.
pub fn render(image: DynamicImage, width: u32, height: u32, format: OutputFormat) -> DynamicImage {
    let image = normalize(image);
    let resized = resample(&image, width, height);
    finalize_for(resized, format)
}

/// Lanczos3 resampling. Alpha-carrying images are filtered with
/// premultiplied color so fully transparent pixels contribute nothing to
/// their neighbours.
fn resample(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let color = image.color();
    if !color.has_alpha() {
        return image.resize_exact(width, height, FilterType::Lanczos3);
    }

    let mut premultiplied: Rgba32FImage = image.to_rgba32f();
    for pixel in premultiplied.pixels_mut() {
        let alpha = pixel[3];
        for channel in 0..3 {
            pixel[channel] *= alpha;
        }
    }

    let mut resized = imageops::resize(&premultiplied, width, height, FilterType::Lanczos3);
    for pixel in resized.pixels_mut() {
        // Lanczos rings outside [0, 1]
        let alpha = pixel[3].clamp(0.0, 1.0);
        for channel in 0..3 {
            pixel[channel] = if alpha > 0.0 {
                (pixel[channel] / alpha).clamp(0.0, 1.0)
            } else {
                0.0
            };
        }
        pixel[3] = alpha;
    }

    let rgba = DynamicImage::ImageRgba32F(resized);
    if color.has_color() {
        DynamicImage::ImageRgba8(rgba.to_rgba8())
    } else {
        DynamicImage::ImageLumaA8(rgba.to_luma_alpha8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, ImageBuffer, Luma, Rgba, RgbaImage};

    #[test]
    fn test_render_exact_dimensions() {
        let img = DynamicImage::new_rgb8(120, 40);
        let out = render(img, 30, 90, OutputFormat::Png);
        assert_eq!(out.dimensions(), (30, 90));
    }

    #[test]
    fn test_render_jpeg_flattens_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 0])));
        let out = render(img, 8, 8, OutputFormat::Jpeg);

        let rgb = out.as_rgb8().unwrap();
        assert!(rgb.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    fn half_transparent(opaque: Rgba<u8>, clear: Rgba<u8>) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(16, 16, |x, _| {
            if x < 8 {
                opaque
            } else {
                clear
            }
        }))
    }

    #[test]
    fn test_render_jpeg_no_fringe_at_alpha_edge() {
        let img = half_transparent(Rgba([255, 255, 255, 255]), Rgba([0, 0, 0, 0]));
        let out = render(img, 5, 5, OutputFormat::Jpeg);

        let rgb = out.as_rgb8().unwrap();
        for y in 0..5 {
            let row: Vec<u8> = (0..5).map(|x| rgb.get_pixel(x, y)[0]).collect();
            assert!(row.iter().all(|&c| c == 255), "dark edge in row {y}: {row:?}");
        }
    }

    #[test]
    fn test_render_png_edge_keeps_opaque_color() {
        let img = half_transparent(Rgba([255, 0, 0, 255]), Rgba([0, 0, 255, 0]));
        let out = render(img, 5, 5, OutputFormat::Png);

        let rgba = out.as_rgba8().unwrap();
        for pixel in rgba.pixels().filter(|p| p[3] > 0) {
            assert_eq!((pixel[0], pixel[2]), (255, 0), "bled color: {pixel:?}");
        }
    }

    #[test]
    fn test_render_gray_alpha_stays_gray_alpha() {
        let la = image::GrayAlphaImage::from_pixel(8, 8, image::LumaA([200, 255]));
        let out = render(DynamicImage::ImageLumaA8(la), 4, 4, OutputFormat::Png);
        let gray = out.as_luma_alpha8().unwrap();
        assert_eq!(gray.get_pixel(1, 1).0, [200, 255]);
    }

    #[test]
    fn test_render_png_keeps_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 16, Rgba([10, 20, 30, 40])));
        let out = render(img, 4, 4, OutputFormat::Png);
        assert!(out.color().has_alpha());
    }

    #[test]
    fn test_render_gray16_narrows() {
        let img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_pixel(10, 10, Luma([0xFFFF]));
        let out = render(DynamicImage::ImageLuma16(img), 5, 5, OutputFormat::Png);
        let gray = out.as_luma8().unwrap();
        assert_eq!(gray.get_pixel(2, 2)[0], 255);
    }

    #[test]
    fn test_apply_writes_target_size() {
        use crate::config::Config;
        use crate::pipeline::OutputDirectoryPolicy;
        use crate::types::CollisionPolicy;

        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("wide.png");
        DynamicImage::new_rgb8(64, 32).save(&source).unwrap();

        let out_dir = dir.path().join("out");
        let ctx = TransformContext::new(
            &Config::default(),
            OutputDirectoryPolicy::ExplicitDirectory(out_dir.clone()),
            CollisionPolicy::Suffix,
        );
        let transform = ResizeTransform::new(ResizeConfig::new(20, 40, OutputFormat::WebP));

        let written = transform.apply(&source, &ctx).unwrap();
        assert_eq!(written, out_dir.join("wide.webp"));
        assert_eq!(image::open(&written).unwrap().dimensions(), (20, 40));
    }
}
