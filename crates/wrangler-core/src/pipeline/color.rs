//! Alpha compositing and color-model finalization for output containers.

use image::{DynamicImage, RgbImage};

use crate::types::OutputFormat;

/// Composite an image onto an opaque white background, using its own alpha
/// channel as the blend mask. Images without alpha are simply converted.
pub fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut out = RgbImage::new(width, height);
    for (src, dst) in rgba.pixels().zip(out.pixels_mut()) {
        let alpha = u32::from(src[3]);
        for channel in 0..3 {
            dst[channel] = blend_over_white(src[channel], alpha);
        }
    }
    out
}

/// `value * a + 255 * (1 - a)` in 8-bit fixed point, rounded.
fn blend_over_white(value: u8, alpha: u32) -> u8 {
    let mixed = u32::from(value) * alpha + 255 * (255 - alpha);
    ((mixed + 127) / 255) as u8
}

/// Prepare a normalized image for a target container.
///
/// JPEG cannot hold alpha: alpha-carrying images are flattened onto white
/// and grayscale is promoted to three channels. PNG and WebP take the image
/// as is.
pub fn finalize_for(image: DynamicImage, format: OutputFormat) -> DynamicImage {
    if format.supports_alpha() {
        return image;
    }

    match image {
        DynamicImage::ImageRgb8(_) => image,
        other if other.color().has_alpha() => DynamicImage::ImageRgb8(flatten_on_white(&other)),
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}
