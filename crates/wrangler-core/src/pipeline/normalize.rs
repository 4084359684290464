//! Pixel-mode classification and normalization.
//!
//! Resampling, inversion and every encoder in this crate work on 8-bit
//! buffers. Deep or exotic layouts are narrowed here first:
//!
//! - 16-bit grayscale is rescaled linearly (`v / 256`, truncating).
//! - Other wide integer and floating-point layouts go through the `image`
//!   crate's standard conversion, to grayscale when they carry no color and
//!   to RGB(A) when they do.
//! - Anything that cannot be converted cleanly falls back to RGB-8.
//!
//! Palette-indexed sources never show up here: the decoders expand palettes
//! to RGB or RGBA on load, so transparent palettes take the alpha path.

use image::{DynamicImage, GrayImage, ImageBuffer, Luma};

/// In-memory channel/bit-depth layout of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelMode {
    Gray8,
    GrayAlpha8,
    Rgb8,
    Rgba8,
    /// Single-channel 16-bit integer
    Gray16,
    /// Any other wide integer layout (16-bit gray+alpha, RGB, RGBA)
    Integer,
    /// 32-bit floating-point layouts
    Float,
    /// A layout this crate does not know about
    Other,
}

impl PixelMode {
    /// Classify a decoded image.
    pub fn of(image: &DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma8(_) => Self::Gray8,
            DynamicImage::ImageLumaA8(_) => Self::GrayAlpha8,
            DynamicImage::ImageRgb8(_) => Self::Rgb8,
            DynamicImage::ImageRgba8(_) => Self::Rgba8,
            DynamicImage::ImageLuma16(_) => Self::Gray16,
            DynamicImage::ImageLumaA16(_)
            | DynamicImage::ImageRgb16(_)
            | DynamicImage::ImageRgba16(_) => Self::Integer,
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => Self::Float,
            _ => Self::Other,
        }
    }

    /// Whether the layout is already safe for resampling and inversion.
    pub fn is_normalized(self) -> bool {
        matches!(
            self,
            Self::Gray8 | Self::GrayAlpha8 | Self::Rgb8 | Self::Rgba8
        )
    }
}

/// Convert an arbitrary decoded image into an 8-bit layout.
///
/// Never fails; lossy fallbacks are logged.
pub fn normalize(image: DynamicImage) -> DynamicImage {
    let mode = PixelMode::of(&image);
    if mode.is_normalized() {
        return image;
    }

    tracing::debug!("Normalizing {:?} pixels", mode);
    match mode {
        PixelMode::Gray16 => match &image {
            DynamicImage::ImageLuma16(buffer) => match rescale_gray16(buffer) {
                Some(gray) => DynamicImage::ImageLuma8(gray),
                None => fallback_rgb(&image, mode),
            },
            _ => fallback_rgb(&image, mode),
        },
        PixelMode::Integer | PixelMode::Float => narrow(&image),
        _ => fallback_rgb(&image, mode),
    }
}

/// Linear 16-bit to 8-bit rescale. `None` if the buffer shape is inconsistent.
fn rescale_gray16(buffer: &ImageBuffer<Luma<u16>, Vec<u16>>) -> Option<GrayImage> {
    let (width, height) = buffer.dimensions();
    let samples = buffer.as_raw().iter().map(|&v| (v / 256) as u8).collect();
    GrayImage::from_raw(width, height, samples)
}

fn narrow(image: &DynamicImage) -> DynamicImage {
    let color = image.color();
    match (color.has_color(), color.has_alpha()) {
        (false, false) => DynamicImage::ImageLuma8(image.to_luma8()),
        (false, true) => DynamicImage::ImageLumaA8(image.to_luma_alpha8()),
        (true, false) => DynamicImage::ImageRgb8(image.to_rgb8()),
        (true, true) => DynamicImage::ImageRgba8(image.to_rgba8()),
    }
}

fn fallback_rgb(image: &DynamicImage, mode: PixelMode) -> DynamicImage {
    tracing::warn!(
        "Could not normalize {:?} pixels cleanly, converting to RGB",
        mode
    );
    DynamicImage::ImageRgb8(image.to_rgb8())
}
