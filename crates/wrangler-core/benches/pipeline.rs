//! Benchmarks for the Wrangler transformation pipeline.
//!
//! Run with: cargo bench -p wrangler-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, ImageBuffer, Luma, Rgba, RgbaImage};
use std::path::Path;
use wrangler_core::config::EncodingConfig;
use wrangler_core::pipeline::{normalize, ImageEncoder};
use wrangler_core::transform::{invert, resize};
use wrangler_core::OutputFormat;

fn photo_like(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8, 200])
    }))
}

fn benchmark_normalize_gray16(c: &mut Criterion) {
    let img: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_fn(1024, 1024, |x, y| Luma([((x * y) % 65536) as u16]));
    let img = DynamicImage::ImageLuma16(img);

    c.bench_function("normalize_gray16_1024", |b| {
        b.iter(|| {
            let _ = normalize(black_box(img.clone()));
        })
    });
}

fn benchmark_resize(c: &mut Criterion) {
    let img = photo_like(1920, 1080);

    c.bench_function("resize_lanczos3_800x600_jpeg", |b| {
        b.iter(|| {
            let _ = resize::render(black_box(img.clone()), 800, 600, OutputFormat::Jpeg);
        })
    });
}

fn benchmark_invert(c: &mut Criterion) {
    let img = photo_like(1920, 1080);

    c.bench_function("invert_rgba_1920x1080", |b| {
        b.iter(|| {
            let _ = invert::render(black_box(img.clone()));
        })
    });
}

fn benchmark_encode(c: &mut Criterion) {
    let img = DynamicImage::ImageRgb8(photo_like(800, 600).to_rgb8());
    let encoder = ImageEncoder::new(EncodingConfig::default());
    let path = Path::new("bench.jpg");

    c.bench_function("encode_jpeg_800x600", |b| {
        b.iter(|| {
            let _ = encoder.encode(black_box(&img), OutputFormat::Jpeg, path);
        })
    });
}

criterion_group!(
    benches,
    benchmark_normalize_gray16,
    benchmark_resize,
    benchmark_invert,
    benchmark_encode,
);
criterion_main!(benches);
