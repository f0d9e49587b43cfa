// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the ausweis-document crate. Measures the OCR
// normalization pipeline on a synthetic card-sized photo.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};

use ausweis_document::ImageNormalizer;
use ausweis_document::extract_from_text;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Normalize a 640x400 colour image: a light card with rows of dark
/// "glyph" blocks, roughly the size of a phone photo cropped to the card.
fn bench_normalize(c: &mut Criterion) {
    let (width, height) = (640u32, 400u32);
    let mut img = RgbImage::from_pixel(width, height, Rgb([228, 222, 208]));
    for row in 0..4 {
        let y0 = 60 + row * 80;
        for glyph in 0..20 {
            let x0 = 40 + glyph * 28;
            for y in y0..y0 + 30 {
                for x in x0..x0 + 16 {
                    img.put_pixel(x, y, Rgb([25, 30, 40]));
                }
            }
        }
    }
    let dynamic = DynamicImage::ImageRgb8(img);
    let normalizer = ImageNormalizer::default();

    c.bench_function("normalize (640x400)", |b| {
        b.iter(|| black_box(normalizer.normalize(black_box(&dynamic))));
    });
}

/// Pattern search over a page of OCR noise with the number near the end.
fn bench_extract(c: &mut Criterion) {
    let mut text = "0-12 345 -- 6789 1-2-3\n".repeat(200);
    text.push_str("34501-4814449-1\n");

    c.bench_function("extract_from_text (200 noisy lines)", |b| {
        b.iter(|| black_box(extract_from_text(black_box(&text))));
    });
}

criterion_group!(benches, bench_normalize, bench_extract);
criterion_main!(benches);
