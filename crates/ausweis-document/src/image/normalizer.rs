// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR normalization — turn a colour photo of an identity card into a
// high-contrast binary image. Operates on in-memory images using the `image`
// and `imageproc` crates.

use std::path::Path;

use ausweis_core::config::MAX_SCALE_FACTOR;
use ausweis_core::error::AusweisError;
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageFormat};
use imageproc::contrast::{ThresholdType, otsu_level, threshold};
use imageproc::filter::gaussian_blur_f32;
use tracing::{debug, info, instrument, warn};

/// Upscale factor applied before binarization.
pub const DEFAULT_SCALE_FACTOR: f32 = 1.5;

/// Sigma of a 3x3 Gaussian kernel when the sigma is derived from the
/// kernel size (`0.3 * ((3 - 1) * 0.5 - 1) + 0.8`).
const SMOOTHING_SIGMA: f32 = 0.8;

/// Upper bound on the upscaled image, in pixels (32 MP, 32 MiB as luma).
pub const MAX_OUTPUT_PIXELS: u64 = 32 * 1024 * 1024;

/// Fixed preprocessing recipe for OCR input:
///
/// 1. Upscale by `scale_factor` (bilinear) so small glyphs gain pixels
/// 2. Convert to single-channel luminance
/// 3. 3x3 Gaussian smoothing to suppress sensor noise
/// 4. Global Otsu binarization (text black, background white)
///
/// Normalization never fails: degenerate input still produces an image, and
/// the extractor downstream decides whether anything was readable.
#[derive(Debug, Clone, Copy)]
pub struct ImageNormalizer {
    scale_factor: f32,
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
        }
    }
}

impl ImageNormalizer {
    /// Create a normalizer with a custom upscale factor.
    ///
    /// Non-finite or non-positive factors fall back to [`DEFAULT_SCALE_FACTOR`];
    /// factors above [`MAX_SCALE_FACTOR`] are clamped to it.
    pub fn new(scale_factor: f32) -> Self {
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            warn!(scale_factor, "Invalid scale factor; using default");
            return Self::default();
        }
        if scale_factor > MAX_SCALE_FACTOR {
            warn!(scale_factor, max = MAX_SCALE_FACTOR, "Scale factor too large; clamping");
            return Self {
                scale_factor: MAX_SCALE_FACTOR,
            };
        }
        Self { scale_factor }
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    /// Run the full normalization pipeline on a decoded image.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn normalize(&self, image: &DynamicImage) -> GrayImage {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            warn!("Empty image; nothing to normalize");
            return GrayImage::new(width, height);
        }

        let (target_w, target_h) = self.scaled_dimensions(width, height);
        info!(target_w, target_h, "Normalizing image for OCR");

        // Step 1: Upscale.
        let upscaled = image.resize_exact(target_w, target_h, FilterType::Triangle);

        // Step 2: Luminance.
        let gray = upscaled.to_luma8();

        // Step 3: Smoothing.
        let smoothed = gaussian_blur_f32(&gray, SMOOTHING_SIGMA);

        // Step 4: Otsu binarization.
        binarize(&smoothed)
    }

    /// Decode encoded bytes (JPEG, PNG, ...) and normalize them.
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    pub fn normalize_bytes(&self, data: &[u8]) -> Result<GrayImage, AusweisError> {
        let image = image::load_from_memory(data).map_err(|err| {
            AusweisError::MalformedInput(format!("failed to decode image: {}", err))
        })?;
        Ok(self.normalize(&image))
    }

    /// Open an image file and normalize it.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn normalize_file(&self, path: impl AsRef<Path>) -> Result<GrayImage, AusweisError> {
        let image = image::open(path.as_ref()).map_err(|err| {
            AusweisError::MalformedInput(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        Ok(self.normalize(&image))
    }

    /// Target size for the upscale step, shrunk uniformly when it would
    /// exceed [`MAX_OUTPUT_PIXELS`].
    fn scaled_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let mut scale = f64::from(self.scale_factor);
        let area = f64::from(width) * f64::from(height) * scale * scale;
        let capped = area > MAX_OUTPUT_PIXELS as f64;
        if capped {
            scale *= (MAX_OUTPUT_PIXELS as f64 / area).sqrt();
            warn!(width, height, scale, "Upscaled image too large; reducing scale");
        }

        let side = |len: u32| {
            let scaled = f64::from(len) * scale;
            let scaled = if capped { scaled.floor() } else { scaled.round() };
            (scaled as u32).max(1)
        };
        (side(width), side(height))
    }
}

/// Encode a normalized image as PNG bytes.
pub fn encode_png(image: &GrayImage) -> Result<Vec<u8>, AusweisError> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image.write_to(&mut cursor, ImageFormat::Png).map_err(|err| {
        AusweisError::ImageError(format!("PNG encoding failed: {}", err))
    })?;
    Ok(buffer)
}

/// Write a normalized image to disk. The format is inferred from the extension.
pub fn save(image: &GrayImage, path: impl AsRef<Path>) -> Result<(), AusweisError> {
    image.save(path.as_ref()).map_err(|err| {
        AusweisError::ImageError(format!(
            "failed to save image to {}: {}",
            path.as_ref().display(),
            err
        ))
    })
}

/// Global Otsu binarization: pixels strictly above the Otsu level become
/// white, the rest black.
fn binarize(gray: &GrayImage) -> GrayImage {
    let level = otsu_level(gray);
    debug!(level, "Otsu level computed");
    threshold(gray, level, ThresholdType::Binary)
}
