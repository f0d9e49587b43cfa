// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ausweis-document — Image side of the Ausweis verifier.
//
// Turns a photographed identity card into a high-contrast binary image
// (upscale, luminance, smoothing, Otsu binarization) and pulls a document
// number out of whatever text an OCR capability reads from it.

pub mod image;
pub mod scan;

// Re-export the primary structs so callers can use `ausweis_document::ImageNormalizer` etc.
pub use self::image::normalizer::ImageNormalizer;
pub use scan::extract::{PatternExtractor, TextRecognizer, extract_from_text};

#[cfg(feature = "ocr")]
pub use scan::ocr::OcrEngine;
