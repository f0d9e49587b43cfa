// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document-number extraction — run a text recognizer over a normalized image,
// restricted to digits and hyphens, then search the raw text for the
// `DDDDD-DDDDDDD-D` structure.

use std::sync::Arc;

use ausweis_core::error::AusweisError;
use ausweis_core::types::{DOCUMENT_NUMBER_CHARSET, DocumentNumber};
use image::GrayImage;
use tracing::{debug, info, instrument};

/// An OCR capability.
///
/// Implementations read text from a binary image, proposing only characters
/// from `allowed_chars` (whitespace and line breaks are always permitted).
/// Recognition itself is treated as a pure function of its inputs.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &GrayImage, allowed_chars: &str) -> Result<String, AusweisError>;
}

impl<R: TextRecognizer + ?Sized> TextRecognizer for Box<R> {
    fn recognize(&self, image: &GrayImage, allowed_chars: &str) -> Result<String, AusweisError> {
        (**self).recognize(image, allowed_chars)
    }
}

impl<R: TextRecognizer + ?Sized> TextRecognizer for Arc<R> {
    fn recognize(&self, image: &GrayImage, allowed_chars: &str) -> Result<String, AusweisError> {
        (**self).recognize(image, allowed_chars)
    }
}

/// Pulls a document number out of a normalized image.
pub struct PatternExtractor<R> {
    recognizer: R,
}

impl<R: TextRecognizer> PatternExtractor<R> {
    pub fn new(recognizer: R) -> Self {
        Self { recognizer }
    }

    /// Recognize the image and return the first document number found in
    /// reading order.
    ///
    /// `Ok(None)` means the text was read but held no document number;
    /// `Err` is reserved for the recognizer itself failing.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn extract(&self, image: &GrayImage) -> Result<Option<DocumentNumber>, AusweisError> {
        let raw = self.recognizer.recognize(image, DOCUMENT_NUMBER_CHARSET)?;
        debug!(char_count = raw.len(), line_count = raw.lines().count(), "Text recognized");
        Ok(extract_from_text(&raw))
    }
}

/// Search raw OCR output for a document number. Never fails.
pub fn extract_from_text(raw: &str) -> Option<DocumentNumber> {
    let candidate = DocumentNumber::find_in(raw);
    match &candidate {
        Some(number) => info!(%number, "Document number detected"),
        None => info!("No document number in recognized text"),
    }
    candidate
}

/// Blank out characters the recognizer should not have proposed.
///
/// Disallowed characters become spaces rather than disappearing, so stray
/// glyphs cannot glue two digit groups into a false match.
pub fn restrict_to_charset(text: &str, allowed_chars: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_whitespace() || allowed_chars.contains(c) {
                c
            } else {
                ' '
            }
        })
        .collect()
}
