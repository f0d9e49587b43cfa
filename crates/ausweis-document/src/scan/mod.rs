// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline — text recognition and document-number extraction.

pub mod extract;

#[cfg(feature = "ocr")]
pub mod ocr;

pub use extract::{PatternExtractor, TextRecognizer};

#[cfg(feature = "ocr")]
pub use ocr::OcrEngine;
