// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Ausweis.

use thiserror::Error;

/// Top-level error type for all Ausweis operations.
///
/// A missing document number in OCR output is not an error: it surfaces as
/// [`VerificationResult::ExtractionFailed`](crate::VerificationResult).
#[derive(Debug, Error)]
pub enum AusweisError {
    // -- Input errors --
    #[error("malformed input image: {0}")]
    MalformedInput(String),

    #[error("not a valid document number: {0:?}")]
    InvalidDocumentNumber(String),

    // -- Processing errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("OCR failed: {0}")]
    OcrError(String),

    // -- Authority store --
    #[error("authority store unavailable: {0}")]
    StoreUnavailable(String),

    // -- Configuration / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, AusweisError>;
