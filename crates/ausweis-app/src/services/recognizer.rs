// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR capability selection. Only builds with the `ocr` feature have one.

use std::path::Path;

#[cfg(not(feature = "ocr"))]
use ausweis_core::error::AusweisError;
use ausweis_core::error::Result;
use ausweis_document::TextRecognizer;

/// Load the OCR engine from `model_dir`, or the ocrs cache directory.
#[cfg(feature = "ocr")]
pub fn load_recognizer(model_dir: Option<&Path>) -> Result<Box<dyn TextRecognizer>> {
    use ausweis_document::scan::ocr::{OcrConfig, OcrEngine};

    let config = match model_dir {
        Some(dir) => OcrConfig::from_dir(dir),
        None => OcrConfig::default(),
    };
    Ok(Box::new(OcrEngine::new(config)?))
}

#[cfg(not(feature = "ocr"))]
pub fn load_recognizer(_model_dir: Option<&Path>) -> Result<Box<dyn TextRecognizer>> {
    tracing::warn!("OCR requested but this build has no OCR engine");
    Err(AusweisError::OcrError(
        "this build has no OCR engine; rebuild with `--features ocr` or use `ausweis check`".into(),
    ))
}

#[cfg(all(test, not(feature = "ocr")))]
mod tests {
    use super::*;

    #[test]
    fn build_without_ocr_reports_it() {
        let err = load_recognizer(None).err().unwrap();
        assert!(matches!(err, AusweisError::OcrError(ref msg) if msg.contains("--features ocr")));
    }
}
