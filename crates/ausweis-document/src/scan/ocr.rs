// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR capability backed by the `ocrs` crate, a pure-Rust OCR engine running
// neural network models via `rten`.
//
// # Feature Gate
//
// This module is only available when the `ocr` feature is enabled:
//
// ```toml
// ausweis-document = { path = "crates/ausweis-document", features = ["ocr"] }
// ```
//
// # Model Setup
//
// The engine needs two model files:
//
// - **Detection model** (`text-detection.rten`) — locates text regions.
// - **Recognition model** (`text-recognition.rten`) — decodes characters.
//
// Running `ocrs-cli` once downloads both to `$XDG_CACHE_HOME/ocrs`
// (typically `~/.cache/ocrs`), which is where [`OcrConfig::default`] looks.

use std::path::{Path, PathBuf};

use ausweis_core::error::AusweisError;
use ausweis_core::types::DOCUMENT_NUMBER_CHARSET;
use image::{DynamicImage, GrayImage};
use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams};
use rten::Model;
use tracing::{debug, info, instrument};

use super::extract::{TextRecognizer, restrict_to_charset};

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// `$XDG_CACHE_HOME/ocrs`, falling back to `~/.cache/ocrs`.
pub fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Configuration for constructing an [`OcrEngine`].
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub detection_model_path: PathBuf,
    pub recognition_model_path: PathBuf,
    /// Characters the recognition model may emit. Defaults to the
    /// document-number alphabet.
    pub allowed_chars: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrConfig {
    /// Expects `dir` to contain `text-detection.rten` and `text-recognition.rten`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
            allowed_chars: DOCUMENT_NUMBER_CHARSET.to_owned(),
        }
    }

    /// Verify that both model files exist.
    pub fn validate(&self) -> Result<(), AusweisError> {
        for path in [&self.detection_model_path, &self.recognition_model_path] {
            if !path.exists() {
                return Err(AusweisError::OcrError(format!(
                    "model not found at {}; run `ocrs-cli` once to download models",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Text recognizer wrapping a loaded `ocrs` engine.
///
/// Model loading is the expensive step; build one engine per process and
/// share it.
pub struct OcrEngine {
    engine: OcrsEngine,
    allowed_chars: String,
}

impl OcrEngine {
    /// Load both models and build the engine with its alphabet restricted to
    /// `config.allowed_chars`.
    ///
    /// The `ocrs` and `rten` crates must be compiled in release mode; debug
    /// builds are 10-100x slower.
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: OcrConfig) -> Result<Self, AusweisError> {
        config.validate()?;

        let load = |path: &Path| {
            Model::load_file(path).map_err(|err| {
                AusweisError::OcrError(format!("failed to load model {}: {}", path.display(), err))
            })
        };

        info!("Loading OCR models");
        let detection_model = load(&config.detection_model_path)?;
        let recognition_model = load(&config.recognition_model_path)?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            allowed_chars: Some(config.allowed_chars.clone()),
            ..Default::default()
        })
        .map_err(|err| AusweisError::OcrError(format!("failed to initialise OCR engine: {}", err)))?;

        info!("OCR engine initialised");
        Ok(Self {
            engine,
            allowed_chars: config.allowed_chars,
        })
    }

    /// Load models from a directory holding both `.rten` files.
    pub fn from_model_dir(dir: impl AsRef<Path>) -> Result<Self, AusweisError> {
        Self::new(OcrConfig::from_dir(dir))
    }

    /// Read all text in the image, one line per detected text line.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn recognize_text(&self, image: &GrayImage) -> Result<String, AusweisError> {
        // ocrs expects RGB8.
        let rgb = DynamicImage::ImageLuma8(image.clone()).to_rgb8();
        let (width, height) = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            AusweisError::OcrError(format!(
                "failed to create image source ({}x{}): {}",
                width, height, err
            ))
        })?;

        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| AusweisError::OcrError(format!("OCR preprocessing failed: {}", err)))?;

        let text = self
            .engine
            .get_text(&input)
            .map_err(|err| AusweisError::OcrError(format!("OCR text recognition failed: {}", err)))?;

        debug!(line_count = text.lines().count(), char_count = text.len(), "OCR recognition complete");
        Ok(text)
    }
}

impl TextRecognizer for OcrEngine {
    fn recognize(&self, image: &GrayImage, allowed_chars: &str) -> Result<String, AusweisError> {
        let text = self.recognize_text(image)?;
        if allowed_chars == self.allowed_chars {
            Ok(text)
        } else {
            // The model alphabet is fixed at load time; narrow further here.
            Ok(restrict_to_charset(&text, allowed_chars))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_to_cache_dir() {
        let config = OcrConfig::default();
        let path_str = config.detection_model_path.to_string_lossy();
        assert!(path_str.ends_with(DETECTION_MODEL_FILENAME), "got {path_str}");
        assert_eq!(config.allowed_chars, DOCUMENT_NUMBER_CHARSET);
    }

    #[test]
    fn config_from_dir() {
        let config = OcrConfig::from_dir("/tmp/my-models");
        assert_eq!(
            config.recognition_model_path,
            PathBuf::from("/tmp/my-models/text-recognition.rten")
        );
    }

    #[test]
    fn validate_missing_models() {
        let err = OcrConfig::from_dir("/nonexistent/path/ocr-models")
            .validate()
            .unwrap_err();
        assert!(matches!(err, AusweisError::OcrError(ref msg) if msg.contains("model not found")));
    }

    #[test]
    fn engine_refuses_missing_models() {
        assert!(OcrEngine::from_model_dir("/nonexistent/path/ocr-models").is_err());
    }
}
