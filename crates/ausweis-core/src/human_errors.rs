// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for operators at the verification desk.
//
// Every technical error is mapped to plain English with a clear suggestion.

use crate::error::AusweisError;

/// Severity of an error from the operator's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Store blip; resubmitting may succeed.
    Transient,
    /// The operator must do something (clearer photo, correct number).
    ActionRequired,
    /// Cannot be fixed by retrying (missing models, broken install).
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the operator should try.
    pub suggestion: String,
    /// Whether resubmitting the same input may succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert an `AusweisError` into a `HumanError`.
pub fn humanize_error(err: &AusweisError) -> HumanError {
    match err {
        AusweisError::MalformedInput(_) => HumanError {
            message: "The image could not be opened.".into(),
            suggestion: "Upload a JPG or PNG photo of the card.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        AusweisError::InvalidDocumentNumber(input) => HumanError {
            message: "That doesn't look like a CNIC number.".into(),
            suggestion: format!("Enter it as xxxxx-xxxxxxx-x. (You entered: {input})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        AusweisError::OcrError(detail) => {
            if detail.contains("no OCR engine") {
                HumanError {
                    message: "This build cannot read card photos.".into(),
                    suggestion: "Use `ausweis check` to enter the number, or install a build with OCR enabled.".into(),
                    retriable: false,
                    severity: Severity::Permanent,
                }
            } else if detail.contains("model not found") {
                HumanError {
                    message: "Text recognition is not set up on this machine.".into(),
                    suggestion: "Download the OCR models or point --models at them, or enter the number manually.".into(),
                    retriable: false,
                    severity: Severity::Permanent,
                }
            } else {
                HumanError {
                    message: "The card text could not be read.".into(),
                    suggestion: "Try a clearer, well-lit photo, or enter the number manually.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            }
        }

        AusweisError::ImageError(detail) => HumanError {
            message: "The processed image could not be saved.".into(),
            suggestion: format!("Check the output path and free disk space. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        AusweisError::StoreUnavailable(_) => HumanError {
            message: "The licence records could not be reached.".into(),
            suggestion: "Wait a moment and submit the card again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        AusweisError::Config(detail) => HumanError {
            message: "The settings file has a problem.".into(),
            suggestion: format!("Fix or remove the config file. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        AusweisError::Io(e) => HumanError {
            message: "A file could not be read or written.".into(),
            suggestion: format!("Check that the file exists and is readable. ({e})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        AusweisError::Serialization(_) => HumanError {
            message: "A data file is damaged.".into(),
            suggestion: "Check that the records file is valid JSON.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        AusweisError::PlatformUnavailable => HumanError {
            message: "This feature isn't available on this device.".into(),
            suggestion: "Upload an image file instead.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}
