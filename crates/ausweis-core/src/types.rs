// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Ausweis verifier.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AusweisError;

/// Characters that can legally appear in a document number.
///
/// Handed to the OCR capability so the recognizer never proposes letters or
/// punctuation.
pub const DOCUMENT_NUMBER_CHARSET: &str = "0123456789-";

/// `DDDDD-DDDDDDD-D`, ASCII digits only.
static DOCUMENT_NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]{5}-[0-9]{7}-[0-9]").expect("document number pattern is valid")
});

/// A structurally validated identity-document number (`DDDDD-DDDDDDD-D`).
///
/// The only ways to obtain one are [`DocumentNumber::parse`] (whole-string
/// match) and [`DocumentNumber::find_in`] (first match inside noisy text), so
/// an unvalidated string can never travel downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocumentNumber(String);

impl DocumentNumber {
    /// Parse a string that must consist of exactly one document number.
    ///
    /// Surrounding whitespace is ignored; anything else is rejected.
    pub fn parse(input: &str) -> Result<Self, AusweisError> {
        let trimmed = input.trim();
        match DOCUMENT_NUMBER_PATTERN.find(trimmed) {
            Some(m) if m.start() == 0 && m.end() == trimmed.len() => {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(AusweisError::InvalidDocumentNumber(input.to_owned())),
        }
    }

    /// Return the first document number embedded anywhere in `text`, in
    /// reading order.
    pub fn find_in(text: &str) -> Option<Self> {
        DOCUMENT_NUMBER_PATTERN
            .find(text)
            .map(|m| Self(m.as_str().to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for DocumentNumber {
    type Err = AusweisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for DocumentNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Licence status as recorded by the issuing authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LicenseStatus {
    Valid,
    Expired,
}

impl LicenseStatus {
    /// Stable keyword used in storage and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "Valid",
            Self::Expired => "Expired",
        }
    }

    /// Parse the storage keyword. Matching is exact.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "Valid" => Some(Self::Valid),
            "Expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

impl std::fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A holder record owned by the authority store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityRecord {
    pub holder_name: String,
    pub status: LicenseStatus,
    pub expiry_date: NaiveDate,
}

impl AuthorityRecord {
    pub fn new(holder_name: impl Into<String>, status: LicenseStatus, expiry_date: NaiveDate) -> Self {
        Self {
            holder_name: holder_name.into(),
            status,
            expiry_date,
        }
    }
}

/// Outcome of a single verification call.
///
/// Records are shared with the store (`Arc`), never deep-copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VerificationResult {
    /// Record found with status `Valid`.
    Verified { record: Arc<AuthorityRecord> },
    /// Record found with status `Expired`; provisionally compliant until the deadline.
    ExpiredWithGrace {
        record: Arc<AuthorityRecord>,
        grace_deadline: DateTime<Utc>,
    },
    /// No record for this number; provisionally compliant until the deadline.
    UnknownWithGrace { grace_deadline: DateTime<Utc> },
    /// No document number could be extracted.
    ExtractionFailed,
}

impl VerificationResult {
    /// The authority record, when one was found.
    pub fn record(&self) -> Option<&AuthorityRecord> {
        match self {
            Self::Verified { record } | Self::ExpiredWithGrace { record, .. } => Some(record.as_ref()),
            Self::UnknownWithGrace { .. } | Self::ExtractionFailed => None,
        }
    }

    /// The grace deadline, for outcomes that grant one.
    pub fn grace_deadline(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::ExpiredWithGrace { grace_deadline, .. }
            | Self::UnknownWithGrace { grace_deadline } => Some(*grace_deadline),
            Self::Verified { .. } | Self::ExtractionFailed => None,
        }
    }

    /// Short machine-friendly label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Verified { .. } => "verified",
            Self::ExpiredWithGrace { .. } => "expired_with_grace",
            Self::UnknownWithGrace { .. } => "unknown_with_grace",
            Self::ExtractionFailed => "extraction_failed",
        }
    }
}

/// One verification attempt, as kept in the scan history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEntry {
    /// `None` when nothing could be extracted from the input.
    pub document_number: Option<DocumentNumber>,
    pub timestamp: DateTime<Utc>,
}

impl ScanEntry {
    pub fn new(document_number: Option<DocumentNumber>, timestamp: DateTime<Utc>) -> Self {
        Self {
            document_number,
            timestamp,
        }
    }
}
