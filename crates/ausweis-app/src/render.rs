// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Terminal and JSON rendering of verification attempts and history.

use std::io::{self, Write};

use ausweis_core::human_errors::HumanError;
use ausweis_core::types::{AuthorityRecord, LicenseStatus, VerificationResult};
use ausweis_registry::RecentScans;
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::services::session::Attempt;

const DATE: &str = "%Y-%m-%d";
const HISTORY_TIMESTAMP: &str = "%Y-%m-%d %H:%M";

/// Write one attempt in human-readable form.
pub fn attempt(out: &mut impl Write, attempt: &Attempt) -> io::Result<()> {
    match &attempt.document_number {
        Some(number) => writeln!(out, "== {number} ({})", attempt.source)?,
        None => writeln!(out, "== {}", attempt.source)?,
    }

    match &attempt.result {
        VerificationResult::Verified { record } => record_lines(out, record),
        VerificationResult::ExpiredWithGrace {
            record,
            grace_deadline,
        } => {
            record_lines(out, record)?;
            writeln!(
                out,
                "   licence expired; grace period active until {}",
                grace_deadline.format(DATE)
            )
        }
        VerificationResult::UnknownWithGrace { grace_deadline } => writeln!(
            out,
            "   no licence found; grace period active until {}",
            grace_deadline.format(DATE)
        ),
        VerificationResult::ExtractionFailed => match &attempt.rejected_input {
            Some(input) => writeln!(
                out,
                "   {input:?} is not a valid document number (expected xxxxx-xxxxxxx-x)"
            ),
            None => writeln!(
                out,
                "   document number could not be detected; try a clearer image"
            ),
        },
    }
}

fn record_lines(out: &mut impl Write, record: &AuthorityRecord) -> io::Result<()> {
    let badge = match record.status {
        LicenseStatus::Valid => "VALID",
        LicenseStatus::Expired => "EXPIRED",
    };
    writeln!(out, "   name:   {}", record.holder_name)?;
    writeln!(out, "   status: {badge}")?;
    writeln!(out, "   expiry: {}", record.expiry_date.format(DATE))
}

/// Write one attempt as a single JSON line.
pub fn attempt_json(out: &mut impl Write, attempt: &Attempt) -> io::Result<()> {
    serde_json::to_writer(&mut *out, attempt)?;
    writeln!(out)
}

/// Write the recent scans, newest first.
pub fn history(out: &mut impl Write, recent: &RecentScans) -> io::Result<()> {
    if recent.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "Scan history")?;
    for entry in recent {
        let number = entry
            .document_number
            .as_ref()
            .map(|n| n.to_string())
            .unwrap_or_else(|| "(not detected)".into());
        writeln!(out, "   {number}  {}", timestamp(&entry.timestamp))?;
    }
    Ok(())
}

pub fn history_json(out: &mut impl Write, recent: &RecentScans) -> io::Result<()> {
    serde_json::to_writer(&mut *out, &json!({ "history": recent }))?;
    writeln!(out)
}

/// Write a failure for one input.
pub fn failure(out: &mut impl Write, source: &str, human: &HumanError) -> io::Result<()> {
    writeln!(out, "{source}: {}", human.message)?;
    writeln!(out, "   {}", human.suggestion)
}

pub fn failure_json(out: &mut impl Write, source: &str, human: &HumanError) -> io::Result<()> {
    let value = json!({
        "source": source,
        "error": human.message,
        "suggestion": human.suggestion,
        "retriable": human.retriable,
    });
    serde_json::to_writer(&mut *out, &value)?;
    writeln!(out)
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format(HISTORY_TIMESTAMP).to_string()
}
