// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line interface definition.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "ausweis",
    version,
    about = "Verify driving licences from CNIC photos or typed CNIC numbers"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Config file (default: $XDG_DATA_HOME/ausweis/config.json)")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Authority records (.json, .db, .sqlite); default: bundled sample records")]
    pub store: Option<PathBuf>,
    #[arg(long, global = true, help = "Output machine-readable JSON, one object per line")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        value_parser = parse_timestamp,
        help = "Verify as of this time (RFC 3339 or YYYY-MM-DD, UTC) instead of now"
    )]
    pub at: Option<DateTime<Utc>>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read CNIC numbers from card images and verify them.
    Scan {
        #[arg(required_unless_present = "camera")]
        images: Vec<PathBuf>,
        #[arg(
            long,
            conflicts_with = "images",
            help = "Capture from the device camera instead of files"
        )]
        camera: bool,
        #[arg(long, help = "Directory with text-detection.rten and text-recognition.rten")]
        models: Option<PathBuf>,
    },
    /// Verify typed CNIC numbers (xxxxx-xxxxxxx-x).
    Check {
        #[arg(required = true)]
        numbers: Vec<String>,
    },
    /// Write the binarized image the OCR engine would see.
    Normalize {
        image: PathBuf,
        #[arg(long, short)]
        output: PathBuf,
        #[arg(long, help = "Upscale factor (default from config, 1.5)")]
        scale: Option<f32>,
    },
}

/// Accept RFC 3339 timestamps or bare dates (midnight UTC).
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("expected RFC 3339 timestamp or YYYY-MM-DD, got {value:?}"))
}
