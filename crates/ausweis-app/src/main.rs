// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ausweis — driving licence verification from CNIC photos
//
// Entry point. Initialises logging, loads configuration, opens the authority
// store and runs one verification session per invocation.

mod cli;
mod render;
mod services;

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use ausweis_bridge::{FrameSource, ImageFileSource, platform_camera};
use ausweis_core::config::AppConfig;
use ausweis_core::error::AusweisError;
use ausweis_core::human_errors::humanize_error;
use ausweis_document::image::normalizer::save as save_image;
use ausweis_document::{ImageNormalizer, PatternExtractor};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde_json::json;

use cli::{Cli, Commands};
use services::data_dir;
use services::recognizer::load_recognizer;
use services::session::{Attempt, VerificationSession};
use services::store::open_store;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "ausweis failed");
            // Show the operator-facing message when the cause is one of ours.
            if let Some(cause) = err.chain().find_map(|e| e.downcast_ref::<AusweisError>()) {
                let human = humanize_error(cause);
                eprintln!("{}", human.message);
                eprintln!("   {}", human.suggestion);
            }
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let Cli {
        config: config_path,
        store,
        json,
        at,
        command,
    } = cli;

    let mut config = load_config(config_path.as_deref())?;
    if store.is_some() {
        config.store_path = store;
    }
    let clock = Clock(at);

    match command {
        Commands::Check { numbers } => {
            let session = open_session(&config)?;
            let mut out = io::stdout().lock();
            let mut ok = true;
            for number in &numbers {
                let outcome = session.check_number(number, clock.now());
                ok &= report(&mut out, json, "manual entry", outcome)?;
            }
            finish(&mut out, json, &session, config.display_limit)?;
            Ok(exit_code(ok))
        }
        Commands::Scan {
            images,
            camera,
            models,
        } => {
            let model_dir = models.or_else(|| config.model_dir.clone());
            let recognizer =
                load_recognizer(model_dir.as_deref()).context("loading the OCR engine")?;
            let extractor = PatternExtractor::new(recognizer);
            let session = open_session(&config)?;

            let mut source: Box<dyn FrameSource> = if camera {
                platform_camera()
            } else {
                Box::new(ImageFileSource::new(images))
            };

            let mut out = io::stdout().lock();
            let mut ok = true;
            loop {
                let frame = match source.capture_frame() {
                    Ok(Some(frame)) => frame,
                    Ok(None) => break,
                    Err(err) => {
                        ok = false;
                        report_failure(&mut out, json, &source.describe(), &err)?;
                        // A broken camera keeps failing; a bad file does not stop the batch.
                        if camera {
                            break;
                        }
                        continue;
                    }
                };
                let label = source.describe();
                let outcome = session.scan_image(&extractor, &frame, &label, clock.now());
                ok &= report(&mut out, json, &label, outcome)?;
            }
            finish(&mut out, json, &session, config.display_limit)?;
            Ok(exit_code(ok))
        }
        Commands::Normalize {
            image,
            output,
            scale,
        } => {
            let normalizer = ImageNormalizer::new(scale.unwrap_or(config.scale_factor));
            let binary = normalizer
                .normalize_file(&image)
                .with_context(|| format!("normalizing {}", image.display()))?;
            save_image(&binary, &output)
                .with_context(|| format!("writing {}", output.display()))?;

            let mut out = io::stdout().lock();
            if json {
                let value = json!({
                    "input": image.display().to_string(),
                    "output": output.display().to_string(),
                    "width": binary.width(),
                    "height": binary.height(),
                });
                serde_json::to_writer(&mut out, &value)?;
                writeln!(out)?;
            } else {
                writeln!(
                    out,
                    "wrote {} ({}x{})",
                    output.display(),
                    binary.width(),
                    binary.height()
                )?;
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// The verification clock: a fixed `--at` instant, or the wall clock.
#[derive(Clone, Copy)]
struct Clock(Option<DateTime<Utc>>);

impl Clock {
    fn now(self) -> DateTime<Utc> {
        self.0.unwrap_or_else(Utc::now)
    }
}

/// An explicit `--config` must exist; the default location is optional.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    if let Some(path) = explicit {
        return AppConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()));
    }
    let default_path = data_dir::config_path();
    if default_path.exists() {
        tracing::info!(path = %default_path.display(), "Loading config");
        return AppConfig::load(&default_path)
            .with_context(|| format!("loading config {}", default_path.display()));
    }
    Ok(AppConfig::default())
}

fn open_session(config: &AppConfig) -> anyhow::Result<VerificationSession> {
    let store = open_store(config.store_path.as_deref()).context("opening the authority store")?;
    Ok(VerificationSession::new(config, store))
}

/// Print one attempt. Returns `false` when the attempt failed.
fn report(
    out: &mut impl Write,
    json: bool,
    source: &str,
    outcome: ausweis_core::error::Result<Attempt>,
) -> anyhow::Result<bool> {
    match outcome {
        Ok(attempt) => {
            if json {
                render::attempt_json(out, &attempt)?;
            } else {
                render::attempt(out, &attempt)?;
            }
            Ok(true)
        }
        Err(err) => {
            report_failure(out, json, source, &err)?;
            Ok(false)
        }
    }
}

fn report_failure(
    out: &mut impl Write,
    json: bool,
    source: &str,
    err: &AusweisError,
) -> anyhow::Result<()> {
    tracing::warn!(source, error = %err, "Attempt failed");
    let human = humanize_error(err);
    if json {
        render::failure_json(out, source, &human)?;
    } else {
        render::failure(&mut io::stderr(), source, &human)?;
    }
    Ok(())
}

fn finish(
    out: &mut impl Write,
    json: bool,
    session: &VerificationSession,
    display_limit: usize,
) -> anyhow::Result<()> {
    let recent = session.recent(display_limit);
    if json {
        render::history_json(out, &recent)?;
    } else {
        render::history(out, &recent)?;
    }
    tracing::info!(
        session = %session.id(),
        attempts = session.history().len(),
        "Verification session finished"
    );
    Ok(())
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
