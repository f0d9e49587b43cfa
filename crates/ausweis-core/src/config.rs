// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AusweisError, Result};

/// Largest accepted upscale factor.
pub const MAX_SCALE_FACTOR: f32 = 8.0;

/// How many scan entries a session keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryRetention {
    /// Keep every attempt for the lifetime of the session.
    Unbounded,
    /// Keep only the most recent `n` attempts (ring buffer, `n >= 1`).
    Capped(usize),
}

impl Default for HistoryRetention {
    fn default() -> Self {
        Self::Capped(100)
    }
}

/// Persistent application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Upscale factor applied before binarization (default 1.5).
    pub scale_factor: f32,
    /// Length of the grace window for expired or unknown documents, in days.
    pub grace_period_days: u32,
    /// How many history entries to show after a session.
    pub display_limit: usize,
    /// Retention policy for the session scan history.
    pub history_retention: HistoryRetention,
    /// Directory holding `text-detection.rten` / `text-recognition.rten`.
    /// `None` uses the ocrs cache directory.
    pub model_dir: Option<PathBuf>,
    /// Authority store file (`.json`, `.db`, `.sqlite`). `None` uses the
    /// built-in sample records.
    pub store_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scale_factor: 1.5,
            grace_period_days: 7,
            display_limit: 5,
            history_retention: HistoryRetention::default(),
            model_dir: None,
            store_path: None,
        }
    }
}

impl AppConfig {
    /// Read a config file. Fields missing from the file keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|err| {
            AusweisError::Config(format!("cannot read {}: {err}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&data).map_err(|err| {
            AusweisError::Config(format!("invalid config {}: {err}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.scale_factor.is_finite() || self.scale_factor <= 0.0 {
            return Err(AusweisError::Config(format!(
                "scale_factor must be a positive number, got {}",
                self.scale_factor
            )));
        }
        if self.scale_factor > MAX_SCALE_FACTOR {
            return Err(AusweisError::Config(format!(
                "scale_factor must be at most {MAX_SCALE_FACTOR}, got {}",
                self.scale_factor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.scale_factor, 1.5);
        assert_eq!(config.grace_period_days, 7);
        assert_eq!(config.display_limit, 5);
        assert_eq!(config.history_retention, HistoryRetention::Capped(100));
        assert!(config.store_path.is_none());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "grace_period_days": 14, "history_retention": "Unbounded" }"#)
                .unwrap();
        assert_eq!(config.grace_period_days, 14);
        assert_eq!(config.history_retention, HistoryRetention::Unbounded);
        assert_eq!(config.scale_factor, 1.5);
    }

    #[test]
    fn rejects_non_positive_scale() {
        let config = AppConfig {
            scale_factor: 0.0,
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(AusweisError::Config(_))));
    }

    #[test]
    fn rejects_oversized_scale() {
        let config = AppConfig {
            scale_factor: 1.0e6,
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(AusweisError::Config(_))));

        let at_limit = AppConfig {
            scale_factor: MAX_SCALE_FACTOR,
            ..AppConfig::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = AppConfig {
            display_limit: 9,
            history_retention: HistoryRetention::Capped(20),
            store_path: Some(PathBuf::from("/srv/records.db")),
            ..AppConfig::default()
        };
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.display_limit, 9);
        assert_eq!(loaded.history_retention, HistoryRetention::Capped(20));
        assert_eq!(loaded.store_path, config.store_path);
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let err = AppConfig::load("/nonexistent/ausweis/config.json").unwrap_err();
        assert!(matches!(err, AusweisError::Config(_)));
    }
}
