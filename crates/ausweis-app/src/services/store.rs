// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Authority store selection.

use std::path::Path;

use ausweis_core::error::{AusweisError, Result};
use ausweis_registry::{AuthorityStore, InMemoryStore, SqliteStore};
use tracing::info;

/// Open the store configured at `path`, picked by file extension:
/// `.json` loads into memory, `.db` / `.sqlite` / `.sqlite3` open SQLite.
/// No path means the bundled sample records.
pub fn open_store(path: Option<&Path>) -> Result<Box<dyn AuthorityStore>> {
    let Some(path) = path else {
        info!("Using bundled sample records");
        return Ok(Box::new(InMemoryStore::sample()?));
    };

    // Opening SQLite creates missing files; an empty store would turn every
    // lookup into "unknown".
    if !path.exists() {
        return Err(AusweisError::Config(format!(
            "authority store {} does not exist",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "json" => Ok(Box::new(InMemoryStore::from_json_file(path)?)),
        "db" | "sqlite" | "sqlite3" => Ok(Box::new(SqliteStore::open(path)?)),
        other => Err(AusweisError::Config(format!(
            "unsupported authority store type {other:?} for {}; use .json, .db or .sqlite",
            path.display()
        ))),
    }
}
