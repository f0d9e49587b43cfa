// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SQLite-backed authority store.
//
// Schema:
//   authority_records(
//     document_number TEXT PRIMARY KEY,   -- DDDDD-DDDDDDD-D
//     holder_name     TEXT NOT NULL,
//     status          TEXT NOT NULL,      -- "Valid" | "Expired"
//     expiry_date     TEXT NOT NULL       -- YYYY-MM-DD
//   )

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use ausweis_core::error::{AusweisError, Result};
use ausweis_core::types::{AuthorityRecord, DocumentNumber, LicenseStatus};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, instrument};

use crate::store::AuthorityStore;

const CREATE_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS authority_records (
        document_number TEXT PRIMARY KEY,
        holder_name     TEXT NOT NULL,
        status          TEXT NOT NULL,
        expiry_date     TEXT NOT NULL
    );";

const DATE_FORMAT: &str = "%Y-%m-%d";

fn db_err(e: rusqlite::Error) -> AusweisError {
    AusweisError::StoreUnavailable(e.to_string())
}

/// Authority store backed by a SQLite database.
///
/// `rusqlite::Connection` is `Send` but not `Sync`, so it sits behind a
/// mutex; lookups are single indexed queries and hold the lock briefly.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the records database at `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(db_err)?;

        // WAL lets several verifier processes read while an import writes.
        conn.execute_batch("PRAGMA journal_mode = WAL;").map_err(db_err)?;
        conn.execute_batch(CREATE_TABLE_SQL).map_err(db_err)?;

        info!("authority database opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (useful for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        conn.execute_batch(CREATE_TABLE_SQL).map_err(db_err)?;

        debug!("in-memory authority database opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert or replace a record.
    #[instrument(skip(self, record), fields(%number))]
    pub fn insert(&self, number: &DocumentNumber, record: &AuthorityRecord) -> Result<()> {
        let expiry = record.expiry_date.format(DATE_FORMAT).to_string();
        self.connection()
            .execute(
                "INSERT OR REPLACE INTO authority_records
                     (document_number, holder_name, status, expiry_date)
                 VALUES (?1, ?2, ?3, ?4)",
                params![number.as_str(), record.holder_name, record.status.as_str(), expiry],
            )
            .map_err(db_err)?;
        Ok(())
    }

    /// Total number of records.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .connection()
            .query_row("SELECT COUNT(*) FROM authority_records", [], |row| row.get(0))
            .map_err(db_err)?;
        Ok(count as usize)
    }

    fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AuthorityStore for SqliteStore {
    #[instrument(skip(self), fields(%number))]
    fn lookup(&self, number: &DocumentNumber) -> Result<Option<Arc<AuthorityRecord>>> {
        let row: Option<(String, String, String)> = self
            .connection()
            .query_row(
                "SELECT holder_name, status, expiry_date
                 FROM authority_records
                 WHERE document_number = ?1",
                params![number.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .map_err(db_err)?;

        let Some((holder_name, status, expiry)) = row else {
            debug!("no authority record");
            return Ok(None);
        };

        let status = LicenseStatus::from_keyword(&status).ok_or_else(|| {
            AusweisError::StoreUnavailable(format!("record {number} has unknown status {status:?}"))
        })?;
        let expiry_date = NaiveDate::parse_from_str(&expiry, DATE_FORMAT).map_err(|err| {
            AusweisError::StoreUnavailable(format!("record {number} has bad expiry {expiry:?}: {err}"))
        })?;

        Ok(Some(Arc::new(AuthorityRecord {
            holder_name,
            status,
            expiry_date,
        })))
    }
}
