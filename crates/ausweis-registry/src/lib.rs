// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ausweis-registry — the record-keeping side of the verifier.
//
// Authority stores answer "who holds this document number and is their
// licence valid"; the verifier turns that answer (or its absence) into a
// verification result with a grace deadline; the scan history keeps the
// per-session log of attempts.

pub mod history;
pub mod sqlite;
pub mod store;
pub mod verifier;

pub use history::{RecentScans, ScanHistory};
pub use sqlite::SqliteStore;
pub use store::{AuthorityStore, InMemoryStore};
pub use verifier::RecordVerifier;
