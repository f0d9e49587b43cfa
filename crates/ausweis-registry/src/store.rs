// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Authority store abstraction and the in-memory implementation.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use ausweis_core::error::{AusweisError, Result};
use ausweis_core::types::{AuthorityRecord, DocumentNumber};
use tracing::{debug, info, instrument};

/// Records shipped with the binary, used when no store is configured.
const SAMPLE_RECORDS: &str = include_str!("../data/sample_records.json");

/// Source of truth mapping document numbers to holder records.
///
/// Lookups are exact string matches on an already-validated number.
/// Implementations must allow concurrent read-only lookups; a store that
/// cannot answer reports [`AusweisError::StoreUnavailable`].
pub trait AuthorityStore: Send + Sync {
    fn lookup(&self, number: &DocumentNumber) -> Result<Option<Arc<AuthorityRecord>>>;
}

impl<S: AuthorityStore + ?Sized> AuthorityStore for Box<S> {
    fn lookup(&self, number: &DocumentNumber) -> Result<Option<Arc<AuthorityRecord>>> {
        (**self).lookup(number)
    }
}

impl<S: AuthorityStore + ?Sized> AuthorityStore for Arc<S> {
    fn lookup(&self, number: &DocumentNumber) -> Result<Option<Arc<AuthorityRecord>>> {
        (**self).lookup(number)
    }
}

/// Fixed in-memory mapping. Records are loaded once and shared by `Arc`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: HashMap<DocumentNumber, Arc<AuthorityRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundled sample records.
    pub fn sample() -> Result<Self> {
        Self::from_json_str(SAMPLE_RECORDS)
    }

    /// Add a record, builder style. A later insert for the same number wins.
    pub fn with_record(mut self, number: DocumentNumber, record: AuthorityRecord) -> Self {
        self.records.insert(number, Arc::new(record));
        self
    }

    /// Parse a JSON object mapping document numbers to records:
    ///
    /// ```json
    /// { "34501-4814449-1": { "holder_name": "Samar Abbas", "status": "Valid", "expiry_date": "2027-05-30" } }
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, AuthorityRecord> = serde_json::from_str(json)?;
        let mut records = HashMap::with_capacity(raw.len());
        for (key, record) in raw {
            let number = DocumentNumber::parse(&key)?;
            records.insert(number, Arc::new(record));
        }
        debug!(record_count = records.len(), "Authority records parsed");
        Ok(Self { records })
    }

    /// Load a JSON records file (see [`from_json_str`](Self::from_json_str)).
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let store = Self::from_json_str(&data)?;
        info!(record_count = store.len(), "Authority records loaded");
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl AuthorityStore for InMemoryStore {
    fn lookup(&self, number: &DocumentNumber) -> Result<Option<Arc<AuthorityRecord>>> {
        Ok(self.records.get(number).cloned())
    }
}
