// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session scan history — append-only log of verification attempts, read back
// newest-first.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use ausweis_core::config::HistoryRetention;
use ausweis_core::types::ScanEntry;
use serde::Serialize;
use tracing::{debug, instrument};

/// Append-only log of verification attempts for one session.
///
/// Appends are O(1) amortized and safe from several threads at once. Under
/// [`HistoryRetention::Capped`] the oldest entry is evicted once the cap is
/// reached; entries are otherwise never removed or modified.
#[derive(Debug)]
pub struct ScanHistory {
    entries: Mutex<VecDeque<ScanEntry>>,
    retention: HistoryRetention,
}

impl Default for ScanHistory {
    fn default() -> Self {
        Self::new(HistoryRetention::default())
    }
}

impl ScanHistory {
    /// `Capped(0)` is treated as `Capped(1)`.
    pub fn new(retention: HistoryRetention) -> Self {
        let retention = match retention {
            HistoryRetention::Capped(0) => HistoryRetention::Capped(1),
            other => other,
        };
        let entries = match retention {
            HistoryRetention::Capped(cap) => VecDeque::with_capacity(cap.min(1024)),
            HistoryRetention::Unbounded => VecDeque::new(),
        };
        Self {
            entries: Mutex::new(entries),
            retention,
        }
    }

    pub fn unbounded() -> Self {
        Self::new(HistoryRetention::Unbounded)
    }

    pub fn retention(&self) -> HistoryRetention {
        self.retention
    }

    /// Append an attempt.
    #[instrument(skip_all, fields(number = entry.document_number.as_ref().map(|n| n.as_str())))]
    pub fn record(&self, entry: ScanEntry) {
        let mut entries = self.lock();
        if let HistoryRetention::Capped(cap) = self.retention {
            while entries.len() >= cap {
                entries.pop_front();
            }
        }
        entries.push_back(entry);
        debug!(len = entries.len(), "scan recorded");
    }

    /// Up to `n` most recent entries, newest first.
    ///
    /// The result is a snapshot: later appends do not change it, and it can
    /// be iterated any number of times.
    pub fn recent(&self, n: usize) -> RecentScans {
        let entries = self.lock();
        RecentScans {
            entries: entries.iter().rev().take(n).cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic in another appender cannot leave the deque half-written, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, VecDeque<ScanEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Newest-first snapshot returned by [`ScanHistory::recent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecentScans {
    entries: Vec<ScanEntry>,
}

impl RecentScans {
    pub fn iter(&self) -> std::slice::Iter<'_, ScanEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[ScanEntry] {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a RecentScans {
    type Item = &'a ScanEntry;
    type IntoIter = std::slice::Iter<'a, ScanEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for RecentScans {
    type Item = ScanEntry;
    type IntoIter = std::vec::IntoIter<ScanEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
