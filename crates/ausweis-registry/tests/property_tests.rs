// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Property-based tests for verification and scan history.

use std::sync::Arc;

use ausweis_core::config::HistoryRetention;
use ausweis_core::error::{AusweisError, Result};
use ausweis_core::types::{AuthorityRecord, DocumentNumber, ScanEntry, VerificationResult};
use ausweis_registry::{AuthorityStore, InMemoryStore, RecordVerifier, ScanHistory};
use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;

/// A store that cannot answer. Only reachable when a candidate is present.
struct OfflineStore;

impl AuthorityStore for OfflineStore {
    fn lookup(&self, _number: &DocumentNumber) -> Result<Option<Arc<AuthorityRecord>>> {
        Err(AusweisError::StoreUnavailable("connection refused".into()))
    }
}

/// Any representable instant.
fn any_instant() -> impl Strategy<Value = DateTime<Utc>> {
    instant_up_to(DateTime::<Utc>::MAX_UTC.timestamp())
}

/// Instants whose grace deadline is still representable.
fn instant_with_headroom() -> impl Strategy<Value = DateTime<Utc>> {
    instant_up_to(DateTime::<Utc>::MAX_UTC.timestamp() - Duration::days(8).num_seconds())
}

fn instant_up_to(max_secs: i64) -> impl Strategy<Value = DateTime<Utc>> {
    (DateTime::<Utc>::MIN_UTC.timestamp()..=max_secs, 0u32..1_000_000_000).prop_map(
        |(secs, nanos)| DateTime::from_timestamp(secs, nanos).expect("in-range timestamp"),
    )
}

/// Bundled numbers (valid and expired) mixed with arbitrary ones.
fn candidate() -> impl Strategy<Value = DocumentNumber> {
    prop_oneof![
        Just("34501-4814449-1".to_string()),
        Just("35201-1234567-8".to_string()),
        Just("34501-4814449-3".to_string()),
        prop::string::string_regex("[0-9]{5}-[0-9]{7}-[0-9]")
            .expect("Failed to create document number regex strategy"),
    ]
    .prop_map(|s| DocumentNumber::parse(&s).expect("strategy yields well-formed numbers"))
}

fn entries(n: usize) -> Vec<ScanEntry> {
    let start = DateTime::from_timestamp(1_735_718_400, 0).expect("valid start");
    (0..n)
        .map(|i| {
            let number = DocumentNumber::parse(&format!("{:05}-0000000-0", i % 100_000)).ok();
            ScanEntry::new(number, start + Duration::minutes(i as i64))
        })
        .collect()
}

proptest! {
    /// No candidate means extraction failed, at any instant, without a lookup.
    #[test]
    fn prop_missing_candidate_is_extraction_failed(now in any_instant()) {
        let verifier = RecordVerifier::new(OfflineStore);
        prop_assert_eq!(verifier.verify(None, now).unwrap(), VerificationResult::ExtractionFailed);
    }

    /// Every grace outcome ends exactly 168 hours after the attempt, and a
    /// valid record never carries a deadline.
    #[test]
    fn prop_grace_deadline_is_168_hours(now in instant_with_headroom(), number in candidate()) {
        let verifier = RecordVerifier::new(InMemoryStore::sample().unwrap());
        let result = verifier.verify(Some(&number), now).unwrap();
        match &result {
            VerificationResult::Verified { .. } => prop_assert_eq!(result.grace_deadline(), None),
            VerificationResult::ExpiredWithGrace { grace_deadline, .. }
            | VerificationResult::UnknownWithGrace { grace_deadline } => {
                prop_assert_eq!(*grace_deadline - now, Duration::hours(168));
            }
            VerificationResult::ExtractionFailed => prop_assert!(false, "candidate was present"),
        }
    }

    /// Near the end of time the deadline saturates instead of failing.
    #[test]
    fn prop_deadline_never_precedes_attempt(now in any_instant(), number in candidate()) {
        let verifier = RecordVerifier::new(InMemoryStore::sample().unwrap());
        let result = verifier.verify(Some(&number), now).unwrap();
        if let Some(deadline) = result.grace_deadline() {
            prop_assert!(deadline >= now);
        }
    }

    /// `recent(k)` is the last `min(k, n)` entries, newest first.
    #[test]
    fn prop_recent_is_newest_first(n in 0usize..64, k in 0usize..80) {
        let all = entries(n);
        let history = ScanHistory::unbounded();
        for entry in all.clone() {
            history.record(entry);
        }
        let expected: Vec<_> = all.iter().rev().take(k).cloned().collect();
        let recent = history.recent(k);
        prop_assert_eq!(recent.as_slice(), expected.as_slice());
    }

    /// A capped history keeps only the newest `cap` entries.
    #[test]
    fn prop_capped_history_keeps_newest(cap in 1usize..16, n in 0usize..64) {
        let all = entries(n);
        let history = ScanHistory::new(HistoryRetention::Capped(cap));
        for entry in all.clone() {
            history.record(entry);
        }
        prop_assert_eq!(history.len(), n.min(cap));
        let expected: Vec<_> = all.iter().rev().take(cap).cloned().collect();
        let recent = history.recent(usize::MAX);
        prop_assert_eq!(recent.as_slice(), expected.as_slice());
    }
}
