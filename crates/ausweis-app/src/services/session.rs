// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Verification session — one operator's run of scans and manual checks.
//
// The session owns its scan history; nothing here is process-global. Each
// attempt runs synchronously: normalize, extract, record, verify.

use ausweis_core::config::AppConfig;
use ausweis_core::error::Result;
use ausweis_core::types::{DocumentNumber, ScanEntry, VerificationResult};
use ausweis_document::{ImageNormalizer, PatternExtractor, TextRecognizer};
use ausweis_registry::{AuthorityStore, RecentScans, RecordVerifier, ScanHistory};
use chrono::{DateTime, Utc};
use image::DynamicImage;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// One processed attempt, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct Attempt {
    /// Where the input came from (file name, "manual entry", ...).
    pub source: String,
    pub document_number: Option<DocumentNumber>,
    pub result: VerificationResult,
    pub timestamp: DateTime<Utc>,
    /// Set when manual input was rejected before lookup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_input: Option<String>,
}

pub struct VerificationSession {
    id: Uuid,
    normalizer: ImageNormalizer,
    verifier: RecordVerifier<Box<dyn AuthorityStore>>,
    history: ScanHistory,
}

impl VerificationSession {
    pub fn new(config: &AppConfig, store: Box<dyn AuthorityStore>) -> Self {
        let id = Uuid::new_v4();
        info!(session = %id, "Verification session started");
        Self {
            id,
            normalizer: ImageNormalizer::new(config.scale_factor),
            verifier: RecordVerifier::with_grace_days(store, config.grace_period_days),
            history: ScanHistory::new(config.history_retention),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Run a captured image through the full pipeline.
    ///
    /// An OCR engine failure aborts the attempt before anything is recorded.
    #[instrument(skip(self, extractor, image), fields(session = %self.id))]
    pub fn scan_image<R: TextRecognizer>(
        &self,
        extractor: &PatternExtractor<R>,
        image: &DynamicImage,
        source: &str,
        now: DateTime<Utc>,
    ) -> Result<Attempt> {
        let binary = self.normalizer.normalize(image);
        let candidate = extractor.extract(&binary)?;
        self.verify_candidate(source, candidate, now)
    }

    /// Verify a typed-in document number.
    ///
    /// Input that is not exactly `DDDDD-DDDDDDD-D` is never looked up; it
    /// counts as a failed extraction.
    #[instrument(skip(self), fields(session = %self.id))]
    pub fn check_number(&self, input: &str, now: DateTime<Utc>) -> Result<Attempt> {
        match DocumentNumber::parse(input) {
            Ok(number) => self.verify_candidate("manual entry", Some(number), now),
            Err(err) => {
                warn!(%err, "Manual entry rejected");
                let mut attempt = self.verify_candidate("manual entry", None, now)?;
                attempt.rejected_input = Some(input.to_owned());
                Ok(attempt)
            }
        }
    }

    /// Record the attempt, then classify the candidate.
    ///
    /// The attempt is logged even when the store turns out to be unavailable.
    pub fn verify_candidate(
        &self,
        source: &str,
        candidate: Option<DocumentNumber>,
        now: DateTime<Utc>,
    ) -> Result<Attempt> {
        self.history.record(ScanEntry::new(candidate.clone(), now));
        let result = self.verifier.verify(candidate.as_ref(), now)?;
        Ok(Attempt {
            source: source.to_owned(),
            document_number: candidate,
            result,
            timestamp: now,
            rejected_input: None,
        })
    }

    pub fn history(&self) -> &ScanHistory {
        &self.history
    }

    pub fn recent(&self, n: usize) -> RecentScans {
        self.history.recent(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use ausweis_core::AusweisError;
    use ausweis_core::config::HistoryRetention;
    use ausweis_core::types::AuthorityRecord;
    use ausweis_registry::InMemoryStore;
    use chrono::{Duration, NaiveDate, TimeZone};
    use image::GrayImage;

    struct CannedText(&'static str);

    impl TextRecognizer for CannedText {
        fn recognize(&self, _image: &GrayImage, _allowed: &str) -> Result<String> {
            Ok(self.0.to_owned())
        }
    }

    struct BrokenRecognizer;

    impl TextRecognizer for BrokenRecognizer {
        fn recognize(&self, _image: &GrayImage, _allowed: &str) -> Result<String> {
            Err(AusweisError::OcrError("engine crashed".into()))
        }
    }

    struct OfflineStore;

    impl AuthorityStore for OfflineStore {
        fn lookup(&self, _number: &DocumentNumber) -> Result<Option<Arc<AuthorityRecord>>> {
            Err(AusweisError::StoreUnavailable("timeout".into()))
        }
    }

    fn session() -> VerificationSession {
        VerificationSession::new(&AppConfig::default(), Box::new(InMemoryStore::sample().unwrap()))
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 10, 30, 0).unwrap()
    }

    fn photo() -> DynamicImage {
        DynamicImage::new_rgb8(40, 20)
    }

    #[test]
    fn scanned_card_is_verified_and_recorded() {
        let session = session();
        let extractor = PatternExtractor::new(CannedText("Name: John D0E CNIC 34501-4814449-1 Punjab"));

        let attempt = session.scan_image(&extractor, &photo(), "card.jpg", now()).unwrap();
        assert_eq!(attempt.result.record().map(|r| r.holder_name.as_str()), Some("Samar Abbas"));
        assert_eq!(attempt.source, "card.jpg");

        let recent = session.recent(5);
        assert_eq!(recent.len(), 1);
        assert_eq!(
            recent.as_slice()[0].document_number.as_ref().map(|n| n.as_str()),
            Some("34501-4814449-1")
        );
    }

    #[test]
    fn unreadable_card_is_extraction_failed_and_recorded() {
        let session = session();
        let extractor = PatternExtractor::new(CannedText("---- 1234 ----"));

        let attempt = session.scan_image(&extractor, &photo(), "blurry.jpg", now()).unwrap();
        assert_eq!(attempt.result, VerificationResult::ExtractionFailed);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.recent(1).as_slice()[0].document_number, None);
    }

    #[test]
    fn ocr_failure_is_not_recorded() {
        let session = session();
        let extractor = PatternExtractor::new(BrokenRecognizer);
        assert!(session.scan_image(&extractor, &photo(), "x.jpg", now()).is_err());
        assert!(session.history().is_empty());
    }

    #[test]
    fn manual_expired_entry_gets_grace() {
        let session = session();
        let attempt = session.check_number(" 35201-1234567-8 ", now()).unwrap();
        assert_eq!(attempt.result.label(), "expired_with_grace");
        assert_eq!(attempt.result.grace_deadline(), Some(now() + Duration::days(7)));
        assert_eq!(
            attempt.result.grace_deadline().map(|d| d.date_naive()),
            NaiveDate::from_ymd_opt(2025, 1, 8)
        );
    }

    #[test]
    fn manual_unknown_entry_gets_grace() {
        let session = session();
        let attempt = session.check_number("99999-9999999-9", now()).unwrap();
        assert_eq!(
            attempt.result,
            VerificationResult::UnknownWithGrace {
                grace_deadline: now() + Duration::days(7)
            }
        );
    }

    #[test]
    fn malformed_manual_entry_is_never_looked_up() {
        let session =
            VerificationSession::new(&AppConfig::default(), Box::new(OfflineStore));
        let attempt = session.check_number("3450148144491", now()).unwrap();
        assert_eq!(attempt.result, VerificationResult::ExtractionFailed);
        assert_eq!(attempt.rejected_input.as_deref(), Some("3450148144491"));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn store_outage_still_records_attempt() {
        let session =
            VerificationSession::new(&AppConfig::default(), Box::new(OfflineStore));
        let err = session.check_number("34501-4814449-1", now()).unwrap_err();
        assert!(matches!(err, AusweisError::StoreUnavailable(_)));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn session_uses_configured_grace_and_retention() {
        let config = AppConfig {
            grace_period_days: 3,
            history_retention: HistoryRetention::Capped(2),
            ..AppConfig::default()
        };
        let session = VerificationSession::new(&config, Box::new(InMemoryStore::sample().unwrap()));
        for _ in 0..4 {
            session.check_number("99999-9999999-9", now()).unwrap();
        }
        assert_eq!(session.history().len(), 2);
        let attempt = session.check_number("99999-9999999-9", now()).unwrap();
        assert_eq!(attempt.result.grace_deadline(), Some(now() + Duration::days(3)));
    }

    #[test]
    fn history_is_newest_first_across_attempts() {
        let session = session();
        let numbers = ["34501-4814449-1", "35201-1234567-8", "99999-9999999-9"];
        for (i, number) in numbers.iter().enumerate() {
            session
                .check_number(number, now() + Duration::minutes(i as i64))
                .unwrap();
        }
        let shown: Vec<String> = session
            .recent(5)
            .iter()
            .filter_map(|e| e.document_number.as_ref().map(|n| n.to_string()))
            .collect();
        assert_eq!(shown, ["99999-9999999-9", "35201-1234567-8", "34501-4814449-1"]);
    }
}
