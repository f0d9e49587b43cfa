// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Record verification and grace-period policy.

use ausweis_core::error::Result;
use ausweis_core::types::{DocumentNumber, LicenseStatus, VerificationResult};
use chrono::{DateTime, Duration, Utc};
use tracing::{info, instrument, warn};

use crate::store::AuthorityStore;

/// Length of the grace window granted to expired or unregistered documents.
pub const DEFAULT_GRACE_DAYS: u32 = 7;

/// Classifies a candidate document number against an authority store.
///
/// Any non-valid outcome (expired record, no record) is granted a grace
/// window starting at the moment of the attempt. The verifier only reports
/// the deadline; enforcing it is the consumer's job.
pub struct RecordVerifier<S> {
    store: S,
    grace_period: Duration,
}

impl<S: AuthorityStore> RecordVerifier<S> {
    /// Verifier with the default 7-day grace window.
    pub fn new(store: S) -> Self {
        Self::with_grace_days(store, DEFAULT_GRACE_DAYS)
    }

    pub fn with_grace_days(store: S, days: u32) -> Self {
        Self {
            store,
            grace_period: Duration::days(i64::from(days)),
        }
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Verify a candidate at `now`.
    ///
    /// One synchronous lookup, no retries. `Err` means the store could not
    /// answer ([`StoreUnavailable`](ausweis_core::AusweisError::StoreUnavailable));
    /// it affects this call only.
    #[instrument(skip(self, candidate), fields(candidate = candidate.map(DocumentNumber::as_str)))]
    pub fn verify(
        &self,
        candidate: Option<&DocumentNumber>,
        now: DateTime<Utc>,
    ) -> Result<VerificationResult> {
        let Some(number) = candidate else {
            info!("No candidate; extraction failed");
            return Ok(VerificationResult::ExtractionFailed);
        };

        let result = match self.store.lookup(number)? {
            Some(record) => match record.status {
                LicenseStatus::Valid => VerificationResult::Verified { record },
                LicenseStatus::Expired => VerificationResult::ExpiredWithGrace {
                    record,
                    grace_deadline: self.grace_deadline(now),
                },
            },
            None => VerificationResult::UnknownWithGrace {
                grace_deadline: self.grace_deadline(now),
            },
        };

        info!(outcome = result.label(), "Verification complete");
        Ok(result)
    }

    fn grace_deadline(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.grace_period).unwrap_or_else(|| {
            warn!(%now, "Grace deadline out of range; clamping");
            DateTime::<Utc>::MAX_UTC
        })
    }
}
