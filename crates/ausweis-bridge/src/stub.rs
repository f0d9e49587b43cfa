// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub camera for platforms without a native capture bridge.

use ausweis_core::error::{AusweisError, Result};
use image::DynamicImage;

use crate::traits::FrameSource;

/// Camera that is never available.
pub struct StubCamera;

impl FrameSource for StubCamera {
    fn capture_frame(&mut self) -> Result<Option<DynamicImage>> {
        tracing::warn!("FrameSource::capture_frame called on stub camera");
        Err(AusweisError::PlatformUnavailable)
    }

    fn describe(&self) -> String {
        "camera (unavailable)".into()
    }
}
