// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic capture abstraction.

use ausweis_core::error::Result;
use image::DynamicImage;

/// Something that hands out raw colour frames on request.
pub trait FrameSource {
    /// Capture the next frame.
    ///
    /// Returns `Ok(None)` if the operator cancelled or the source is
    /// exhausted. Timeouts are the implementation's responsibility.
    fn capture_frame(&mut self) -> Result<Option<DynamicImage>>;

    /// Short label for logs and messages (file name, device name).
    fn describe(&self) -> String;
}
