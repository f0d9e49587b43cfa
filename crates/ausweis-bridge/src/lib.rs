// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ausweis — capture sources.
//
// The verifier core never talks to devices. Everything that produces a raw
// image (uploaded files, a webcam, a phone camera) sits behind `FrameSource`.

pub mod files;
pub mod stub;
pub mod traits;

pub use files::ImageFileSource;
pub use traits::FrameSource;

/// The camera for the current platform.
///
/// No native camera bridge exists yet, so every platform gets the stub,
/// which reports `PlatformUnavailable`.
pub fn platform_camera() -> Box<dyn FrameSource> {
    Box::new(stub::StubCamera)
}
