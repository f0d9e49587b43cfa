// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Uploaded image files as a frame source.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use ausweis_core::error::{AusweisError, Result};
use image::DynamicImage;
use tracing::{info, instrument};

use crate::traits::FrameSource;

/// Yields decoded image files one per `capture_frame` call, in the order given.
#[derive(Debug, Clone)]
pub struct ImageFileSource {
    pending: VecDeque<PathBuf>,
    current: Option<PathBuf>,
}

impl ImageFileSource {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            pending: paths.into_iter().map(Into::into).collect(),
            current: None,
        }
    }

    /// Path of the most recently captured (or attempted) frame.
    pub fn current_path(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl FrameSource for ImageFileSource {
    #[instrument(skip(self), fields(remaining = self.pending.len()))]
    fn capture_frame(&mut self) -> Result<Option<DynamicImage>> {
        let Some(path) = self.pending.pop_front() else {
            return Ok(None);
        };
        self.current = Some(path.clone());

        let image = image::open(&path).map_err(|err| {
            AusweisError::MalformedInput(format!("failed to open {}: {}", path.display(), err))
        })?;
        info!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "Image loaded"
        );
        Ok(Some(image))
    }

    fn describe(&self) -> String {
        match &self.current {
            Some(path) => path.display().to_string(),
            None => "image files".into(),
        }
    }
}
