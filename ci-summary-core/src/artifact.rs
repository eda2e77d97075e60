// Copyright (c) The ci-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Locating, reading and cleaning up artifact files written by the test runner.
//!
//! Artifacts live in the runner's temporary directory and are named by convention:
//! `<prefix><run-id>.json`. Each artifact is read at most once and deleted afterwards.

use crate::errors::{ArtifactCleanupError, ArtifactReadError};
use camino::{Utf8Path, Utf8PathBuf};
use std::{fmt, fs, io};
use tracing::debug;

/// The kind of artifact being processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Test results, produced by the test runner.
    TestResults,

    /// Build task results, produced by the build tool.
    BuildSummary,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::TestResults => write!(f, "test results"),
            ArtifactKind::BuildSummary => write!(f, "build summary"),
        }
    }
}

/// An artifact file in the runner's temporary directory.
#[derive(Clone, Debug)]
pub struct ArtifactFile {
    kind: ArtifactKind,
    path: Utf8PathBuf,
}

impl ArtifactFile {
    /// Locates the artifact for `run_id` within `temp_dir`, named `<prefix><run_id>.json`.
    pub fn locate(kind: ArtifactKind, temp_dir: &Utf8Path, prefix: &str, run_id: &str) -> Self {
        Self {
            kind,
            path: temp_dir.join(format!("{prefix}{run_id}.json")),
        }
    }

    /// Returns the path to this artifact.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Reads the contents of the artifact.
    ///
    /// Returns `Ok(None)` if the artifact does not exist: there is nothing to summarize.
    pub fn read(&self) -> Result<Option<String>, ArtifactReadError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                debug!("read {} artifact from {}", self.kind, self.path);
                Ok(Some(contents))
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!("{} artifact does not exist at {}", self.kind, self.path);
                Ok(None)
            }
            Err(error) => Err(ArtifactReadError::new(self.kind, self.path.clone(), error)),
        }
    }

    /// Deletes the artifact. A missing artifact is not an error.
    pub fn remove(&self) -> Result<(), ArtifactCleanupError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("deleted {} artifact at {}", self.kind, self.path);
                Ok(())
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(ArtifactCleanupError::new(
                self.kind,
                self.path.clone(),
                error,
            )),
        }
    }
}
