// Copyright (c) The ci-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by ci-summary.

use crate::artifact::ArtifactKind;
use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// An error that occurred while reading an artifact file from disk.
///
/// A missing artifact is not an error: [`ArtifactFile::read`](crate::artifact::ArtifactFile::read)
/// returns `Ok(None)` in that case.
#[derive(Debug, Error)]
#[error("failed to read {kind} artifact at `{path}`")]
pub struct ArtifactReadError {
    kind: ArtifactKind,
    path: Utf8PathBuf,
    #[source]
    error: std::io::Error,
}

impl ArtifactReadError {
    pub(crate) fn new(
        kind: ArtifactKind,
        path: impl Into<Utf8PathBuf>,
        error: std::io::Error,
    ) -> Self {
        Self {
            kind,
            path: path.into(),
            error,
        }
    }

    /// Returns the path that could not be read.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

/// An error that occurred while parsing the contents of an artifact file.
#[derive(Debug, Error)]
#[error("failed to parse {kind} artifact (at `{json_path}`)")]
pub struct ArtifactParseError {
    kind: ArtifactKind,
    json_path: String,
    #[source]
    error: serde_json::Error,
}

impl ArtifactParseError {
    pub(crate) fn new(
        kind: ArtifactKind,
        error: serde_path_to_error::Error<serde_json::Error>,
    ) -> Self {
        Self {
            kind,
            json_path: error.path().to_string(),
            error: error.into_inner(),
        }
    }

    pub(crate) fn trailing(kind: ArtifactKind, error: serde_json::Error) -> Self {
        Self {
            kind,
            json_path: ".".to_owned(),
            error,
        }
    }

    /// Returns the path within the JSON document at which parsing failed, e.g.
    /// `[0].TestResult.Duration`.
    pub fn json_path(&self) -> &str {
        &self.json_path
    }
}

/// An error that occurred while deleting an artifact file after use.
///
/// Cleanup is best-effort: this error is logged by callers and never re-raised.
#[derive(Debug, Error)]
#[error("failed to delete {kind} artifact at `{path}`")]
pub struct ArtifactCleanupError {
    kind: ArtifactKind,
    path: Utf8PathBuf,
    #[source]
    error: std::io::Error,
}

impl ArtifactCleanupError {
    pub(crate) fn new(
        kind: ArtifactKind,
        path: impl Into<Utf8PathBuf>,
        error: std::io::Error,
    ) -> Self {
        Self {
            kind,
            path: path.into(),
            error,
        }
    }
}

/// An error that occurred while appending markup to a summary destination.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SinkWriteError {
    /// The summary file could not be opened for appending.
    #[error("failed to open summary file `{path}`")]
    Open {
        /// The summary file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// Writing to the summary file failed.
    #[error("failed to write to summary file `{path}`")]
    Write {
        /// The summary file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },
}

/// An error that occurred while loading ci-summary configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseError {
    /// The config file could not be read.
    #[error("failed to read config file at `{path}`")]
    Read {
        /// The config file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// The config file is not valid TOML.
    #[error("failed to parse config file at `{path}`")]
    Parse {
        /// The config file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: toml::de::Error,
    },

    /// The config file is valid TOML but does not match the expected schema.
    #[error("failed to deserialize config file at `{path}`")]
    Deserialize {
        /// The config file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: Box<serde_path_to_error::Error<toml::de::Error>>,
    },
}
