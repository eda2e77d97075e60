// Copyright (c) The ci-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for `ci-summary`: turning test and build artifacts written by a test runner
//! into HTML summaries for a CI job summary page.
//!
//! The basic flow for test results is:
//!
//! 1. [`artifact::ArtifactFile`] locates and reads the JSON artifact.
//! 2. [`ingest`] parses it into raw sessions and normalizes each case.
//! 3. [`aggregator`] groups cases into files and runs, and accumulates statistics.
//! 4. [`reporter`] renders the aggregated results as HTML tables.
//! 5. [`sink`] appends the rendered blocks to the job summary.
//!
//! [`summary`] ties these steps together with best-effort error handling.

pub mod aggregator;
pub mod artifact;
pub mod build;
pub mod config;
pub mod errors;
mod helpers;
pub mod ingest;
pub mod reporter;
pub mod sink;
pub mod summary;
