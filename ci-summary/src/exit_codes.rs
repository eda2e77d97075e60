// Copyright (c) The ci-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `ci-summary` failures.
///
/// Problems with artifacts or with the summary file never cause a failure: they are logged, and
/// `ci-summary` exits with [`OK`](Self::OK).
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum CiSummaryExitCode {}

impl CiSummaryExitCode {
    /// No errors occurred and ci-summary exited normally.
    pub const OK: i32 = 0;

    /// A user issue happened while setting up a ci-summary invocation, e.g. an invalid config file.
    pub const SETUP_ERROR: i32 = 96;

    /// Writing data to stdout produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
