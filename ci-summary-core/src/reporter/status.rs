// Copyright (c) The ci-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{fmt, str::FromStr};
use thiserror::Error;

/// The outcome of a single test case, or the rolled-up outcome of a test file.
///
/// The ordering of this enum is by *severity*: a file or run is only as good as its worst case.
/// `NotRun < Passed < Incomplete < Failed`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum TestStatus {
    /// The test was not run, or the runner did not report a verdict for it.
    #[default]
    NotRun,

    /// The test passed.
    Passed,

    /// The test was filtered or could not run to completion, e.g. due to an assumption failure.
    Incomplete,

    /// The test failed.
    Failed,
}

impl TestStatus {
    /// All statuses, in order of increasing severity.
    pub const ALL: [TestStatus; 4] = [
        TestStatus::NotRun,
        TestStatus::Passed,
        TestStatus::Incomplete,
        TestStatus::Failed,
    ];

    /// Determines a status from the flags reported by the test runner.
    ///
    /// The flags are not guaranteed to be mutually exclusive, so they are consulted in order:
    /// `failed`, then `incomplete`, then `passed`.
    pub fn from_flags(failed: bool, incomplete: bool, passed: bool) -> Self {
        if failed {
            TestStatus::Failed
        } else if incomplete {
            TestStatus::Incomplete
        } else if passed {
            TestStatus::Passed
        } else {
            TestStatus::NotRun
        }
    }

    /// Combines the status accumulated so far with the status of one more case.
    ///
    /// A failure is never downgraded, an incomplete result is only upgraded by a failure, and
    /// `NotRun` never changes an existing verdict.
    pub fn merge(self, other: TestStatus) -> Self {
        self.max(other)
    }

    /// Returns the glyph used to display this status.
    pub fn emoji(self) -> &'static str {
        match self {
            TestStatus::Passed => "✅",
            TestStatus::Failed => "❌",
            TestStatus::Incomplete => "⚠️",
            TestStatus::NotRun => "🚫",
        }
    }

    /// Returns a short human-readable label, as used in table headers.
    pub fn label(self) -> &'static str {
        match self {
            TestStatus::Passed => "Passed",
            TestStatus::Failed => "Failed",
            TestStatus::Incomplete => "Incomplete",
            TestStatus::NotRun => "Not Run",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            TestStatus::Passed => "PASSED",
            TestStatus::Failed => "FAILED",
            TestStatus::Incomplete => "INCOMPLETE",
            TestStatus::NotRun => "NOT_RUN",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestStatus {
    type Err = TestStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TestStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TestStatusParseError {
                input: s.to_owned(),
            })
    }
}

/// Error returned while parsing a [`TestStatus`] value from a string.
#[derive(Clone, Debug, Error)]
#[error(
    "unrecognized value for test status: {input}\n(known values: PASSED, FAILED, INCOMPLETE, NOT_RUN)"
)]
pub struct TestStatusParseError {
    input: String,
}

/// Converts a build task's skip reason, as reported by the build tool, to display text.
///
/// Unknown reasons are passed through unchanged so that newer build tools keep working.
pub fn skip_reason_text(reason: &str) -> &str {
    match reason {
        "UpToDate" => "up-to-date",
        "UserSpecified" | "UserRequested" => "user requested",
        "DependencyFailed" => "dependency failed",
        other => other,
    }
}
