// Copyright (c) The ci-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::TestStatus;
use camino::Utf8PathBuf;

/// A diagnostic attached to a test case by the test runner, e.g. a failure report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The event that produced the diagnostic, e.g. `"TestFailure"`.
    pub event: String,

    /// Free-form report text. May span multiple lines.
    pub report: String,
}

impl Diagnostic {
    /// Creates a new `Diagnostic`.
    pub fn new(event: impl Into<String>, report: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            report: report.into(),
        }
    }
}

/// A single normalized test case.
#[derive(Clone, Debug, PartialEq)]
pub struct TestCase {
    /// The name of the test case, without the name of its file.
    pub name: String,

    /// The time taken by the test case in seconds, rounded to two decimal places.
    pub duration: f64,

    /// The outcome of the test case.
    pub status: TestStatus,

    /// Diagnostics reported for this test case, in the order reported.
    pub diagnostics: Vec<Diagnostic>,
}

/// The test cases of a single test file within a run, along with rolled-up results.
#[derive(Clone, Debug, PartialEq)]
pub struct TestFile {
    /// The name of the file, as reported by the test runner.
    pub name: String,

    /// The path to the file relative to the workspace root, using host separators.
    pub path: Utf8PathBuf,

    /// Test cases in the order they were first seen.
    pub test_cases: Vec<TestCase>,

    /// The sum of the durations of all test cases.
    pub duration: f64,

    /// The most severe status across all test cases, or [`TestStatus::NotRun`] if there are none.
    pub status: TestStatus,
}

impl TestFile {
    /// Creates a new, empty `TestFile`.
    pub fn new(name: impl Into<String>, path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            test_cases: Vec::new(),
            duration: 0.0,
            status: TestStatus::NotRun,
        }
    }

    /// Adds a test case to this file, updating the duration and status.
    ///
    /// When building up a file, use of this method is recommended over pushing to
    /// `self.test_cases` directly.
    pub fn add_test_case(&mut self, test_case: TestCase) -> &mut Self {
        self.duration += test_case.duration;
        self.status = self.status.merge(test_case.status);
        self.test_cases.push(test_case);
        self
    }
}

/// The test files reported by a single run (session) of the test runner.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TestRun {
    /// Test files in the order they were first seen within the run.
    pub files: Vec<TestFile>,
}

/// Totals across all runs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TestStatistics {
    /// The total number of test cases.
    pub total: usize,

    /// The number of passed test cases.
    pub passed: usize,

    /// The number of failed test cases.
    pub failed: usize,

    /// The number of incomplete test cases.
    pub incomplete: usize,

    /// The number of test cases that were not run.
    pub not_run: usize,

    /// The sum of the (rounded) durations of all test cases, in seconds.
    pub duration: f64,
}

impl TestStatistics {
    /// Records a single test case.
    pub fn record(&mut self, test_case: &TestCase) -> &mut Self {
        self.total += 1;
        match test_case.status {
            TestStatus::Passed => self.passed += 1,
            TestStatus::Failed => self.failed += 1,
            TestStatus::Incomplete => self.incomplete += 1,
            TestStatus::NotRun => self.not_run += 1,
        }
        self.duration += test_case.duration;
        self
    }

    /// Returns the count for a given status.
    pub fn count(&self, status: TestStatus) -> usize {
        match status {
            TestStatus::Passed => self.passed,
            TestStatus::Failed => self.failed,
            TestStatus::Incomplete => self.incomplete,
            TestStatus::NotRun => self.not_run,
        }
    }
}

/// The result of aggregating a test results artifact.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TestResults {
    /// One entry per run, in artifact order.
    pub runs: Vec<TestRun>,

    /// Totals across all runs.
    pub stats: TestStatistics,
}

impl TestResults {
    /// Iterates over all test files, runs flattened in order.
    pub fn files(&self) -> impl Iterator<Item = &TestFile> + '_ {
        self.runs.iter().flat_map(|run| run.files.iter())
    }
}
