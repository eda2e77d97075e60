// Copyright (c) The ci-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Grouping normalized test cases into files and runs.
//!
//! Aggregation is a fold over the sessions of an artifact: each session becomes a [`TestRun`], in
//! which cases are grouped into [`TestFile`]s by `(base folder, file name)`, and every case is
//! recorded in the overall [`TestStatistics`]. Files are never shared across runs, so the same file
//! appearing in two sessions produces two entries.

use crate::{
    helpers::workspace_relative_path,
    ingest::{NormalizedCase, RawSession},
    reporter::{TestFile, TestResults, TestRun, TestStatistics},
};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::{IndexMap, map::Entry};

/// Aggregates the sessions of a test results artifact.
///
/// `workspace` is used to compute the display path of each test file.
pub fn aggregate_sessions(
    sessions: impl IntoIterator<Item = RawSession>,
    workspace: &Utf8Path,
) -> TestResults {
    sessions
        .into_iter()
        .fold(TestResults::default(), |mut results, session| {
            let run = RunAggregator::new(workspace)
                .add_cases(
                    session.cases.into_iter().map(|record| record.normalize()),
                    &mut results.stats,
                )
                .finish();
            results.runs.push(run);
            results
        })
}

/// Groups the cases of a single run by file.
#[derive(Debug)]
pub struct RunAggregator<'a> {
    workspace: &'a Utf8Path,
    files: IndexMap<FileKey, TestFile>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct FileKey {
    base_folder: Utf8PathBuf,
    file_name: String,
}

impl<'a> RunAggregator<'a> {
    /// Creates a new aggregator for an empty run.
    pub fn new(workspace: &'a Utf8Path) -> Self {
        Self {
            workspace,
            files: IndexMap::new(),
        }
    }

    /// Adds a normalized case to its file, creating the file if this is the first case seen for it.
    ///
    /// The case is also recorded in `stats`.
    pub fn add_case(&mut self, case: NormalizedCase, stats: &mut TestStatistics) -> &mut Self {
        let NormalizedCase {
            base_folder,
            file_name,
            test_case,
        } = case;

        stats.record(&test_case);

        let key = FileKey {
            base_folder,
            file_name,
        };
        let file = match self.files.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let key = entry.key();
                let path = workspace_relative_path(self.workspace, &key.base_folder, &key.file_name);
                let file = TestFile::new(key.file_name.clone(), path);
                entry.insert(file)
            }
        };
        file.add_test_case(test_case);
        self
    }

    /// Adds several normalized cases, in order.
    pub fn add_cases(
        mut self,
        cases: impl IntoIterator<Item = NormalizedCase>,
        stats: &mut TestStatistics,
    ) -> Self {
        for case in cases {
            self.add_case(case, stats);
        }
        self
    }

    /// Finishes the run, returning files in the order they were first seen.
    pub fn finish(self) -> TestRun {
        TestRun {
            files: self.files.into_values().collect(),
        }
    }
}
