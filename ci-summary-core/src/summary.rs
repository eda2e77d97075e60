// Copyright (c) The ci-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end summary operations.
//!
//! These functions are best-effort: a summary is a report about a CI step, not part of it, so
//! failures while reading artifacts or writing the summary are logged and never propagated.

use crate::{
    aggregator::aggregate_sessions,
    artifact::{ArtifactFile, ArtifactKind},
    build::{build_summary_rows, build_summary_table, parse_build_artifact},
    config::{BuildSummaryConfig, TestResultsConfig},
    helpers::escape_html,
    ingest::parse_test_artifact,
    reporter::{TestResults, html},
    sink::{JobSummary, SummaryDestination},
};
use camino::Utf8Path;
use display_error_chain::DisplayErrorChain;
use tracing::{debug, error, warn};

/// Options for the test results summary.
#[derive(Clone, Copy, Debug)]
pub struct TestSummaryOptions<'a> {
    /// The directory the test runner writes artifacts to.
    pub runner_temp: &'a Utf8Path,

    /// The identifier of the current CI run, used to name artifacts.
    pub run_id: &'a str,

    /// The root of the workspace. Test file paths are shown relative to it.
    pub workspace: &'a Utf8Path,

    /// The name of the action shown in the heading.
    pub action_name: &'a str,

    /// Test results settings.
    pub config: &'a TestResultsConfig,
}

/// Options for the build summary.
#[derive(Clone, Copy, Debug)]
pub struct BuildSummaryOptions<'a> {
    /// The directory the build tool writes artifacts to.
    pub runner_temp: &'a Utf8Path,

    /// The identifier of the current CI run, used to name artifacts.
    pub run_id: &'a str,

    /// The name of the action shown in the heading.
    pub action_name: &'a str,

    /// Build summary settings.
    pub config: &'a BuildSummaryConfig,
}

/// Loads and aggregates the test results artifact, then deletes it.
///
/// Returns `None` if there is no artifact. If the artifact can't be read or parsed, the error is
/// logged and empty results are returned.
pub fn load_test_results(opts: &TestSummaryOptions<'_>) -> Option<TestResults> {
    let artifact = ArtifactFile::locate(
        ArtifactKind::TestResults,
        opts.runner_temp,
        &opts.config.artifact_prefix,
        opts.run_id,
    );

    let results = match artifact.read() {
        Ok(None) => None,
        Ok(Some(contents)) => match parse_test_artifact(&contents) {
            Ok(sessions) => Some(aggregate_sessions(sessions, opts.workspace)),
            Err(err) => {
                error!(
                    "error parsing {}: {}",
                    artifact.path(),
                    DisplayErrorChain::new(err)
                );
                Some(TestResults::default())
            }
        },
        Err(err) => {
            error!("{}", DisplayErrorChain::new(err));
            Some(TestResults::default())
        }
    };

    remove_artifact(&artifact);
    results
}

/// Writes the test results summary to `dest`: a heading, the statistics table, a second heading,
/// and the detail table.
pub fn write_test_summary(
    results: &TestResults,
    opts: &TestSummaryOptions<'_>,
    dest: &mut dyn SummaryDestination,
) {
    let config = opts.config;
    let heading = format!(
        "{} ({}) {}",
        escape_html(&config.title),
        escape_html(opts.action_name),
        help_link_markup(&config.help_link),
    );

    let mut summary = JobSummary::new();
    summary
        .add_heading(&heading, 1)
        .add_raw(&html::statistics_table(&results.stats), true)
        .add_heading(&escape_html(&config.details_heading), 3)
        .add_raw(&html::detail_table(results), true);

    match summary.write(dest) {
        Ok(()) => debug!(
            "wrote test results summary ({} tests in {} runs)",
            results.stats.total,
            results.runs.len()
        ),
        Err(err) => error!(
            "error writing test results summary: {}",
            DisplayErrorChain::new(err)
        ),
    }
}

/// Loads the test results artifact and, if there is one, writes the summary to `dest`.
pub fn process_and_display_test_summary(
    opts: &TestSummaryOptions<'_>,
    dest: &mut dyn SummaryDestination,
) {
    match load_test_results(opts) {
        Some(results) => write_test_summary(&results, opts, dest),
        None => debug!("no test results artifact found, skipping test results summary"),
    }
}

/// Loads the build summary artifact, deletes it and, if it could be parsed, writes a table of
/// build tasks to `dest`.
pub fn process_and_add_build_summary(
    opts: &BuildSummaryOptions<'_>,
    dest: &mut dyn SummaryDestination,
) {
    let config = opts.config;
    let artifact = ArtifactFile::locate(
        ArtifactKind::BuildSummary,
        opts.runner_temp,
        &config.artifact_prefix,
        opts.run_id,
    );

    let tasks = match artifact.read() {
        Ok(Some(contents)) => match parse_build_artifact(&contents) {
            Ok(tasks) => Some(tasks),
            Err(err) => {
                error!(
                    "error parsing {}: {}",
                    artifact.path(),
                    DisplayErrorChain::new(err)
                );
                None
            }
        },
        Ok(None) => {
            debug!("no build summary artifact found, skipping build summary");
            None
        }
        Err(err) => {
            error!("{}", DisplayErrorChain::new(err));
            None
        }
    };

    remove_artifact(&artifact);

    let Some(tasks) = tasks else {
        return;
    };
    let rows = build_summary_rows(tasks);
    let heading = format!(
        "{} ({}) ",
        escape_html(&config.title),
        escape_html(opts.action_name)
    );

    let mut summary = JobSummary::new();
    summary
        .add_heading(&heading, 1)
        .add_table(&build_summary_table(&rows, config));

    match summary.write(dest) {
        Ok(()) => debug!("wrote build summary ({} tasks)", rows.len()),
        Err(err) => error!("error writing build summary: {}", DisplayErrorChain::new(err)),
    }
}

fn help_link_markup(link: &str) -> String {
    format!(
        r#"<a href="{}" target="_blank" title="View documentation">ℹ️</a>"#,
        escape_html(link)
    )
}

fn remove_artifact(artifact: &ArtifactFile) {
    if let Err(err) = artifact.remove() {
        warn!("{}", DisplayErrorChain::new(err));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SummaryConfig, errors::SinkWriteError};
    use camino_tempfile::Utf8TempDir;
    use indoc::indoc;

    const RUN_ID: &str = "42";

    struct Fixture {
        temp_dir: Utf8TempDir,
        config: SummaryConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                temp_dir: Utf8TempDir::new().unwrap(),
                config: SummaryConfig::from_embedded(),
            }
        }

        fn test_opts(&self) -> TestSummaryOptions<'_> {
            TestSummaryOptions {
                runner_temp: self.temp_dir.path(),
                run_id: RUN_ID,
                workspace: Utf8Path::new("/home/user/workspace"),
                action_name: "run-tests",
                config: &self.config.test_results,
            }
        }

        fn build_opts(&self) -> BuildSummaryOptions<'_> {
            BuildSummaryOptions {
                runner_temp: self.temp_dir.path(),
                run_id: RUN_ID,
                action_name: "run-build",
                config: &self.config.build_summary,
            }
        }

        fn write_artifact(&self, prefix: &str, contents: &str) -> camino::Utf8PathBuf {
            let path = self.temp_dir.path().join(format!("{prefix}{RUN_ID}.json"));
            std::fs::write(&path, contents).unwrap();
            path
        }
    }

    struct FailingDestination;

    impl SummaryDestination for FailingDestination {
        fn append(&mut self, _markup: &str) -> Result<(), SinkWriteError> {
            Err(SinkWriteError::Write {
                path: "summary.md".into(),
                error: std::io::Error::other("disk full"),
            })
        }
    }

    #[test]
    fn missing_test_artifact_writes_nothing() {
        let fixture = Fixture::new();
        assert_eq!(load_test_results(&fixture.test_opts()), None);

        let mut dest = String::new();
        process_and_display_test_summary(&fixture.test_opts(), &mut dest);
        assert_eq!(dest, "");
    }

    #[test]
    fn test_summary_layout() {
        let fixture = Fixture::new();
        let path = fixture.write_artifact(
            "matlabTestResults",
            indoc! {r#"
                [
                    { "BaseFolder": "/home/user/workspace/tests", "TestResult": { "Name": "T/a", "Duration": 0.125, "Passed": true } }
                ]
            "#},
        );

        let mut dest = String::new();
        process_and_display_test_summary(&fixture.test_opts(), &mut dest);
        assert!(!path.exists(), "artifact is deleted after use");

        let lines: Vec<_> = dest.lines().collect();
        assert_eq!(
            lines[0],
            "<h1>MATLAB Test Results (run-tests) <a href=\"https://github.com/matlab-actions/run-tests/blob/main/README.md#view-test-results\" target=\"_blank\" title=\"View documentation\">ℹ️</a></h1>"
        );
        assert_eq!(lines[1], "<table>");
        assert!(dest.contains("\n<h3>All tests</h3>\n"));
        assert!(dest.contains(r#"<b title="tests/T">✅ T</b>"#));
        assert!(dest.contains(r#"<td align="center">0.13</td>"#));
        assert!(dest.ends_with("</table>\n"));
    }

    #[test]
    fn malformed_test_artifact_produces_empty_summary() {
        let fixture = Fixture::new();
        let path = fixture.write_artifact("matlabTestResults", "{ not json");

        let results = load_test_results(&fixture.test_opts());
        assert_eq!(results, Some(TestResults::default()));
        assert!(!path.exists(), "artifact is deleted even if malformed");
    }

    #[test]
    fn write_failure_is_not_propagated() {
        let fixture = Fixture::new();
        write_test_summary(
            &TestResults::default(),
            &fixture.test_opts(),
            &mut FailingDestination,
        );
    }

    #[test]
    fn build_summary_layout() {
        let fixture = Fixture::new();
        let path = fixture.write_artifact(
            "buildSummary",
            r#"[{ "name": "check", "description": "Check code", "duration": "00:00:02", "failed": false, "skipped": false }]"#,
        );

        let mut dest = String::new();
        process_and_add_build_summary(&fixture.build_opts(), &mut dest);
        assert!(!path.exists(), "artifact is deleted after use");

        insta::assert_snapshot!(dest, @r"
        <h1>MATLAB Build Results (run-build) </h1>
        <table><tr><th>MATLAB Task</th><th>Status</th><th>Description</th><th>Duration (HH:mm:ss)</th></tr><tr><td>check</td><td>🟢 Successful</td><td>Check code</td><td>00:00:02</td></tr></table>
        ");
    }

    #[test]
    fn malformed_build_artifact_writes_nothing() {
        let fixture = Fixture::new();
        let path = fixture.write_artifact("buildSummary", r#"{ "name": "check" }"#);

        let mut dest = String::new();
        process_and_add_build_summary(&fixture.build_opts(), &mut dest);
        assert_eq!(dest, "");
        assert!(!path.exists(), "artifact is deleted even if malformed");
    }

    #[test]
    fn missing_build_artifact_writes_nothing() {
        let fixture = Fixture::new();
        let mut dest = String::new();
        process_and_add_build_summary(&fixture.build_opts(), &mut dest);
        assert_eq!(dest, "");
    }
}
