// Copyright (c) The ci-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Top-level application and command routing.

use crate::{
    ExpectedError, Result,
    exit_codes::CiSummaryExitCode,
    output::{OutputContext, OutputOpts, OutputWriter},
};
use camino::{Utf8Path, Utf8PathBuf};
use ci_summary_core::{
    config::SummaryConfig,
    sink::{StepSummaryFile, SummaryDestination},
    summary::{
        BuildSummaryOptions, TestSummaryOptions, process_and_add_build_summary,
        process_and_display_test_summary,
    },
};
use clap::{Args, Subcommand};
use std::io::Write;
use tracing::debug;

/// Writes summaries of test and build results to a CI job summary.
///
/// Arguments default to the environment variables set by GitHub Actions. If no summary file is
/// specified, the summary is printed to stdout.
#[derive(Debug, clap::Parser)]
#[command(
    version,
    styles = crate::output::clap_styles::style(),
    max_term_width = 100,
)]
pub struct CiSummaryApp {
    #[clap(flatten)]
    output: OutputOpts,

    #[clap(subcommand)]
    command: Command,
}

impl CiSummaryApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app.
    ///
    /// Returns the exit code.
    pub fn exec(self, output_writer: &mut OutputWriter) -> Result<i32> {
        match self.command {
            Command::TestResults(opts) => opts.exec(output_writer),
            Command::Build(opts) => opts.exec(output_writer),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Summarize the test results written by the test runner.
    TestResults(TestResultsOpts),
    /// Summarize the build tasks reported by the build tool.
    Build(BuildOpts),
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Summary options")]
struct CommonOpts {
    /// Directory that artifacts are written to
    #[arg(long, env = "RUNNER_TEMP", value_name = "DIR")]
    runner_temp: Utf8PathBuf,

    /// Identifier of the CI run, used to name artifacts
    #[arg(long, env = "GITHUB_RUN_ID", value_name = "ID")]
    run_id: String,

    /// Name of the action, shown in the summary heading
    #[arg(long, env = "GITHUB_ACTION", default_value = "", value_name = "NAME")]
    action_name: String,

    /// File to append the summary to [default: stdout]
    #[arg(long, env = "GITHUB_STEP_SUMMARY", value_name = "PATH")]
    summary_file: Option<Utf8PathBuf>,

    /// Config file to layer on top of the default config
    #[arg(long, env = "CI_SUMMARY_CONFIG_FILE", value_name = "PATH")]
    config_file: Option<Utf8PathBuf>,
}

impl CommonOpts {
    fn load_config(&self) -> Result<SummaryConfig> {
        Ok(SummaryConfig::load(self.config_file.as_deref())?)
    }

    /// Runs `f` against the summary destination: either the summary file, or a buffer that is
    /// printed to stdout once `f` is done.
    fn with_destination(
        &self,
        output_writer: &mut OutputWriter,
        f: impl FnOnce(&mut dyn SummaryDestination),
    ) -> Result<i32> {
        // An empty GITHUB_STEP_SUMMARY means there's no summary file.
        match self.summary_file.as_ref().filter(|path| !path.as_str().is_empty()) {
            Some(path) => {
                let mut dest = StepSummaryFile::new(path.clone());
                debug!("appending summary to {}", dest.path());
                f(&mut dest);
            }
            None => {
                let mut markup = String::new();
                f(&mut markup);
                write_stdout(&markup, output_writer)?;
            }
        }
        Ok(CiSummaryExitCode::OK)
    }
}

#[derive(Debug, Args)]
struct TestResultsOpts {
    #[clap(flatten)]
    common: CommonOpts,

    /// Workspace root; test file paths are shown relative to it
    #[arg(long, env = "GITHUB_WORKSPACE", default_value = ".", value_name = "DIR")]
    workspace: Utf8PathBuf,
}

impl TestResultsOpts {
    fn exec(self, output_writer: &mut OutputWriter) -> Result<i32> {
        let config = self.common.load_config()?;
        let workspace = if self.workspace.is_absolute() {
            self.workspace
        } else {
            resolve_workspace(&current_dir()?, &self.workspace)
        };
        let opts = TestSummaryOptions {
            runner_temp: &self.common.runner_temp,
            run_id: &self.common.run_id,
            workspace: &workspace,
            action_name: &self.common.action_name,
            config: &config.test_results,
        };

        self.common.with_destination(output_writer, |dest| {
            process_and_display_test_summary(&opts, dest)
        })
    }
}

#[derive(Debug, Args)]
struct BuildOpts {
    #[clap(flatten)]
    common: CommonOpts,
}

impl BuildOpts {
    fn exec(self, output_writer: &mut OutputWriter) -> Result<i32> {
        let config = self.common.load_config()?;
        let opts = BuildSummaryOptions {
            runner_temp: &self.common.runner_temp,
            run_id: &self.common.run_id,
            action_name: &self.common.action_name,
            config: &config.build_summary,
        };

        self.common.with_destination(output_writer, |dest| {
            process_and_add_build_summary(&opts, dest)
        })
    }
}

/// Resolves a relative workspace against `cwd`. Base folders in test artifacts are absolute, so
/// the workspace must be too for file paths to be shown relative to it.
fn resolve_workspace(cwd: &Utf8Path, workspace: &Utf8Path) -> Utf8PathBuf {
    if workspace.as_str() == "." {
        cwd.to_owned()
    } else {
        cwd.join(workspace)
    }
}

fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().map_err(|err| ExpectedError::GetCurrentDirFailed { err })?;
    Utf8PathBuf::try_from(cwd).map_err(|err| ExpectedError::CurrentDirInvalidUtf8 { err })
}

fn write_stdout(markup: &str, output_writer: &mut OutputWriter) -> Result<()> {
    let mut writer = output_writer.stdout_writer();
    writer
        .write_all(markup.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|err| ExpectedError::WriteOutputError { err })
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::Utf8TempDir;
    use clap::Parser;

    const TEST_ARTIFACT: &str = r#"[
        { "BaseFolder": "/work/tests", "TestResult": { "Name": "MathTest/testAdd", "Duration": 0.5, "Passed": true } }
    ]"#;

    fn run(args: &[&str]) -> (Result<i32>, Vec<u8>) {
        let app = CiSummaryApp::try_parse_from(args.iter().copied()).expect("arguments are valid");
        let mut output_writer = OutputWriter::Test { stdout: Vec::new() };
        let result = app.exec(&mut output_writer);
        let OutputWriter::Test { stdout } = output_writer else {
            unreachable!("output writer is a test writer");
        };
        (result, stdout)
    }

    #[test]
    fn test_results_to_summary_file() {
        let temp_dir = Utf8TempDir::new().unwrap();
        let artifact = temp_dir.path().join("matlabTestResults7.json");
        std::fs::write(&artifact, TEST_ARTIFACT).unwrap();
        let summary_file = temp_dir.path().join("summary.md");

        let (result, stdout) = run(&[
            "ci-summary",
            "test-results",
            "--runner-temp",
            temp_dir.path().as_str(),
            "--run-id",
            "7",
            "--workspace",
            "/work",
            "--action-name",
            "run-tests",
            "--summary-file",
            summary_file.as_str(),
        ]);
        assert_eq!(result.unwrap(), CiSummaryExitCode::OK);
        assert!(stdout.is_empty());
        assert!(!artifact.exists(), "artifact is deleted");

        let summary = std::fs::read_to_string(&summary_file).unwrap();
        assert!(summary.starts_with("<h1>MATLAB Test Results (run-tests) "));
        assert!(summary.contains(r#"<b title="tests/MathTest">✅ MathTest</b>"#));
    }

    #[test]
    fn build_summary_to_summary_file() {
        let temp_dir = Utf8TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("buildSummary7.json"),
            r#"[{ "name": "test", "description": "Run tests", "duration": "00:00:05", "failed": true, "skipped": false }]"#,
        )
        .unwrap();
        let summary_file = temp_dir.path().join("summary.md");

        let (result, _) = run(&[
            "ci-summary",
            "build",
            "--runner-temp",
            temp_dir.path().as_str(),
            "--run-id",
            "7",
            "--action-name",
            "run-build",
            "--summary-file",
            summary_file.as_str(),
        ]);
        assert_eq!(result.unwrap(), CiSummaryExitCode::OK);

        insta::assert_snapshot!(std::fs::read_to_string(&summary_file).unwrap(), @r"
        <h1>MATLAB Build Results (run-build) </h1>
        <table><tr><th>MATLAB Task</th><th>Status</th><th>Description</th><th>Duration (HH:mm:ss)</th></tr><tr><td>test</td><td>🔴 Failed</td><td>Run tests</td><td>00:00:05</td></tr></table>
        ");
    }

    #[test]
    fn missing_artifact_is_not_an_error() {
        let temp_dir = Utf8TempDir::new().unwrap();
        let summary_file = temp_dir.path().join("summary.md");

        let (result, _) = run(&[
            "ci-summary",
            "test-results",
            "--runner-temp",
            temp_dir.path().as_str(),
            "--run-id",
            "7",
            "--summary-file",
            summary_file.as_str(),
        ]);
        assert_eq!(result.unwrap(), CiSummaryExitCode::OK);
        assert!(!summary_file.exists(), "nothing was written");
    }

    #[test]
    fn config_file_overrides_title() {
        let temp_dir = Utf8TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("matlabTestResults7.json"), TEST_ARTIFACT).unwrap();
        let config_file = temp_dir.path().join("ci-summary.toml");
        std::fs::write(&config_file, "[test-results]\ntitle = \"Unit Tests\"\n").unwrap();
        let summary_file = temp_dir.path().join("summary.md");

        let (result, _) = run(&[
            "ci-summary",
            "test-results",
            "--runner-temp",
            temp_dir.path().as_str(),
            "--run-id",
            "7",
            "--action-name",
            "",
            "--config-file",
            config_file.as_str(),
            "--summary-file",
            summary_file.as_str(),
        ]);
        assert_eq!(result.unwrap(), CiSummaryExitCode::OK);

        let summary = std::fs::read_to_string(&summary_file).unwrap();
        assert!(summary.starts_with("<h1>Unit Tests () "), "summary: {summary}");
    }

    #[test]
    fn invalid_config_file_is_a_setup_error() {
        let temp_dir = Utf8TempDir::new().unwrap();
        let config_file = temp_dir.path().join("missing.toml");

        let (result, _) = run(&[
            "ci-summary",
            "build",
            "--runner-temp",
            temp_dir.path().as_str(),
            "--run-id",
            "7",
            "--config-file",
            config_file.as_str(),
        ]);
        let error = result.unwrap_err();
        assert_eq!(error.process_exit_code(), CiSummaryExitCode::SETUP_ERROR);
    }

    #[test]
    fn relative_workspace_is_resolved_against_cwd() {
        let cwd = Utf8Path::new("/home/runner/work/repo");
        assert_eq!(resolve_workspace(cwd, Utf8Path::new(".")), cwd);
        assert_eq!(
            resolve_workspace(cwd, Utf8Path::new("sub/project")),
            "/home/runner/work/repo/sub/project"
        );
    }

    #[test]
    fn default_workspace_is_current_dir() {
        let temp_dir = Utf8TempDir::new().unwrap();
        let cwd = current_dir().unwrap();
        std::fs::write(
            temp_dir.path().join("matlabTestResults7.json"),
            format!(
                r#"[{{ "BaseFolder": "{}", "TestResult": {{ "Name": "MathTest/testAdd", "Duration": 0.5, "Passed": true }} }}]"#,
                cwd.join("tests").as_str().replace('\\', r"\\")
            ),
        )
        .unwrap();
        let summary_file = temp_dir.path().join("summary.md");

        let (result, _) = run(&[
            "ci-summary",
            "test-results",
            "--runner-temp",
            temp_dir.path().as_str(),
            "--run-id",
            "7",
            "--workspace",
            ".",
            "--summary-file",
            summary_file.as_str(),
        ]);
        assert_eq!(result.unwrap(), CiSummaryExitCode::OK);

        let summary = std::fs::read_to_string(&summary_file).unwrap();
        assert!(
            summary.contains(r#"<b title="tests/MathTest">✅ MathTest</b>"#),
            "summary: {summary}"
        );
    }

    #[test]
    fn stdout_destination() {
        let mut output_writer = OutputWriter::Test { stdout: Vec::new() };
        write_stdout("<h1>Summary</h1>\n", &mut output_writer).unwrap();

        let OutputWriter::Test { stdout } = output_writer else {
            unreachable!("output writer is a test writer");
        };
        assert_eq!(String::from_utf8(stdout).unwrap(), "<h1>Summary</h1>\n");
    }

    #[test]
    fn global_flags_and_unknown_subcommands() {
        let app = CiSummaryApp::try_parse_from([
            "ci-summary",
            "--color",
            "never",
            "--verbose",
            "build",
            "--runner-temp",
            "/tmp",
            "--run-id",
            "1",
        ])
        .expect("arguments are valid");
        assert!(app.output.verbose);

        let error = CiSummaryApp::try_parse_from(["ci-summary", "frobnicate"]).unwrap_err();
        assert_eq!(error.kind(), clap::error::ErrorKind::InvalidSubcommand);
    }
}
