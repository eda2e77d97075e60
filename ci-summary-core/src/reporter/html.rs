// Copyright (c) The ci-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering aggregated test results as HTML tables.
//!
//! The output is meant to be embedded in a Markdown job summary, so it never contains blank lines
//! or indentation (either of which would end the HTML block or start a code block). Rendering is
//! deterministic: the same results always produce the same markup.

use super::{Diagnostic, TestCase, TestFile, TestResults, TestStatistics, TestStatus};
use crate::helpers::{DisplaySecs, display_path, escape_html};
use swrite::{SWrite, swrite, swriteln};

static DURATION_HEADER: &str = "Duration(s)";
static DIAGNOSTIC_PRE_STYLE: &str = "font-family: monospace; white-space: pre;";

/// Renders the statistics table: one header row and one row of totals.
pub fn statistics_table(stats: &TestStatistics) -> String {
    // Use the destructuring syntax to ensure that all fields are handled.
    let TestStatistics {
        total,
        passed,
        failed,
        incomplete,
        not_run,
        duration,
    } = *stats;

    let mut out = String::new();
    swriteln!(out, "<table>");
    swriteln!(out, r#"<tr align="center">"#);
    swriteln!(out, "<th>Total tests</th>");
    for status in [
        TestStatus::Passed,
        TestStatus::Failed,
        TestStatus::Incomplete,
        TestStatus::NotRun,
    ] {
        swriteln!(out, "<th>{} {}</th>", status.label(), status.emoji());
    }
    swriteln!(out, "<th>{DURATION_HEADER} ⌛</th>");
    swriteln!(out, "</tr>");
    swriteln!(out, r#"<tr align="center">"#);
    for count in [total, passed, failed, incomplete, not_run] {
        swriteln!(out, "<td>{count}</td>");
    }
    swriteln!(out, "<td>{}</td>", DisplaySecs(duration));
    swriteln!(out, "</tr>");
    swrite!(out, "</table>");
    out
}

/// Renders the detail table: one collapsible row per test file, runs flattened in order.
pub fn detail_table(results: &TestResults) -> String {
    let mut out = String::new();
    swriteln!(out, "<table>");
    swriteln!(out, "<tr>");
    swriteln!(out, "<th>Test File</th>");
    swriteln!(out, "<th>{DURATION_HEADER}</th>");
    swriteln!(out, "</tr>");
    for file in results.files() {
        write_test_file_row(&mut out, file);
    }
    swrite!(out, "</table>");
    out
}

fn write_test_file_row(out: &mut String, file: &TestFile) {
    let TestFile {
        name,
        path,
        test_cases,
        duration,
        status,
    } = file;

    // Files that need attention are expanded by default.
    let open = if *status == TestStatus::Passed {
        ""
    } else {
        " open"
    };

    swriteln!(out, "<tr>");
    swriteln!(out, "<td>");
    swriteln!(out, "<details{open}>");
    swriteln!(
        out,
        r#"<summary><b title="{}">{} {}</b></summary>"#,
        escape_html(&display_path(path)),
        status.emoji(),
        escape_html(name),
    );
    swriteln!(out, "<br>");
    swriteln!(out, "<table>");
    swriteln!(out, "<tr>");
    swriteln!(out, "<th>Test</th>");
    swriteln!(out, "<th>Diagnostics</th>");
    swriteln!(out, "<th>{DURATION_HEADER}</th>");
    swriteln!(out, "</tr>");
    for test_case in test_cases {
        write_test_case_row(out, test_case);
    }
    swriteln!(out, "</table>");
    swriteln!(out, "</details>");
    swriteln!(out, "</td>");
    swriteln!(
        out,
        r#"<td align="center" valign="top"><b>{}</b></td>"#,
        DisplaySecs(*duration)
    );
    swriteln!(out, "</tr>");
}

fn write_test_case_row(out: &mut String, test_case: &TestCase) {
    swrite!(
        out,
        "<tr><td>{} {}</td><td>",
        test_case.status.emoji(),
        escape_html(&test_case.name),
    );
    for diagnostic in &test_case.diagnostics {
        write_diagnostic(out, diagnostic);
    }
    swriteln!(
        out,
        r#"</td><td align="center">{}</td></tr>"#,
        DisplaySecs(test_case.duration)
    );
}

fn write_diagnostic(out: &mut String, diagnostic: &Diagnostic) {
    swrite!(
        out,
        r#"<details><summary>{}</summary><pre style="{DIAGNOSTIC_PRE_STYLE}">{}</pre></details>"#,
        escape_html(&diagnostic.event),
        report_markup(&diagnostic.report),
    );
}

/// Converts the report's line breaks to `<br>` so that it stays on one line of markup, then trims
/// surrounding whitespace.
fn report_markup(report: &str) -> String {
    escape_html(report).replace('\n', "<br>").trim().to_owned()
}
