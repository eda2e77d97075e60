// Copyright (c) The ci-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;

/// Rounds a duration in seconds to two decimal places, with ties rounded away from zero.
///
/// NaN and infinities are passed through unchanged.
pub(crate) fn round_hundredths(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}

/// Displays a number of seconds with exactly two decimal places.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DisplaySecs(pub(crate) f64);

impl fmt::Display for DisplaySecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Computes the path of `file_name` within `base_folder`, relative to `workspace`.
///
/// If `base_folder` can't be expressed relative to `workspace` (e.g. one is relative and the
/// other absolute), `base_folder` is used as is. An empty `file_name` yields the folder itself.
pub(crate) fn workspace_relative_path(
    workspace: &Utf8Path,
    base_folder: &Utf8Path,
    file_name: &str,
) -> Utf8PathBuf {
    let rel_base = pathdiff::diff_utf8_paths(base_folder, workspace)
        .unwrap_or_else(|| base_folder.to_owned());
    if file_name.is_empty() {
        rel_base
    } else {
        rel_base.join(file_name)
    }
}

/// Converts a path to the form shown in summaries: always `/`-separated, regardless of host.
pub(crate) fn display_path(path: &Utf8Path) -> String {
    path.as_str().replace('\\', "/")
}

/// Escapes text for inclusion in HTML element content or a double-quoted attribute value.
pub(crate) fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0.1, 0.1 ; "already rounded")]
    #[test_case(0.1123, 0.11 ; "rounds down")]
    #[test_case(0.108, 0.11 ; "rounds up")]
    #[test_case(0.125, 0.13 ; "exact tie rounds away from zero")]
    #[test_case(0.004, 0.0 ; "rounds to zero")]
    #[test_case(12.3456, 12.35 ; "larger value")]
    fn round_hundredths_cases(input: f64, expected: f64) {
        assert_eq!(round_hundredths(input), expected);
    }

    #[test]
    fn round_hundredths_propagates_nan() {
        assert!(round_hundredths(f64::NAN).is_nan());
    }

    #[test_case(0.0, "0.00")]
    #[test_case(1.83, "1.83")]
    #[test_case(0.1 + 0.2, "0.30")]
    #[test_case(12.0, "12.00")]
    fn display_secs(input: f64, expected: &str) {
        assert_eq!(DisplaySecs(input).to_string(), expected);
    }

    #[test_case(
        "/home/user/workspace",
        "/home/user/workspace/visualization/tests",
        "TestExamples1",
        "visualization/tests/TestExamples1"
        ; "nested in workspace"
    )]
    #[test_case(
        "/home/user/workspace",
        "/home/user/workspace",
        "TestExamples1",
        "TestExamples1"
        ; "workspace root"
    )]
    #[test_case(
        "/home/user/workspace",
        "/home/user/other/tests",
        "TestExamples1",
        "../other/tests/TestExamples1"
        ; "outside workspace"
    )]
    #[test_case(
        "/home/user/workspace",
        "relative/tests",
        "TestExamples1",
        "relative/tests/TestExamples1"
        ; "no relative path"
    )]
    #[test_case(
        "/home/user/workspace",
        "/home/user/workspace/tests",
        "",
        "tests"
        ; "empty file name"
    )]
    fn workspace_relative(workspace: &str, base_folder: &str, file_name: &str, expected: &str) {
        let actual = workspace_relative_path(
            Utf8Path::new(workspace),
            Utf8Path::new(base_folder),
            file_name,
        );
        assert_eq!(actual, expected);
    }

    #[test]
    fn display_path_normalizes_backslashes() {
        assert_eq!(
            display_path(Utf8Path::new(r"visualization\tests\TestExamples1")),
            "visualization/tests/TestExamples1"
        );
    }

    #[test]
    fn escape_html_special_characters() {
        assert_eq!(
            escape_html(r#"expected <a> & "b""#),
            "expected &lt;a&gt; &amp; &quot;b&quot;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }
}
