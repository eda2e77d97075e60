// Copyright (c) The ci-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Build task summaries: one row per task reported by the build tool, with no aggregation.

use crate::{
    artifact::ArtifactKind,
    config::BuildSummaryConfig,
    errors::ArtifactParseError,
    helpers::escape_html,
    reporter::skip_reason_text,
    sink::TableCell,
};
use serde::{Deserialize, Deserializer, de::Visitor};
use std::fmt;

/// A build task, as reported by the build tool.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildTask {
    /// The name of the task.
    pub name: String,

    /// A description of the task.
    #[serde(default)]
    pub description: String,

    /// The time taken by the task, for display. Typically `HH:mm:ss`.
    #[serde(default, deserialize_with = "deserialize_display_duration")]
    pub duration: String,

    /// Whether the task failed.
    #[serde(default)]
    pub failed: bool,

    /// Whether the task was skipped.
    #[serde(default)]
    pub skipped: bool,

    /// Why the task was skipped, if it was.
    #[serde(default)]
    pub skip_reason: Option<String>,
}

/// Parses the contents of a build summary artifact.
pub fn parse_build_artifact(contents: &str) -> Result<Vec<BuildTask>, ArtifactParseError> {
    let mut deserializer = serde_json::Deserializer::from_str(contents);
    let tasks = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|error| ArtifactParseError::new(ArtifactKind::BuildSummary, error))?;
    deserializer
        .end()
        .map_err(|error| ArtifactParseError::trailing(ArtifactKind::BuildSummary, error))?;
    Ok(tasks)
}

/// The outcome of a build task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildTaskStatus {
    /// The task failed.
    Failed,

    /// The task was skipped.
    Skipped {
        /// Display text for the skip reason.
        reason_text: String,
    },

    /// The task ran successfully.
    Successful,
}

impl fmt::Display for BuildTaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildTaskStatus::Failed => write!(f, "🔴 Failed"),
            BuildTaskStatus::Skipped { reason_text } => write!(f, "🔵 Skipped ({reason_text})"),
            BuildTaskStatus::Successful => write!(f, "🟢 Successful"),
        }
    }
}

/// A row of the build summary table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildTaskRow {
    /// The name of the task.
    pub name: String,

    /// The outcome of the task.
    pub status: BuildTaskStatus,

    /// A description of the task.
    pub description: String,

    /// The time taken by the task, for display.
    pub duration: String,
}

/// Converts build tasks into rows, one per task, in order.
///
/// A failed task is reported as failed even if it's also marked as skipped.
pub fn build_summary_rows(tasks: impl IntoIterator<Item = BuildTask>) -> Vec<BuildTaskRow> {
    tasks
        .into_iter()
        .map(|task| {
            let status = if task.failed {
                BuildTaskStatus::Failed
            } else if task.skipped {
                let reason = task.skip_reason.as_deref().unwrap_or_default();
                BuildTaskStatus::Skipped {
                    reason_text: skip_reason_text(reason).to_owned(),
                }
            } else {
                BuildTaskStatus::Successful
            };
            BuildTaskRow {
                name: task.name,
                status,
                description: task.description,
                duration: task.duration,
            }
        })
        .collect()
}

/// Lays out build task rows as a table, with a header row taken from `config`.
pub fn build_summary_table(
    rows: &[BuildTaskRow],
    config: &BuildSummaryConfig,
) -> Vec<Vec<TableCell>> {
    let header = vec![
        TableCell::header(escape_html(&config.task_header)),
        TableCell::header(escape_html(&config.status_header)),
        TableCell::header(escape_html(&config.description_header)),
        TableCell::header(escape_html(&config.duration_header)),
    ];

    std::iter::once(header)
        .chain(rows.iter().map(|row| {
            vec![
                TableCell::data(escape_html(&row.name)),
                TableCell::data(escape_html(&row.status.to_string())),
                TableCell::data(escape_html(&row.description)),
                TableCell::data(escape_html(&row.duration)),
            ]
        }))
        .collect()
}

/// Accepts either a string or a number, and returns it as display text.
fn deserialize_display_duration<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct DurationVisitor;

    impl Visitor<'_> for DurationVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a duration string or number")
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.to_owned())
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(DurationVisitor)
}
