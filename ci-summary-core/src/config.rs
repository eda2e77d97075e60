// Copyright (c) The ci-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for ci-summary.
//!
//! The default configuration is embedded in the binary. A config file passed in by the user is
//! layered on top of it, key by key: any key the user file doesn't set keeps its default value.

use crate::errors::ConfigParseError;
use camino::Utf8Path;
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Resolved ci-summary configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryConfig {
    /// Settings for the test results summary.
    pub test_results: TestResultsConfig,

    /// Settings for the build summary.
    pub build_summary: BuildSummaryConfig,
}

/// Settings for the test results summary.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestResultsConfig {
    /// Prefix of the artifact file name, before the run ID.
    pub artifact_prefix: String,

    /// Title of the top-level heading.
    pub title: String,

    /// Documentation link shown next to the top-level heading.
    pub help_link: String,

    /// Heading shown above the detail table.
    pub details_heading: String,
}

/// Settings for the build summary.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildSummaryConfig {
    /// Prefix of the artifact file name, before the run ID.
    pub artifact_prefix: String,

    /// Title of the top-level heading.
    pub title: String,

    /// Header of the task name column.
    pub task_header: String,

    /// Header of the status column.
    pub status_header: String,

    /// Header of the description column.
    pub description_header: String,

    /// Header of the duration column.
    pub duration_header: String,
}

impl SummaryConfig {
    /// The embedded default config.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Returns the embedded default configuration.
    ///
    /// Panics if the embedded TOML is invalid or contains unknown keys.
    pub fn from_embedded() -> Self {
        let deserializer = toml::Deserializer::parse(Self::DEFAULT_CONFIG)
            .expect("embedded default config should parse");
        let mut unknown = BTreeSet::new();
        let config: DefaultConfig =
            serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
                unknown.insert(path.to_string());
            })
            .expect("embedded default config should be valid");

        // The default config is shipped with this binary, so unknown keys are a bug.
        if !unknown.is_empty() {
            panic!(
                "found unknown keys in default config: {}",
                unknown.into_iter().collect::<Vec<_>>().join(", ")
            );
        }

        Self {
            test_results: config.test_results,
            build_summary: config.build_summary,
        }
    }

    /// Loads configuration, layering the config file at `config_file` (if any) on top of the
    /// embedded defaults.
    ///
    /// Unknown keys in the config file are logged as warnings. A config file that was passed in
    /// but doesn't exist is an error.
    pub fn load(config_file: Option<&Utf8Path>) -> Result<Self, ConfigParseError> {
        Self::load_with_warnings(config_file, &mut DefaultConfigWarnings)
    }

    fn load_with_warnings(
        config_file: Option<&Utf8Path>,
        warnings: &mut impl ConfigWarnings,
    ) -> Result<Self, ConfigParseError> {
        let mut config = Self::from_embedded();
        let Some(path) = config_file else {
            debug!("config: no config file specified, using defaults");
            return Ok(config);
        };

        debug!("config: loading from {path}");
        let contents = std::fs::read_to_string(path).map_err(|error| ConfigParseError::Read {
            path: path.to_owned(),
            error,
        })?;
        let (overrides, unknown) = OverrideConfig::deserialize_toml(path, &contents)?;
        if !unknown.is_empty() {
            warnings.unknown_config_keys(path, &unknown);
        }

        config.apply(overrides);
        debug!("config: loaded successfully from {path}");
        Ok(config)
    }

    fn apply(&mut self, overrides: OverrideConfig) {
        // Use the destructuring syntax to ensure that all fields are handled.
        let OverrideConfig {
            test_results,
            build_summary,
        } = overrides;

        let OverrideTestResults {
            artifact_prefix,
            title,
            help_link,
            details_heading,
        } = test_results;
        let target = &mut self.test_results;
        override_value(&mut target.artifact_prefix, artifact_prefix);
        override_value(&mut target.title, title);
        override_value(&mut target.help_link, help_link);
        override_value(&mut target.details_heading, details_heading);

        let OverrideBuildSummary {
            artifact_prefix,
            title,
            task_header,
            status_header,
            description_header,
            duration_header,
        } = build_summary;
        let target = &mut self.build_summary;
        override_value(&mut target.artifact_prefix, artifact_prefix);
        override_value(&mut target.title, title);
        override_value(&mut target.task_header, task_header);
        override_value(&mut target.status_header, status_header);
        override_value(&mut target.description_header, description_header);
        override_value(&mut target.duration_header, duration_header);
    }
}

fn override_value(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Handling for warnings produced while loading a config file.
trait ConfigWarnings {
    fn unknown_config_keys(&mut self, config_file: &Utf8Path, unknown: &BTreeSet<String>);
}

/// Logs warnings with `tracing`.
struct DefaultConfigWarnings;

impl ConfigWarnings for DefaultConfigWarnings {
    fn unknown_config_keys(&mut self, config_file: &Utf8Path, unknown: &BTreeSet<String>) {
        let mut unknown_str = String::new();
        if let [key] = unknown.iter().collect::<Vec<_>>().as_slice() {
            // Print this on the same line.
            unknown_str.push_str("key: ");
            unknown_str.push_str(key);
        } else {
            unknown_str.push_str("keys:\n");
            for ignored_key in unknown {
                unknown_str.push('\n');
                unknown_str.push_str("  - ");
                unknown_str.push_str(ignored_key);
            }
        }

        warn!("in config file {config_file}, ignoring unknown configuration {unknown_str}");
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DefaultConfig {
    test_results: TestResultsConfig,
    build_summary: BuildSummaryConfig,
}

/// A user config file: every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct OverrideConfig {
    #[serde(default)]
    test_results: OverrideTestResults,
    #[serde(default)]
    build_summary: OverrideBuildSummary,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct OverrideTestResults {
    artifact_prefix: Option<String>,
    title: Option<String>,
    help_link: Option<String>,
    details_heading: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct OverrideBuildSummary {
    artifact_prefix: Option<String>,
    title: Option<String>,
    task_header: Option<String>,
    status_header: Option<String>,
    description_header: Option<String>,
    duration_header: Option<String>,
}

impl OverrideConfig {
    /// Deserializes TOML content and returns the config along with any unknown keys.
    fn deserialize_toml(
        path: &Utf8Path,
        contents: &str,
    ) -> Result<(Self, BTreeSet<String>), ConfigParseError> {
        let deserializer =
            toml::Deserializer::parse(contents).map_err(|error| ConfigParseError::Parse {
                path: path.to_owned(),
                error,
            })?;

        let mut unknown = BTreeSet::new();
        let mut cb = |ignored: serde_ignored::Path| {
            unknown.insert(ignored.to_string());
        };
        let ignored_de = serde_ignored::Deserializer::new(deserializer, &mut cb);
        let config = serde_path_to_error::deserialize(ignored_de).map_err(|error| {
            ConfigParseError::Deserialize {
                path: path.to_owned(),
                error: Box::new(error),
            }
        })?;

        Ok((config, unknown))
    }
}
