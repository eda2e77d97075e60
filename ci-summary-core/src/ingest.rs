// Copyright (c) The ci-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing test results artifacts and normalizing raw test cases.
//!
//! A test results artifact is a JSON array with one element per test session. Each element is
//! either a single case record or an array of case records:
//!
//! ```json
//! [
//!   [
//!     {
//!       "BaseFolder": "/home/user/workspace/tests",
//!       "TestResult": {
//!         "Name": "TestExamples1/testNonLeapYear",
//!         "Duration": 0.1,
//!         "Failed": false,
//!         "Incomplete": false,
//!         "Passed": true,
//!         "Details": {}
//!       }
//!     }
//!   ]
//! ]
//! ```
//!
//! Both "one or many" shapes (sessions and diagnostic records) are normalized to `Vec`s while
//! deserializing, so the rest of the pipeline only ever sees sequences.

use crate::{
    artifact::ArtifactKind,
    errors::ArtifactParseError,
    helpers::round_hundredths,
    reporter::{Diagnostic, TestCase, TestStatus},
};
use camino::Utf8PathBuf;
use serde::{
    Deserialize, Deserializer,
    de::{self, MapAccess, SeqAccess, Visitor, value::MapAccessDeserializer},
};
use std::{fmt, marker::PhantomData};
use tracing::warn;

/// Parses the contents of a test results artifact into sessions.
pub fn parse_test_artifact(contents: &str) -> Result<Vec<RawSession>, ArtifactParseError> {
    let mut deserializer = serde_json::Deserializer::from_str(contents);
    let sessions: Vec<RawSession> = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|error| ArtifactParseError::new(ArtifactKind::TestResults, error))?;
    deserializer
        .end()
        .map_err(|error| ArtifactParseError::trailing(ArtifactKind::TestResults, error))?;
    Ok(sessions)
}

/// A single session (run) within a test results artifact.
#[derive(Clone, Debug, Deserialize)]
#[serde(from = "OneOrMany<RawCaseRecord>")]
pub struct RawSession {
    /// The case records in this session, in artifact order.
    pub cases: Vec<RawCaseRecord>,
}

impl From<OneOrMany<RawCaseRecord>> for RawSession {
    fn from(cases: OneOrMany<RawCaseRecord>) -> Self {
        Self {
            cases: cases.into_vec(),
        }
    }
}

/// A test case as reported by the test runner.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawCaseRecord {
    /// The folder containing the test file.
    pub base_folder: Utf8PathBuf,

    /// The result of the test case.
    pub test_result: RawTestResult,
}

/// The result portion of a [`RawCaseRecord`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTestResult {
    /// The composite name, `<file>/<case>`.
    pub name: String,

    /// The time taken, in seconds. `null` is read as NaN.
    #[serde(deserialize_with = "deserialize_duration")]
    pub duration: f64,

    /// Whether the test failed.
    #[serde(default)]
    pub failed: bool,

    /// Whether the test was incomplete.
    #[serde(default)]
    pub incomplete: bool,

    /// Whether the test passed.
    #[serde(default)]
    pub passed: bool,

    /// Extra details about the test.
    #[serde(default)]
    pub details: RawDetails,
}

/// The details portion of a [`RawTestResult`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawDetails {
    /// Diagnostics, present as a single record or a list of records.
    #[serde(default)]
    pub diagnostic_record: Option<OneOrMany<RawDiagnostic>>,
}

/// A diagnostic record as reported by the test runner.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawDiagnostic {
    /// The event that produced the diagnostic.
    pub event: String,

    /// The diagnostic report.
    pub report: String,
}

/// A test case after normalization, along with the key of the file it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedCase {
    /// The folder containing the test file.
    pub base_folder: Utf8PathBuf,

    /// The name of the test file.
    pub file_name: String,

    /// The normalized test case.
    pub test_case: TestCase,
}

impl RawCaseRecord {
    /// Normalizes this record.
    ///
    /// * The composite name is split into file and case names.
    /// * The status is determined from the `Failed`, `Incomplete` and `Passed` flags, in that order.
    /// * Diagnostics are converted to a (possibly empty) list.
    /// * The duration is rounded to two decimal places.
    pub fn normalize(self) -> NormalizedCase {
        let RawCaseRecord {
            base_folder,
            test_result,
        } = self;
        let RawTestResult {
            name,
            duration,
            failed,
            incomplete,
            passed,
            details,
        } = test_result;

        let (file_name, case_name) = match split_composite_name(&name) {
            Some((file_name, case_name)) => (file_name.to_owned(), case_name.to_owned()),
            None => {
                warn!(
                    "test name `{name}` (in {base_folder}) does not have the form \
                     <file>/<case>, treating it as a case name"
                );
                (String::new(), name.clone())
            }
        };

        let diagnostics = details
            .diagnostic_record
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .map(|record| Diagnostic::new(record.event, record.report))
            .collect();

        NormalizedCase {
            base_folder,
            file_name,
            test_case: TestCase {
                name: case_name,
                duration: round_hundredths(duration),
                status: TestStatus::from_flags(failed, incomplete, passed),
                diagnostics,
            },
        }
    }
}

/// Splits a composite test name `<file>/<case>` on the first `/`.
///
/// Returns `None` if there is no separator.
pub fn split_composite_name(name: &str) -> Option<(&str, &str)> {
    name.split_once('/')
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// A value that may be present either on its own or as a list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OneOrMany<T> {
    /// A single value.
    One(T),

    /// A list of values.
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Converts this into a list.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

// This is not an untagged enum: untagged enums buffer their input, which loses the path to the
// element that failed to deserialize.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for OneOrMany<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OneOrManyVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OneOrManyVisitor<T> {
            type Value = OneOrMany<T>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object or a list of objects")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(value) = seq.next_element()? {
                    values.push(value);
                }
                Ok(OneOrMany::Many(values))
            }

            fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                T::deserialize(MapAccessDeserializer::new(map)).map(OneOrMany::One)
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(OneOrMany::Many(Vec::new()))
            }
        }

        deserializer.deserialize_any(OneOrManyVisitor(PhantomData))
    }
}
