// Copyright (c) The ci-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The job summary: a buffer of block elements appended to a summary destination.

use crate::errors::SinkWriteError;
use camino::{Utf8Path, Utf8PathBuf};
use std::{fs::OpenOptions, io::Write};
use swrite::{SWrite, swrite};
use tracing::debug;

/// A buffer of block elements (headings, raw markup and tables) making up a job summary.
///
/// Blocks are rendered as they are added. Use [`write`](Self::write) to flush them to a
/// [`SummaryDestination`].
#[derive(Clone, Debug, Default)]
pub struct JobSummary {
    buffer: String,
}

impl JobSummary {
    /// Creates a new, empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a heading. `level` is clamped to `1..=6`.
    pub fn add_heading(&mut self, text: &str, level: u8) -> &mut Self {
        let level = level.clamp(1, 6);
        swrite!(self.buffer, "<h{level}>{text}</h{level}>");
        self.add_eol()
    }

    /// Adds raw markup, optionally followed by a newline.
    pub fn add_raw(&mut self, markup: &str, add_eol: bool) -> &mut Self {
        self.buffer.push_str(markup);
        if add_eol {
            self.add_eol();
        }
        self
    }

    /// Adds a table. Each row is a list of cells; header cells are rendered as `<th>`.
    pub fn add_table(&mut self, rows: &[Vec<TableCell>]) -> &mut Self {
        self.buffer.push_str("<table>");
        for row in rows {
            self.buffer.push_str("<tr>");
            for cell in row {
                let tag = if cell.header { "th" } else { "td" };
                swrite!(self.buffer, "<{tag}>{}</{tag}>", cell.data);
            }
            self.buffer.push_str("</tr>");
        }
        self.buffer.push_str("</table>");
        self.add_eol()
    }

    /// Returns the markup buffered so far.
    pub fn stringify(&self) -> &str {
        &self.buffer
    }

    /// Returns true if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Appends the buffered markup to `dest`, then clears the buffer.
    ///
    /// On error, the buffer is left intact.
    pub fn write(&mut self, dest: &mut dyn SummaryDestination) -> Result<(), SinkWriteError> {
        dest.append(&self.buffer)?;
        self.buffer.clear();
        Ok(())
    }

    fn add_eol(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }
}

/// A cell in a table added with [`JobSummary::add_table`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableCell {
    /// The contents of the cell, as markup.
    pub data: String,

    /// Whether this is a header cell.
    pub header: bool,
}

impl TableCell {
    /// Creates a data cell.
    pub fn data(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            header: false,
        }
    }

    /// Creates a header cell.
    pub fn header(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            header: true,
        }
    }
}

/// A destination that job summary markup is appended to.
pub trait SummaryDestination {
    /// Appends `markup` to the destination.
    fn append(&mut self, markup: &str) -> Result<(), SinkWriteError>;
}

impl SummaryDestination for String {
    fn append(&mut self, markup: &str) -> Result<(), SinkWriteError> {
        self.push_str(markup);
        Ok(())
    }
}

/// The step summary file, typically named by the `GITHUB_STEP_SUMMARY` environment variable.
///
/// Markup is appended to the file, which is created if it doesn't exist.
#[derive(Clone, Debug)]
pub struct StepSummaryFile {
    path: Utf8PathBuf,
}

impl StepSummaryFile {
    /// Creates a new `StepSummaryFile` at `path`.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the summary file.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl SummaryDestination for StepSummaryFile {
    fn append(&mut self, markup: &str) -> Result<(), SinkWriteError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|error| SinkWriteError::Open {
                path: self.path.clone(),
                error,
            })?;
        file.write_all(markup.as_bytes())
            .map_err(|error| SinkWriteError::Write {
                path: self.path.clone(),
                error,
            })?;
        debug!("appended {} bytes to {}", markup.len(), self.path);
        Ok(())
    }
}
