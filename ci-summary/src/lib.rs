// Copyright (c) The ci-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Writes summaries of test and build results to a CI job summary page.
//!
//! The functionality lives in [`ci_summary_core`]; this crate provides the command-line
//! interface, logging and exit codes.

#![warn(missing_docs)]

mod dispatch;
mod errors;
pub mod exit_codes;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::{OutputContext, OutputWriter, StderrStyles};
