// Copyright (c) The ci-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The aggregated test results model, and rendering it as HTML.

pub mod html;
mod report;
mod status;

pub use report::*;
pub use status::*;
