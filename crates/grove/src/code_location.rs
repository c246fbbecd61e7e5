// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Source positions attached to nodes and failures.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::panic::Location;

use serde::{Deserialize, Serialize};

/// Where a node was declared or a failure happened.
///
/// Created once when a node is constructed and never mutated. The stack
/// trace is only populated when backtraces are enabled (`RUST_BACKTRACE`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeLocation {
    pub file_name: String,
    pub line_number: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub full_stack_trace: String,
}

impl CodeLocation {
    pub fn new(file_name: impl Into<String>, line_number: u32) -> Self {
        Self {
            file_name: file_name.into(),
            line_number,
            full_stack_trace: String::new(),
        }
    }

    /// Location of the caller, propagated through `#[track_caller]` frames.
    #[track_caller]
    pub fn caller() -> Self {
        Self::from_location(Location::caller())
    }

    pub fn from_location(location: &Location<'_>) -> Self {
        Self {
            file_name: location.file().to_string(),
            line_number: location.line(),
            full_stack_trace: captured_backtrace(),
        }
    }

    /// True for the default, never-assigned location.
    pub fn is_unknown(&self) -> bool {
        self.file_name.is_empty()
    }
}

impl fmt::Display for CodeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            write!(f, "<unknown>")
        } else {
            write!(f, "{}:{}", self.file_name, self.line_number)
        }
    }
}

pub(crate) fn captured_backtrace() -> String {
    let backtrace = Backtrace::capture();
    match backtrace.status() {
        BacktraceStatus::Captured => backtrace.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
#[path = "code_location_tests.rs"]
mod tests;
