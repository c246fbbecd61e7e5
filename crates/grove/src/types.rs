// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared enums, failure records, and report summaries.
//!
//! Summaries are snapshots handed to reporters; reporters only read them.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::code_location::CodeLocation;

/// The kind of node a body or container was declared as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    #[default]
    Invalid,
    Container,
    It,
    Measure,
    BeforeEach,
    JustBeforeEach,
    AfterEach,
    BeforeSuite,
    AfterSuite,
    SynchronizedBeforeSuite,
    SynchronizedAfterSuite,
}

impl NodeType {
    pub fn is_subject(self) -> bool {
        matches!(self, Self::It | Self::Measure)
    }

    pub fn is_suite_level(self) -> bool {
        matches!(
            self,
            Self::BeforeSuite
                | Self::AfterSuite
                | Self::SynchronizedBeforeSuite
                | Self::SynchronizedAfterSuite
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Invalid => "Invalid",
            Self::Container => "Container",
            Self::It => "It",
            Self::Measure => "Measure",
            Self::BeforeEach => "BeforeEach",
            Self::JustBeforeEach => "JustBeforeEach",
            Self::AfterEach => "AfterEach",
            Self::BeforeSuite => "BeforeSuite",
            Self::AfterSuite => "AfterSuite",
            Self::SynchronizedBeforeSuite => "SynchronizedBeforeSuite",
            Self::SynchronizedAfterSuite => "SynchronizedAfterSuite",
        };
        f.write_str(name)
    }
}

/// Programmatic marker attached at declaration time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagType {
    #[default]
    None,
    Focused,
    Pending,
}

/// Outcome of a node or spec.
///
/// `Invalid` means "not yet assigned".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecState {
    #[default]
    Invalid,
    Pending,
    Skipped,
    Passed,
    Failed,
    Panicked,
    TimedOut,
}

impl SpecState {
    /// Failed, panicked, and timed out all count as failures.
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::Panicked | Self::TimedOut)
    }
}

impl fmt::Display for SpecState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Invalid => "invalid",
            Self::Pending => "pending",
            Self::Skipped => "skipped",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Panicked => "panicked",
            Self::TimedOut => "timed out",
        };
        f.write_str(name)
    }
}

/// One failure, panic, timeout, or runtime skip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    pub message: String,
    pub location: CodeLocation,
    /// Rendered panic payload, for panics only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forwarded_panic: Option<String>,
    /// Depth of the container the failing node belongs to.
    /// `None` when the node sits outside every container (suite-level hooks).
    pub node_index: Option<usize>,
    pub node_type: NodeType,
    /// Where the failing node itself was declared.
    pub node_location: CodeLocation,
}

/// Aggregated statistics for one named measurement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    pub results: Vec<f64>,
    pub smallest: f64,
    pub largest: f64,
    pub average: f64,
    pub std_deviation: f64,
    pub smallest_label: String,
    pub largest_label: String,
    pub average_label: String,
    pub units: String,
}

/// Counts for a whole suite, sent at the start and end of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuiteSummary {
    pub suite_description: String,
    pub suite_succeeded: bool,
    pub suite_id: String,
    pub number_of_specs_before_parallelization: usize,
    pub number_of_total_specs: usize,
    pub number_of_specs_that_will_be_run: usize,
    pub number_of_pending_specs: usize,
    pub number_of_skipped_specs: usize,
    pub number_of_passed_specs: usize,
    pub number_of_failed_specs: usize,
    pub run_time: Duration,
}

/// Snapshot of one spec.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecSummary {
    /// Container texts outer to inner, then the subject's text.
    pub component_texts: Vec<String>,
    pub component_code_locations: Vec<CodeLocation>,
    pub state: SpecState,
    pub run_time: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub captured_output: String,
    pub is_measurement: bool,
    pub number_of_samples: usize,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub measurements: BTreeMap<String, Measurement>,
    pub suite_id: String,
}

impl SpecSummary {
    /// Component texts joined with spaces.
    pub fn full_text(&self) -> String {
        self.component_texts.join(" ")
    }
}

/// Snapshot of a suite-level hook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetupSummary {
    pub node_type: NodeType,
    pub code_location: CodeLocation,
    pub state: SpecState,
    pub run_time: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub captured_output: String,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
