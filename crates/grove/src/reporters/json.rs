// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON report written at suite end.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::json;

use super::Reporter;
use crate::config::SuiteConfig;
use crate::types::{SetupSummary, SpecSummary, SuiteSummary};

pub struct JsonReporter {
    path: PathBuf,
    random_seed: u64,
    before_suite: Option<SetupSummary>,
    after_suite: Option<SetupSummary>,
    specs: Vec<SpecSummary>,
}

impl JsonReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            random_seed: 0,
            before_suite: None,
            after_suite: None,
            specs: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render the report for `summary` from what has been collected so far.
    pub fn render(&self, summary: &SuiteSummary) -> serde_json::Result<String> {
        let mut output = serde_json::Map::new();
        output.insert("generated_at".to_string(), json!(Utc::now().to_rfc3339()));
        output.insert("random_seed".to_string(), json!(self.random_seed));
        output.insert("suite".to_string(), serde_json::to_value(summary)?);
        if let Some(before) = &self.before_suite {
            output.insert("before_suite".to_string(), serde_json::to_value(before)?);
        }
        if let Some(after) = &self.after_suite {
            output.insert("after_suite".to_string(), serde_json::to_value(after)?);
        }
        output.insert("specs".to_string(), serde_json::to_value(&self.specs)?);
        serde_json::to_string_pretty(&serde_json::Value::Object(output))
    }
}

impl Reporter for JsonReporter {
    fn spec_suite_will_begin(&mut self, config: &SuiteConfig, _summary: &SuiteSummary) {
        self.random_seed = config.random_seed;
    }

    fn before_suite_did_run(&mut self, summary: &SetupSummary) {
        self.before_suite = Some(summary.clone());
    }

    fn spec_will_run(&mut self, _summary: &SpecSummary) {}

    fn spec_did_complete(&mut self, summary: &SpecSummary) {
        self.specs.push(summary.clone());
    }

    fn after_suite_did_run(&mut self, summary: &SetupSummary) {
        self.after_suite = Some(summary.clone());
    }

    fn spec_suite_did_end(&mut self, summary: &SuiteSummary) {
        let written = self
            .render(summary)
            .map_err(std::io::Error::from)
            .and_then(|report| std::fs::write(&self.path, report));
        match written {
            Ok(()) => tracing::debug!(path = %self.path.display(), "wrote json report"),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to write json report")
            }
        }
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
