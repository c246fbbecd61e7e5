// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Suite run configuration.
//!
//! Layers, lowest first: built-in defaults, `grove.toml`, `GROVE_*`
//! environment variables.

pub mod defaults;
pub mod env;

use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::discovery;
use crate::error::{Error, Result};
use crate::partition;

/// Settings for one suite run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    /// Seed for shuffling; the same seed reproduces the same order.
    pub random_seed: u64,

    /// Shuffle the collated spec list, not only top-level children.
    pub randomize_all_specs: bool,

    /// Only run specs whose description matches.
    pub focus: Option<String>,

    /// Skip specs whose description matches.
    pub skip: Option<String>,

    /// Treat pending specs as a suite failure.
    pub fail_on_pending: bool,

    pub skip_measurements: bool,

    /// One-indexed worker number.
    pub parallel_node: usize,

    pub parallel_total: usize,

    /// Base URL of the coordination server (`http://127.0.0.1:PORT`).
    pub parallel_host: Option<String>,

    /// Timeout for async bodies that do not set their own.
    pub default_timeout_ms: u64,

    pub no_color: bool,

    /// Write spec output straight through instead of buffering it.
    pub stream_output: bool,

    /// Write a JSON report to this path at suite end.
    pub json_report: Option<PathBuf>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            random_seed: defaults::random_seed(),
            randomize_all_specs: false,
            focus: None,
            skip: None,
            fail_on_pending: false,
            skip_measurements: false,
            parallel_node: 1,
            parallel_total: 1,
            parallel_host: None,
            default_timeout_ms: defaults::TIMEOUT_MS,
            no_color: false,
            stream_output: false,
            json_report: None,
        }
    }
}

/// Compiled focus and skip filters.
#[derive(Debug, Default)]
pub struct Filters {
    pub focus: Option<Regex>,
    pub skip: Option<Regex>,
}

impl SuiteConfig {
    /// Defaults, then the nearest `grove.toml`, then the process environment.
    pub fn load(start_dir: &Path) -> Result<Self> {
        Self::load_with(start_dir, &|var| std::env::var(var).ok())
    }

    /// [`SuiteConfig::load`] with an explicit environment lookup.
    pub fn load_with(start_dir: &Path, lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match discovery::find_config(start_dir) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::from_file(&path)?
            }
            None => Self::default(),
        };
        config.apply_env(lookup)?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_env(&mut self, lookup: &dyn Fn(&str) -> Option<String>) -> Result<()> {
        env::apply(self, lookup)
    }

    /// Variables that reproduce this config in a child process.
    pub fn to_env(&self) -> Vec<(String, String)> {
        env::export(self)
    }

    /// Reject unusable settings and compile the filters.
    pub fn validate(&self) -> Result<Filters> {
        partition::validate(self.parallel_total, self.parallel_node)?;
        Ok(Filters {
            focus: compile("focus", self.focus.as_deref())?,
            skip: compile("skip", self.skip.as_deref())?,
        })
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel_total > 1
    }
}

fn compile(which: &'static str, pattern: Option<&str>) -> Result<Option<Regex>> {
    match pattern.filter(|p| !p.is_empty()) {
        Some(pattern) => Regex::new(pattern)
            .map(Some)
            .map_err(|source| Error::InvalidRegex {
                which,
                pattern: pattern.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
