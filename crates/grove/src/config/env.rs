// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `GROVE_*` environment overrides.
//!
//! Parallel workers receive their settings this way from `grove run`.

use std::path::PathBuf;
use std::str::FromStr;

use super::SuiteConfig;
use crate::error::{Error, Result};

pub const SEED: &str = "GROVE_SEED";
pub const RANDOMIZE_ALL: &str = "GROVE_RANDOMIZE_ALL";
pub const FOCUS: &str = "GROVE_FOCUS";
pub const SKIP: &str = "GROVE_SKIP";
pub const FAIL_ON_PENDING: &str = "GROVE_FAIL_ON_PENDING";
pub const SKIP_MEASUREMENTS: &str = "GROVE_SKIP_MEASUREMENTS";
pub const PARALLEL_NODE: &str = "GROVE_PARALLEL_NODE";
pub const PARALLEL_TOTAL: &str = "GROVE_PARALLEL_TOTAL";
pub const PARALLEL_HOST: &str = "GROVE_PARALLEL_HOST";
pub const TIMEOUT_MS: &str = "GROVE_TIMEOUT_MS";
pub const NO_COLOR: &str = "GROVE_NO_COLOR";
pub const STREAM: &str = "GROVE_STREAM";
pub const JSON_REPORT: &str = "GROVE_JSON_REPORT";

/// Apply every variable `lookup` knows about.
pub(super) fn apply(config: &mut SuiteConfig, lookup: &dyn Fn(&str) -> Option<String>) -> Result<()> {
    if let Some(seed) = parsed(lookup, SEED)? {
        config.random_seed = seed;
    }
    if let Some(value) = flag(lookup, RANDOMIZE_ALL)? {
        config.randomize_all_specs = value;
    }
    if let Some(focus) = non_empty(lookup, FOCUS) {
        config.focus = Some(focus);
    }
    if let Some(skip) = non_empty(lookup, SKIP) {
        config.skip = Some(skip);
    }
    if let Some(value) = flag(lookup, FAIL_ON_PENDING)? {
        config.fail_on_pending = value;
    }
    if let Some(value) = flag(lookup, SKIP_MEASUREMENTS)? {
        config.skip_measurements = value;
    }
    if let Some(node) = parsed(lookup, PARALLEL_NODE)? {
        config.parallel_node = node;
    }
    if let Some(total) = parsed(lookup, PARALLEL_TOTAL)? {
        config.parallel_total = total;
    }
    if let Some(host) = non_empty(lookup, PARALLEL_HOST) {
        config.parallel_host = Some(host);
    }
    if let Some(timeout) = parsed(lookup, TIMEOUT_MS)? {
        config.default_timeout_ms = timeout;
    }
    if let Some(value) = flag(lookup, NO_COLOR)? {
        config.no_color = value;
    }
    if let Some(value) = flag(lookup, STREAM)? {
        config.stream_output = value;
    }
    if let Some(path) = non_empty(lookup, JSON_REPORT) {
        config.json_report = Some(PathBuf::from(path));
    }
    Ok(())
}

/// Render `config` as variables for a child process.
pub(super) fn export(config: &SuiteConfig) -> Vec<(String, String)> {
    let mut vars = vec![
        (SEED, config.random_seed.to_string()),
        (RANDOMIZE_ALL, config.randomize_all_specs.to_string()),
        (FAIL_ON_PENDING, config.fail_on_pending.to_string()),
        (SKIP_MEASUREMENTS, config.skip_measurements.to_string()),
        (PARALLEL_NODE, config.parallel_node.to_string()),
        (PARALLEL_TOTAL, config.parallel_total.to_string()),
        (TIMEOUT_MS, config.default_timeout_ms.to_string()),
        (NO_COLOR, config.no_color.to_string()),
        (STREAM, config.stream_output.to_string()),
    ];
    if let Some(focus) = &config.focus {
        vars.push((FOCUS, focus.clone()));
    }
    if let Some(skip) = &config.skip {
        vars.push((SKIP, skip.clone()));
    }
    if let Some(host) = &config.parallel_host {
        vars.push((PARALLEL_HOST, host.clone()));
    }
    if let Some(path) = &config.json_report {
        vars.push((JSON_REPORT, path.display().to_string()));
    }
    vars.into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

fn non_empty(lookup: &dyn Fn(&str) -> Option<String>, var: &str) -> Option<String> {
    lookup(var).filter(|value| !value.is_empty())
}

fn parsed<T: FromStr>(lookup: &dyn Fn(&str) -> Option<String>, var: &str) -> Result<Option<T>> {
    match non_empty(lookup, var) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidEnv {
                var: var.to_string(),
                value,
            }),
        None => Ok(None),
    }
}

fn flag(lookup: &dyn Fn(&str) -> Option<String>, var: &str) -> Result<Option<bool>> {
    match non_empty(lookup, var) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::InvalidEnv {
                var: var.to_string(),
                value,
            }),
        },
        None => Ok(None),
    }
}
