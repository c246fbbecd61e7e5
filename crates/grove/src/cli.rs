// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing with clap derive.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::SuiteConfig;

/// Run behavior-driven spec suites, optionally across parallel workers
#[derive(Parser)]
#[command(name = "grove")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose logging (same as GROVE_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a suite command, passing settings through GROVE_* variables
    Run(RunArgs),
    /// Show how a spec list is split across workers
    Partition(PartitionArgs),
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Number of parallel workers
    #[arg(short = 'n', long, default_value_t = 1, value_name = "N")]
    pub nodes: usize,

    /// Random seed for spec ordering
    #[arg(long)]
    pub seed: Option<u64>,

    /// Only run specs matching this regex
    #[arg(long, value_name = "REGEX")]
    pub focus: Option<String>,

    /// Skip specs matching this regex
    #[arg(long, value_name = "REGEX")]
    pub skip: Option<String>,

    /// Shuffle every spec, not only top-level containers
    #[arg(long)]
    pub randomize_all: bool,

    /// Fail the suite when pending specs exist
    #[arg(long)]
    pub fail_on_pending: bool,

    /// Skip measurement specs
    #[arg(long)]
    pub skip_measurements: bool,

    /// Timeout for async bodies, in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Write a JSON report to this path
    #[arg(long, value_name = "PATH")]
    pub json_report: Option<PathBuf>,

    /// Disable color output
    #[arg(long)]
    pub no_color: bool,

    /// Stream spec output instead of showing it only on failure
    #[arg(long)]
    pub stream: bool,

    /// Suite command to run
    #[arg(last = true, required = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl RunArgs {
    /// Overlay the flags that were given on `config`.
    pub fn apply(&self, config: &mut SuiteConfig) {
        if let Some(seed) = self.seed {
            config.random_seed = seed;
        }
        if let Some(focus) = &self.focus {
            config.focus = Some(focus.clone());
        }
        if let Some(skip) = &self.skip {
            config.skip = Some(skip.clone());
        }
        if let Some(timeout) = self.timeout_ms {
            config.default_timeout_ms = timeout;
        }
        if let Some(path) = &self.json_report {
            config.json_report = Some(path.clone());
        }
        config.randomize_all_specs |= self.randomize_all;
        config.fail_on_pending |= self.fail_on_pending;
        config.skip_measurements |= self.skip_measurements;
        config.no_color |= self.no_color;
        config.stream_output |= self.stream;
        config.parallel_node = 1;
        config.parallel_total = self.nodes;
    }
}

#[derive(clap::Args)]
pub struct PartitionArgs {
    /// Number of specs in the list
    #[arg(long, value_name = "N")]
    pub specs: usize,

    /// Number of workers
    #[arg(short = 'n', long, value_name = "N")]
    pub nodes: usize,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
