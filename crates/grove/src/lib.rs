// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Grove: a behavior-driven spec tree runner.
//!
//! Declare nested containers, hooks, and specs on a [`Suite`], then run it.
//! Specs are collated depth-first, shuffled by seed, filtered by focus and
//! skip rules, and optionally split across parallel worker processes that
//! coordinate over HTTP.

pub mod benchmark;
pub mod cli;
pub mod code_location;
pub mod collection;
pub mod color;
pub mod config;
pub mod discovery;
pub mod error;
pub mod failer;
pub mod leaf;
pub mod output;
pub mod parallel;
pub mod partition;
pub mod reporters;
pub mod runner;
pub mod spec;
pub mod suite;
pub mod suite_node;
pub mod table;
pub mod tree;
pub mod types;

#[cfg(test)]
pub mod test_utils;

pub use benchmark::Benchmarker;
pub use code_location::CodeLocation;
pub use config::SuiteConfig;
pub use error::{Error, Result};
pub use failer::Failer;
pub use leaf::Done;
pub use output::{BufferInterceptor, OutputInterceptor, SpecWriter};
pub use reporters::Reporter;
pub use suite::Suite;
pub use table::Entry;
pub use types::{FlagType, NodeType, SpecState};
