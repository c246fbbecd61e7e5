// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for grove.
//!
//! Spec outcomes (failures, panics, timeouts) are never errors; they are
//! recorded on the spec and surfaced through reporters. These variants
//! cover configuration and parallel-coordination plumbing only.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// `parallel_total` must be at least 1.
    #[error("parallel total must be >= 1, got {total}")]
    InvalidParallelTotal { total: usize },

    /// `parallel_node` is one-indexed and bounded by `parallel_total`.
    #[error("parallel node is one-indexed and must be <= parallel total ({total}), got {node}")]
    InvalidParallelNode { node: usize, total: usize },

    /// A focus or skip filter failed to compile.
    #[error("invalid {which} regex '{pattern}': {source}")]
    InvalidRegex {
        which: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value for {var}: '{value}'")]
    InvalidEnv { var: String, value: String },

    /// Config file could not be read.
    #[error("failed to read {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for a suite config.
    #[error("failed to parse {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The coordination server could not bind a listener.
    #[error("failed to start coordination server: {0}")]
    ServerBind(String),

    /// A request to the coordination server failed in transport.
    #[error("coordination request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    /// The coordination server answered with a non-200 status.
    #[error("coordination server returned status {status} for {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Output interception could not start or stop.
    #[error("output interception failed: {0}")]
    Intercept(String),
}
