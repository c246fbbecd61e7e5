// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Coordination between parallel worker processes.
//!
//! Worker 1's host process runs a [`Server`]; every worker talks to it with a
//! [`Client`]. The server shares the synchronized before-suite result, gates
//! the after-suite hook on the other workers exiting, and fans forwarded
//! reporter callbacks out to the host's reporters.

mod client;
mod server;

pub use client::Client;
pub use server::Server;

use serde::{Deserialize, Serialize};

use crate::config::SuiteConfig;
use crate::types::SuiteSummary;

/// Endpoint paths.
pub mod endpoint {
    pub const BEFORE_SUITE_STATE: &str = "/BeforeSuiteState";
    pub const AFTER_SUITE_CAN_RUN: &str = "/AfterSuiteCanRun";
    pub const SPEC_SUITE_WILL_BEGIN: &str = "/SpecSuiteWillBegin";
    pub const BEFORE_SUITE_DID_RUN: &str = "/BeforeSuiteDidRun";
    pub const SPEC_WILL_RUN: &str = "/SpecWillRun";
    pub const SPEC_DID_COMPLETE: &str = "/SpecDidComplete";
    pub const AFTER_SUITE_DID_RUN: &str = "/AfterSuiteDidRun";
    pub const SPEC_SUITE_DID_END: &str = "/SpecSuiteDidEnd";
}

/// Progress of worker 1's synchronized before-suite hook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeforeSuiteState {
    #[default]
    Pending,
    Passed,
    Failed,
    /// Worker 1 exited before reporting a result.
    Disappeared,
}

/// Body of `GET`/`POST /BeforeSuiteState`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteBeforeSuiteData {
    pub data: Vec<u8>,
    pub state: BeforeSuiteState,
}

/// Body of `GET /AfterSuiteCanRun`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAfterSuiteData {
    pub can_run: bool,
}

/// Body of `POST /SpecSuiteWillBegin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteWillBegin {
    pub config: SuiteConfig,
    pub summary: SuiteSummary,
}
