// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reporter used by parallel workers: every callback is posted to the
//! coordination server, whose own reporters produce the output.

use serde::Serialize;

use super::Reporter;
use crate::config::SuiteConfig;
use crate::parallel::{Client, SuiteWillBegin, endpoint};
use crate::types::{SetupSummary, SpecSummary, SuiteSummary};

pub struct ForwardingReporter {
    client: Client,
}

impl ForwardingReporter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn send<T: Serialize>(&self, path: &str, body: &T) {
        if let Err(err) = self.client.post(path, body) {
            tracing::warn!(host = self.client.host(), path, error = %err, "failed to forward report");
        }
    }
}

impl Reporter for ForwardingReporter {
    fn spec_suite_will_begin(&mut self, config: &SuiteConfig, summary: &SuiteSummary) {
        let body = SuiteWillBegin {
            config: config.clone(),
            summary: summary.clone(),
        };
        self.send(endpoint::SPEC_SUITE_WILL_BEGIN, &body);
    }

    fn before_suite_did_run(&mut self, summary: &SetupSummary) {
        self.send(endpoint::BEFORE_SUITE_DID_RUN, summary);
    }

    fn spec_will_run(&mut self, summary: &SpecSummary) {
        self.send(endpoint::SPEC_WILL_RUN, summary);
    }

    fn spec_did_complete(&mut self, summary: &SpecSummary) {
        self.send(endpoint::SPEC_DID_COMPLETE, summary);
    }

    fn after_suite_did_run(&mut self, summary: &SetupSummary) {
        self.send(endpoint::AFTER_SUITE_DID_RUN, summary);
    }

    fn spec_suite_did_end(&mut self, summary: &SuiteSummary) {
        self.send(endpoint::SPEC_SUITE_DID_END, summary);
    }
}

#[cfg(test)]
#[path = "forwarding_tests.rs"]
mod tests;
