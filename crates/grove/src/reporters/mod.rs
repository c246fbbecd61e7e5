// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Suite progress reporting.
//!
//! The runner calls every attached reporter in registration order, on the
//! thread driving the suite, so reporters never see concurrent callbacks.

mod aggregator;
mod console;
mod forwarding;
mod json;
mod recording;

pub use aggregator::AggregatingReporter;
pub use console::ConsoleReporter;
pub use forwarding::ForwardingReporter;
pub use json::JsonReporter;
pub use recording::{RecordedEvent, RecordingReporter};

use crate::config::SuiteConfig;
use crate::types::{SetupSummary, SpecSummary, SuiteSummary};

pub trait Reporter: Send {
    fn spec_suite_will_begin(&mut self, config: &SuiteConfig, summary: &SuiteSummary);
    fn before_suite_did_run(&mut self, summary: &SetupSummary);
    fn spec_will_run(&mut self, summary: &SpecSummary);
    fn spec_did_complete(&mut self, summary: &SpecSummary);
    fn after_suite_did_run(&mut self, summary: &SetupSummary);
    fn spec_suite_did_end(&mut self, summary: &SuiteSummary);
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn spec_suite_will_begin(&mut self, config: &SuiteConfig, summary: &SuiteSummary) {
        (**self).spec_suite_will_begin(config, summary);
    }

    fn before_suite_did_run(&mut self, summary: &SetupSummary) {
        (**self).before_suite_did_run(summary);
    }

    fn spec_will_run(&mut self, summary: &SpecSummary) {
        (**self).spec_will_run(summary);
    }

    fn spec_did_complete(&mut self, summary: &SpecSummary) {
        (**self).spec_did_complete(summary);
    }

    fn after_suite_did_run(&mut self, summary: &SetupSummary) {
        (**self).after_suite_did_run(summary);
    }

    fn spec_suite_did_end(&mut self, summary: &SuiteSummary) {
        (**self).spec_suite_did_end(summary);
    }
}
