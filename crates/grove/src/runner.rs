// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Drives one worker's slice of a suite and reports its progress.

use std::sync::Arc;
use std::time::Instant;

use crate::collection::SpecCollection;
use crate::config::SuiteConfig;
use crate::output::{OutputInterceptor, SpecWriter};
use crate::parallel::Client;
use crate::reporters::Reporter;
use crate::spec::Spec;
use crate::suite_node::{Placement, SuiteNode};
use crate::types::{SetupSummary, SpecState, SuiteSummary};

/// Runs suite hooks and specs strictly in order on the calling thread.
///
/// Every reporter sees every callback, in registration order.
pub struct SpecRunner<'a> {
    description: String,
    before_suite: Option<&'a SuiteNode>,
    after_suite: Option<&'a SuiteNode>,
    specs: SpecCollection<'a>,
    reporters: Vec<Box<dyn Reporter>>,
    config: SuiteConfig,
    writer: Arc<SpecWriter>,
    interceptor: Option<Box<dyn OutputInterceptor>>,
    client: Option<Client>,
    suite_id: String,
}

impl<'a> SpecRunner<'a> {
    pub fn new(
        description: impl Into<String>,
        specs: SpecCollection<'a>,
        reporters: Vec<Box<dyn Reporter>>,
        writer: Arc<SpecWriter>,
        config: SuiteConfig,
    ) -> Self {
        let client = config.parallel_host.as_deref().map(Client::new);
        Self {
            description: description.into(),
            before_suite: None,
            after_suite: None,
            specs,
            reporters,
            config,
            writer,
            interceptor: None,
            client,
            suite_id: random_suite_id(),
        }
    }

    pub fn with_before_suite(mut self, node: Option<&'a SuiteNode>) -> Self {
        self.before_suite = node;
        self
    }

    pub fn with_after_suite(mut self, node: Option<&'a SuiteNode>) -> Self {
        self.after_suite = node;
        self
    }

    pub fn with_interceptor(mut self, interceptor: Box<dyn OutputInterceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    pub fn suite_id(&self) -> &str {
        &self.suite_id
    }

    /// Run the suite. Returns whether it succeeded.
    pub fn run(mut self) -> bool {
        let start = Instant::now();
        let begin = self.summary(true);
        tracing::debug!(
            suite = %self.description,
            seed = self.config.random_seed,
            total = begin.number_of_total_specs,
            will_run = begin.number_of_specs_that_will_be_run,
            "suite will begin"
        );
        let config = self.config.clone();
        self.report(|reporter| reporter.spec_suite_will_begin(&config, &begin));

        let before_suite_passed = match self.before_suite {
            Some(node) => {
                let summary = self.run_suite_node(node);
                self.report(|reporter| reporter.before_suite_did_run(&summary));
                summary.state == SpecState::Passed
            }
            None => true,
        };

        if before_suite_passed {
            for index in 0..self.specs.len() {
                self.run_spec(index);
            }
        }

        let after_suite_passed = match self.after_suite {
            Some(node) => {
                let summary = self.run_suite_node(node);
                self.report(|reporter| reporter.after_suite_did_run(&summary));
                summary.state == SpecState::Passed
            }
            None => true,
        };

        let mut end = self.summary(before_suite_passed);
        end.suite_succeeded &= before_suite_passed && after_suite_passed;
        end.run_time = start.elapsed();
        tracing::debug!(
            succeeded = end.suite_succeeded,
            passed = end.number_of_passed_specs,
            failed = end.number_of_failed_specs,
            "suite did end"
        );
        self.report(|reporter| reporter.spec_suite_did_end(&end));
        end.suite_succeeded
    }

    fn run_spec(&mut self, index: usize) {
        let Some(spec) = self.specs.specs().get(index) else {
            return;
        };
        let will_run = spec.summary(&self.suite_id);
        self.writer.truncate();
        self.report(|reporter| reporter.spec_will_run(&will_run));
        tracing::trace!(spec = %will_run.full_text(), "spec will run");

        start_intercepting(&mut self.interceptor);
        let Some(spec) = self.specs.specs_mut().get_mut(index) else {
            return;
        };
        spec.run();
        let captured = stop_intercepting(&mut self.interceptor);

        let Some(spec) = self.specs.specs().get(index) else {
            return;
        };
        let mut completed = spec.summary(&self.suite_id);
        if completed.state.is_failure() {
            if let Err(err) = self.writer.dump_out() {
                tracing::warn!(error = %err, "failed to write spec output");
            }
            completed.captured_output = captured;
        }
        tracing::trace!(spec = %completed.full_text(), state = %completed.state, "spec did complete");
        self.report(|reporter| reporter.spec_did_complete(&completed));
    }

    fn run_suite_node(&mut self, node: &SuiteNode) -> SetupSummary {
        let placement = Placement {
            node: self.config.parallel_node,
            total: self.config.parallel_total,
            client: self.client.as_ref(),
        };
        self.writer.truncate();
        start_intercepting(&mut self.interceptor);
        let mut summary = node.run(placement);
        let captured = stop_intercepting(&mut self.interceptor);
        if summary.state.is_failure() {
            if let Err(err) = self.writer.dump_out() {
                tracing::warn!(error = %err, "failed to write suite hook output");
            }
            summary.captured_output = captured;
        }
        summary
    }

    fn report(&mut self, mut callback: impl FnMut(&mut dyn Reporter)) {
        for reporter in &mut self.reporters {
            callback(reporter.as_mut());
        }
    }

    /// Counts over the current spec list.
    ///
    /// When the before-suite hook failed nothing ran, and every spec that
    /// would have run counts as failed.
    fn summary(&self, before_suite_passed: bool) -> SuiteSummary {
        let will_run = self.count(|spec| !spec.is_skipped() && !spec.is_pending());
        let pending = self.count(Spec::is_pending);
        let (passed, failed) = if before_suite_passed {
            (self.count(Spec::is_passed), self.count(Spec::is_failed))
        } else {
            (0, will_run)
        };

        SuiteSummary {
            suite_description: self.description.clone(),
            suite_succeeded: failed == 0 && !(pending > 0 && self.config.fail_on_pending),
            suite_id: self.suite_id.clone(),
            number_of_specs_before_parallelization: self.specs.number_of_original_specs(),
            number_of_total_specs: self.specs.len(),
            number_of_specs_that_will_be_run: will_run,
            number_of_pending_specs: pending,
            number_of_skipped_specs: self.count(Spec::is_skipped),
            number_of_passed_specs: passed,
            number_of_failed_specs: failed,
            run_time: Default::default(),
        }
    }

    fn count(&self, filter: impl Fn(&Spec<'a>) -> bool) -> usize {
        self.specs.specs().iter().filter(|spec| filter(spec)).count()
    }
}

fn start_intercepting(interceptor: &mut Option<Box<dyn OutputInterceptor>>) {
    if let Some(interceptor) = interceptor.as_mut()
        && let Err(err) = interceptor.start_intercepting_output()
    {
        tracing::warn!(error = %err, "failed to start output interception");
    }
}

fn stop_intercepting(interceptor: &mut Option<Box<dyn OutputInterceptor>>) -> String {
    let Some(interceptor) = interceptor.as_mut() else {
        return String::new();
    };
    interceptor
        .stop_intercepting_and_return_output()
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to stop output interception");
            String::new()
        })
}

/// Random hex identifier shared by every summary of one run.
fn random_suite_id() -> String {
    format!("{:016x}", rand::random::<u64>())
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
