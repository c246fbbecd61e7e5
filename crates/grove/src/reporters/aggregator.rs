// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Merges the report streams of N parallel workers into one.
//!
//! Nothing reaches the wrapped reporters until every worker has announced
//! its start; events that arrive earlier are buffered. The closing summary
//! is emitted once all workers have ended, or by [`AggregatingReporter::finish`]
//! when some never will.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use super::{RecordedEvent, Reporter};
use crate::config::SuiteConfig;
use crate::types::{SetupSummary, SpecSummary, SuiteSummary};

/// Clones share state, so the launcher can keep one handle while the
/// coordination server owns another.
#[derive(Clone)]
pub struct AggregatingReporter {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    node_count: usize,
    reporters: Vec<Box<dyn Reporter>>,
    begins: Vec<(SuiteConfig, SuiteSummary)>,
    started_at: Option<Instant>,
    announced: bool,
    buffered: Vec<RecordedEvent>,
    before_suite_seen: bool,
    after_suite_seen: bool,
    ends: Vec<SuiteSummary>,
    result: Option<bool>,
}

impl AggregatingReporter {
    pub fn new(node_count: usize, reporters: Vec<Box<dyn Reporter>>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                node_count: node_count.max(1),
                reporters,
                begins: Vec::new(),
                started_at: None,
                announced: false,
                buffered: Vec::new(),
                before_suite_seen: false,
                after_suite_seen: false,
                ends: Vec::new(),
                result: None,
            })),
        }
    }

    /// Whether every worker has reported its end.
    pub fn is_finished(&self) -> bool {
        self.lock().result.is_some()
    }

    /// The combined outcome, once every worker has ended.
    pub fn result(&self) -> Option<bool> {
        self.lock().result
    }

    /// Close the stream after the workers exited. Workers that never sent
    /// an end make the combined suite fail.
    pub fn finish(&self) -> bool {
        let mut inner = self.lock();
        if let Some(result) = inner.result {
            return result;
        }
        let missing = inner.node_count - inner.ends.len().min(inner.node_count);
        tracing::warn!(missing, "workers exited without reporting a suite end");
        if !inner.announced {
            inner.announce();
        }
        inner.end(false)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Inner {
    fn emit(&mut self, event: &RecordedEvent) {
        for reporter in &mut self.reporters {
            match event {
                RecordedEvent::SuiteWillBegin { config, summary } => {
                    reporter.spec_suite_will_begin(config, summary)
                }
                RecordedEvent::BeforeSuiteDidRun(summary) => reporter.before_suite_did_run(summary),
                RecordedEvent::SpecWillRun(summary) => reporter.spec_will_run(summary),
                RecordedEvent::SpecDidComplete(summary) => reporter.spec_did_complete(summary),
                RecordedEvent::AfterSuiteDidRun(summary) => reporter.after_suite_did_run(summary),
                RecordedEvent::SuiteDidEnd(summary) => reporter.spec_suite_did_end(summary),
            }
        }
    }

    fn push(&mut self, event: RecordedEvent) {
        if self.announced {
            self.emit(&event);
        } else {
            self.buffered.push(event);
        }
    }

    /// Emit one combined begin, then everything buffered so far.
    fn announce(&mut self) {
        let mut config = self
            .begins
            .first()
            .map(|(config, _)| config.clone())
            .unwrap_or_default();
        config.parallel_node = 1;
        config.parallel_total = self.node_count;

        let mut summary = self
            .begins
            .first()
            .map(|(_, summary)| summary.clone())
            .unwrap_or_default();
        summary.number_of_specs_before_parallelization = self
            .begins
            .iter()
            .map(|(_, summary)| summary.number_of_specs_before_parallelization)
            .max()
            .unwrap_or(0);
        summary.number_of_total_specs = self.begins.iter().map(|(_, s)| s.number_of_total_specs).sum();
        summary.number_of_specs_that_will_be_run = self
            .begins
            .iter()
            .map(|(_, s)| s.number_of_specs_that_will_be_run)
            .sum();

        self.announced = true;
        self.emit(&RecordedEvent::SuiteWillBegin {
            config: Box::new(config),
            summary,
        });
        for event in std::mem::take(&mut self.buffered) {
            self.emit(&event);
        }
    }

    /// Emit one combined end and record the outcome.
    fn end(&mut self, all_reported: bool) -> bool {
        let mut summary = SuiteSummary {
            suite_succeeded: all_reported,
            ..SuiteSummary::default()
        };
        if let Some((_, begin)) = self.begins.first() {
            summary.suite_description = begin.suite_description.clone();
            summary.suite_id = begin.suite_id.clone();
        }
        for end in &self.ends {
            summary.suite_succeeded &= end.suite_succeeded;
            summary.number_of_specs_before_parallelization = summary
                .number_of_specs_before_parallelization
                .max(end.number_of_specs_before_parallelization);
            summary.number_of_total_specs += end.number_of_total_specs;
            summary.number_of_specs_that_will_be_run += end.number_of_specs_that_will_be_run;
            summary.number_of_pending_specs += end.number_of_pending_specs;
            summary.number_of_skipped_specs += end.number_of_skipped_specs;
            summary.number_of_passed_specs += end.number_of_passed_specs;
            summary.number_of_failed_specs += end.number_of_failed_specs;
        }
        summary.run_time = self
            .started_at
            .map(|started| started.elapsed())
            .unwrap_or_default();

        let succeeded = summary.suite_succeeded;
        self.emit(&RecordedEvent::SuiteDidEnd(summary));
        self.result = Some(succeeded);
        succeeded
    }
}

impl Reporter for AggregatingReporter {
    fn spec_suite_will_begin(&mut self, config: &SuiteConfig, summary: &SuiteSummary) {
        let mut inner = self.lock();
        if inner.announced {
            tracing::warn!(node = config.parallel_node, "suite begin after aggregation started");
            return;
        }
        inner.started_at.get_or_insert_with(Instant::now);
        inner.begins.push((config.clone(), summary.clone()));
        if inner.begins.len() == inner.node_count {
            inner.announce();
        }
    }

    /// Every worker runs the suite-level hooks; the first report is shown,
    /// later ones only when they failed.
    fn before_suite_did_run(&mut self, summary: &SetupSummary) {
        let mut inner = self.lock();
        if !inner.before_suite_seen || summary.state.is_failure() {
            inner.before_suite_seen = true;
            inner.push(RecordedEvent::BeforeSuiteDidRun(summary.clone()));
        }
    }

    fn spec_will_run(&mut self, summary: &SpecSummary) {
        self.lock().push(RecordedEvent::SpecWillRun(summary.clone()));
    }

    fn spec_did_complete(&mut self, summary: &SpecSummary) {
        self.lock().push(RecordedEvent::SpecDidComplete(summary.clone()));
    }

    fn after_suite_did_run(&mut self, summary: &SetupSummary) {
        let mut inner = self.lock();
        if !inner.after_suite_seen || summary.state.is_failure() {
            inner.after_suite_seen = true;
            inner.push(RecordedEvent::AfterSuiteDidRun(summary.clone()));
        }
    }

    fn spec_suite_did_end(&mut self, summary: &SuiteSummary) {
        let mut inner = self.lock();
        if inner.result.is_some() {
            return;
        }
        inner.ends.push(summary.clone());
        if inner.ends.len() == inner.node_count {
            if !inner.announced {
                inner.announce();
            }
            inner.end(true);
        }
    }
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;
