// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reporter that records every callback.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::Reporter;
use crate::config::SuiteConfig;
use crate::types::{SetupSummary, SpecSummary, SuiteSummary};

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedEvent {
    SuiteWillBegin {
        config: Box<SuiteConfig>,
        summary: SuiteSummary,
    },
    BeforeSuiteDidRun(SetupSummary),
    SpecWillRun(SpecSummary),
    SpecDidComplete(SpecSummary),
    AfterSuiteDidRun(SetupSummary),
    SuiteDidEnd(SuiteSummary),
}

/// Clones share one event log, so a clone kept outside the runner can
/// inspect what the runner reported.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<RecordedEvent>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.lock().clone()
    }

    pub fn begin_summary(&self) -> Option<SuiteSummary> {
        self.lock().iter().find_map(|event| match event {
            RecordedEvent::SuiteWillBegin { summary, .. } => Some(summary.clone()),
            _ => None,
        })
    }

    pub fn end_summary(&self) -> Option<SuiteSummary> {
        self.lock().iter().rev().find_map(|event| match event {
            RecordedEvent::SuiteDidEnd(summary) => Some(summary.clone()),
            _ => None,
        })
    }

    pub fn before_suite(&self) -> Option<SetupSummary> {
        self.lock().iter().find_map(|event| match event {
            RecordedEvent::BeforeSuiteDidRun(summary) => Some(summary.clone()),
            _ => None,
        })
    }

    pub fn after_suite(&self) -> Option<SetupSummary> {
        self.lock().iter().find_map(|event| match event {
            RecordedEvent::AfterSuiteDidRun(summary) => Some(summary.clone()),
            _ => None,
        })
    }

    /// Summaries from `spec_did_complete`, in order.
    pub fn completed_specs(&self) -> Vec<SpecSummary> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                RecordedEvent::SpecDidComplete(summary) => Some(summary.clone()),
                _ => None,
            })
            .collect()
    }

    /// The completed spec whose full text equals `text`.
    pub fn spec(&self, text: &str) -> Option<SpecSummary> {
        self.completed_specs()
            .into_iter()
            .find(|summary| summary.full_text() == text)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RecordedEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, event: RecordedEvent) {
        self.lock().push(event);
    }
}

impl Reporter for RecordingReporter {
    fn spec_suite_will_begin(&mut self, config: &SuiteConfig, summary: &SuiteSummary) {
        self.push(RecordedEvent::SuiteWillBegin {
            config: Box::new(config.clone()),
            summary: summary.clone(),
        });
    }

    fn before_suite_did_run(&mut self, summary: &SetupSummary) {
        self.push(RecordedEvent::BeforeSuiteDidRun(summary.clone()));
    }

    fn spec_will_run(&mut self, summary: &SpecSummary) {
        self.push(RecordedEvent::SpecWillRun(summary.clone()));
    }

    fn spec_did_complete(&mut self, summary: &SpecSummary) {
        self.push(RecordedEvent::SpecDidComplete(summary.clone()));
    }

    fn after_suite_did_run(&mut self, summary: &SetupSummary) {
        self.push(RecordedEvent::AfterSuiteDidRun(summary.clone()));
    }

    fn spec_suite_did_end(&mut self, summary: &SuiteSummary) {
        self.push(RecordedEvent::SuiteDidEnd(summary.clone()));
    }
}
