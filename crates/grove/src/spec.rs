// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! A single collated spec and its setup/subject/teardown lifecycle.

use std::time::{Duration, Instant};

use crate::leaf::SubjectNode;
use crate::tree::{Collated, ContainerNode};
use crate::types::{Failure, FlagType, SpecState, SpecSummary};

/// One subject plus the containers enclosing it.
///
/// Borrows the tree; owns only its run state.
pub struct Spec<'a> {
    subject: &'a SubjectNode,
    containers: Vec<&'a ContainerNode>,
    focused: bool,
    state: SpecState,
    run_time: Duration,
    failure: Option<Failure>,
}

impl<'a> Spec<'a> {
    /// Fold the subject's and containers' flags into the spec.
    ///
    /// Any focused flag on the path focuses the spec; any pending flag makes
    /// it pending regardless of focus.
    pub fn new(subject: &'a SubjectNode, containers: Vec<&'a ContainerNode>) -> Self {
        let flags = std::iter::once(subject.flag()).chain(containers.iter().map(|c| c.flag()));
        let mut focused = false;
        let mut state = SpecState::Invalid;
        for flag in flags {
            match flag {
                FlagType::Focused => focused = true,
                FlagType::Pending => state = SpecState::Pending,
                FlagType::None => {}
            }
        }

        Self {
            subject,
            containers,
            focused,
            state,
            run_time: Duration::ZERO,
            failure: None,
        }
    }

    pub fn from_collated(collated: Collated<'a>) -> Self {
        Self::new(collated.subject, collated.containers)
    }

    pub fn state(&self) -> SpecState {
        self.state
    }

    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    pub fn run_time(&self) -> Duration {
        self.run_time
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_pending(&self) -> bool {
        self.state == SpecState::Pending
    }

    pub fn is_skipped(&self) -> bool {
        self.state == SpecState::Skipped
    }

    pub fn is_passed(&self) -> bool {
        self.state == SpecState::Passed
    }

    pub fn is_failed(&self) -> bool {
        self.state.is_failure()
    }

    pub fn is_measurement(&self) -> bool {
        self.subject.is_measurement()
    }

    pub fn skip(&mut self) {
        self.state = SpecState::Skipped;
    }

    /// Container texts (root excluded) and the subject's text, space separated.
    pub fn concatenated_text(&self) -> String {
        self.component_texts().join(" ")
    }

    fn described_containers(&self) -> impl Iterator<Item = &&'a ContainerNode> {
        // The root container is implicit and carries no description.
        self.containers.iter().skip(1)
    }

    fn component_texts(&self) -> Vec<String> {
        self.described_containers()
            .map(|container| container.text().to_string())
            .chain(std::iter::once(self.subject.text().to_string()))
            .collect()
    }

    /// Run every sample, stopping at the first one that does not pass.
    ///
    /// Skipped and pending specs are left untouched.
    pub fn run(&mut self) {
        if self.is_skipped() || self.is_pending() {
            return;
        }

        let start = Instant::now();
        for sample in 0..self.subject.samples() {
            let (state, failure) = self.run_sample();
            self.state = state;
            self.failure = failure;
            if state != SpecState::Passed {
                tracing::trace!(sample, %state, "stopping sample loop");
                break;
            }
        }
        self.run_time = start.elapsed();
    }

    fn run_sample(&self) -> (SpecState, Option<Failure>) {
        let mut outcome: Option<(SpecState, Option<Failure>)> = None;
        // Containers whose BeforeEach hooks started; only these unwind.
        let mut entered = 0;

        'setup: for (depth, container) in self.containers.iter().enumerate() {
            entered = depth + 1;
            for hook in container.before_each() {
                let (state, failure) = hook.run();
                if state != SpecState::Passed {
                    outcome = Some((state, failure));
                    break 'setup;
                }
            }
        }

        if outcome.is_none() {
            'just: for container in &self.containers {
                for hook in container.just_before_each() {
                    let (state, failure) = hook.run();
                    if state != SpecState::Passed {
                        outcome = Some((state, failure));
                        break 'just;
                    }
                }
            }
        }

        if outcome.is_none() {
            let (state, failure) = self.subject.run();
            if state != SpecState::Passed {
                outcome = Some((state, failure));
            }
        }

        for container in self.containers[..entered].iter().rev() {
            for hook in container.after_each() {
                let (state, failure) = hook.run();
                if state != SpecState::Passed && outcome.is_none() {
                    outcome = Some((state, failure));
                }
            }
        }

        outcome.unwrap_or((SpecState::Passed, None))
    }

    /// Snapshot for reporters.
    pub fn summary(&self, suite_id: &str) -> SpecSummary {
        let component_code_locations = self
            .described_containers()
            .map(|container| container.code_location().clone())
            .chain(std::iter::once(self.subject.code_location().clone()))
            .collect();

        let measurements = if self.is_measurement() && !self.state.is_failure() {
            self.subject.measurements()
        } else {
            Default::default()
        };

        SpecSummary {
            component_texts: self.component_texts(),
            component_code_locations,
            state: self.state,
            run_time: self.run_time,
            failure: self.failure.clone(),
            captured_output: String::new(),
            is_measurement: self.is_measurement(),
            number_of_samples: self.subject.samples(),
            measurements,
            suite_id: suite_id.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "spec_tests.rs"]
mod tests;
