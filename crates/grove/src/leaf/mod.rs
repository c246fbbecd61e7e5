// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Leaf nodes: setup hooks and spec subjects.
//!
//! Every leaf embeds a [`LeafRunner`]; the variants only add what reporting
//! and collation need (text, flag, sample count).

mod capture;
mod runner;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use crossbeam_channel::Sender;

pub use runner::LeafRunner;

use crate::benchmark::Benchmarker;
use crate::code_location::CodeLocation;
use crate::failer::Failer;
use crate::types::{Failure, FlagType, Measurement, NodeType, SpecState};

/// A user-supplied node body.
///
/// The caller picks the execution mode when declaring the node: `Sync`
/// bodies run on the runner's thread, `Async` bodies run on their own
/// thread and must call [`Done::signal`] before the node's timeout.
#[derive(Clone)]
pub enum Body {
    Sync(Arc<dyn Fn() + Send + Sync>),
    Async(Arc<dyn Fn(Done) + Send + Sync>),
}

impl Body {
    pub fn sync(body: impl Fn() + Send + Sync + 'static) -> Self {
        Self::Sync(Arc::new(body))
    }

    pub fn with_done(body: impl Fn(Done) + Send + Sync + 'static) -> Self {
        Self::Async(Arc::new(body))
    }

    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }
}

/// Suite-wide timeout for async bodies declared without their own.
///
/// Clones share one value. Nodes read it when they run, so the suite can
/// settle it from config after the tree is built.
#[derive(Debug, Clone)]
pub struct DefaultTimeout(Arc<AtomicU64>);

impl DefaultTimeout {
    pub fn new(timeout: Duration) -> Self {
        Self(Arc::new(AtomicU64::new(millis(timeout))))
    }

    pub fn set(&self, timeout: Duration) {
        self.0.store(millis(timeout), Ordering::SeqCst);
    }

    pub fn get(&self) -> Duration {
        Duration::from_millis(self.0.load(Ordering::SeqCst))
    }
}

fn millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

/// How long an async body may run: its own timeout or the suite default.
#[derive(Debug, Clone)]
pub enum Deadline {
    Fixed(Duration),
    Default(DefaultTimeout),
}

impl Deadline {
    /// Zero means no deadline.
    pub fn resolve(&self) -> Duration {
        match self {
            Self::Fixed(timeout) => *timeout,
            Self::Default(default) => default.get(),
        }
    }
}

impl From<Duration> for Deadline {
    fn from(timeout: Duration) -> Self {
        Self::Fixed(timeout)
    }
}

impl From<DefaultTimeout> for Deadline {
    fn from(default: DefaultTimeout) -> Self {
        Self::Default(default)
    }
}

/// Completion handle passed to async bodies.
#[derive(Clone)]
pub struct Done {
    signal: Sender<()>,
    abandoned: Arc<AtomicBool>,
}

impl Done {
    pub(crate) fn new(signal: Sender<()>, abandoned: Arc<AtomicBool>) -> Self {
        Self { signal, abandoned }
    }

    /// Report that the body has finished. Extra calls are ignored.
    pub fn signal(&self) {
        let _ = self.signal.try_send(());
    }

    /// True once the runner has given up waiting (the node timed out).
    /// Long-running bodies can poll this to stop early.
    pub fn is_abandoned(&self) -> bool {
        self.abandoned.load(Ordering::SeqCst)
    }
}

/// A BeforeEach, JustBeforeEach, or AfterEach hook.
pub struct SetupNode {
    runner: LeafRunner,
}

impl SetupNode {
    pub fn new(
        node_type: NodeType,
        body: Body,
        code_location: CodeLocation,
        timeout: impl Into<Deadline>,
        failer: Arc<Failer>,
        node_index: usize,
    ) -> Self {
        Self {
            runner: LeafRunner::new(
                body,
                code_location,
                timeout,
                failer,
                node_type,
                Some(node_index),
            ),
        }
    }

    pub fn run(&self) -> (SpecState, Option<Failure>) {
        self.runner.run()
    }

    pub fn node_type(&self) -> NodeType {
        self.runner.node_type()
    }

    pub fn code_location(&self) -> &CodeLocation {
        self.runner.code_location()
    }
}

/// The executable subject of a spec: an It or a Measure.
pub struct SubjectNode {
    runner: LeafRunner,
    text: String,
    flag: FlagType,
    samples: usize,
    benchmarker: Option<Arc<Benchmarker>>,
}

impl SubjectNode {
    pub fn it(
        text: impl Into<String>,
        body: Body,
        flag: FlagType,
        code_location: CodeLocation,
        timeout: impl Into<Deadline>,
        failer: Arc<Failer>,
        node_index: usize,
    ) -> Self {
        Self {
            runner: LeafRunner::new(
                body,
                code_location,
                timeout,
                failer,
                NodeType::It,
                Some(node_index),
            ),
            text: text.into(),
            flag,
            samples: 1,
            benchmarker: None,
        }
    }

    /// A measurement that runs its body `samples` times.
    ///
    /// # Panics
    ///
    /// Panics when `samples` is zero: that is a declaration error and must
    /// surface before any spec runs.
    #[allow(clippy::panic)]
    pub fn measure(
        text: impl Into<String>,
        body: Arc<dyn Fn(&Benchmarker) + Send + Sync>,
        flag: FlagType,
        code_location: CodeLocation,
        samples: usize,
        failer: Arc<Failer>,
        node_index: usize,
    ) -> Self {
        if samples == 0 {
            panic!("Measure at {code_location} must take at least one sample");
        }

        let benchmarker = Arc::new(Benchmarker::new());
        let recorder = Arc::clone(&benchmarker);
        let wrapped = Body::sync(move || body(&recorder));

        Self {
            runner: LeafRunner::new(
                wrapped,
                code_location,
                Duration::ZERO,
                failer,
                NodeType::Measure,
                Some(node_index),
            ),
            text: text.into(),
            flag,
            samples,
            benchmarker: Some(benchmarker),
        }
    }

    pub fn run(&self) -> (SpecState, Option<Failure>) {
        self.runner.run()
    }

    pub fn node_type(&self) -> NodeType {
        self.runner.node_type()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn flag(&self) -> FlagType {
        self.flag
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn code_location(&self) -> &CodeLocation {
        self.runner.code_location()
    }

    pub fn is_measurement(&self) -> bool {
        self.benchmarker.is_some()
    }

    pub fn measurements(&self) -> BTreeMap<String, Measurement> {
        self.benchmarker
            .as_ref()
            .map(|benchmarker| benchmarker.report())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
