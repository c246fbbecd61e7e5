// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Declaring a suite and running it.
//!
//! A [`Suite`] is built by nesting closures, then consumed by
//! [`Suite::run`]. The tree cannot change once a run starts.
//!
//! ```no_run
//! use grove::Suite;
//!
//! let mut suite = Suite::new();
//! let failer = suite.failer();
//! suite.describe("Stack", |s| {
//!     s.it("starts empty", move || {
//!         if !Vec::<u8>::new().is_empty() {
//!             failer.fail("expected an empty stack");
//!         }
//!     });
//! });
//! let passed = suite.run_from_env("Stack Suite").unwrap_or(false);
//! # let _ = passed;
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::benchmark::Benchmarker;
use crate::code_location::CodeLocation;
use crate::collection::SpecCollection;
use crate::config::{SuiteConfig, defaults};
use crate::error::Result;
use crate::failer::Failer;
use crate::leaf::{Body, Deadline, DefaultTimeout, Done, SetupNode, SubjectNode};
use crate::output::{OutputInterceptor, SpecWriter};
use crate::parallel::Client;
use crate::reporters::{ConsoleReporter, ForwardingReporter, JsonReporter, Reporter};
use crate::runner::SpecRunner;
use crate::suite_node::SuiteNode;
use crate::tree::ContainerNode;
use crate::types::{FlagType, NodeType};

pub struct Suite {
    /// Open containers, the implicit root at the bottom.
    stack: Vec<ContainerNode>,
    failer: Arc<Failer>,
    writer: Arc<SpecWriter>,
    /// Settled from the run's config when the suite starts.
    default_timeout: DefaultTimeout,
    before_suite: Option<SuiteNode>,
    after_suite: Option<SuiteNode>,
    interceptor: Option<Box<dyn OutputInterceptor>>,
}

impl Default for Suite {
    fn default() -> Self {
        Self::new()
    }
}

impl Suite {
    pub fn new() -> Self {
        Self {
            stack: vec![ContainerNode::root()],
            failer: Arc::new(Failer::new()),
            writer: Arc::new(SpecWriter::stdout(false)),
            default_timeout: DefaultTimeout::new(Duration::from_millis(defaults::TIMEOUT_MS)),
            before_suite: None,
            after_suite: None,
            interceptor: None,
        }
    }

    /// Use `writer` for spec output instead of stdout.
    pub fn with_writer(mut self, writer: SpecWriter) -> Self {
        self.writer = Arc::new(writer);
        self
    }

    pub fn with_interceptor(mut self, interceptor: Box<dyn OutputInterceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    /// The failure register spec bodies report into.
    pub fn failer(&self) -> Arc<Failer> {
        Arc::clone(&self.failer)
    }

    /// Writer for diagnostic output, shown only when a spec fails.
    pub fn writer(&self) -> Arc<SpecWriter> {
        Arc::clone(&self.writer)
    }

    // Containers

    #[track_caller]
    pub fn describe(&mut self, text: impl Into<String>, body: impl FnOnce(&mut Suite)) {
        self.container(text.into(), FlagType::None, CodeLocation::caller(), body);
    }

    #[track_caller]
    pub fn fdescribe(&mut self, text: impl Into<String>, body: impl FnOnce(&mut Suite)) {
        self.container(text.into(), FlagType::Focused, CodeLocation::caller(), body);
    }

    #[track_caller]
    pub fn pdescribe(&mut self, text: impl Into<String>, body: impl FnOnce(&mut Suite)) {
        self.container(text.into(), FlagType::Pending, CodeLocation::caller(), body);
    }

    pub(crate) fn container(
        &mut self,
        text: String,
        flag: FlagType,
        code_location: CodeLocation,
        body: impl FnOnce(&mut Suite),
    ) {
        self.stack.push(ContainerNode::new(text, flag, code_location));
        body(self);
        if self.stack.len() > 1
            && let Some(container) = self.stack.pop()
        {
            self.current().push_container(container);
        }
    }

    // Subjects

    #[track_caller]
    pub fn it(&mut self, text: impl Into<String>, body: impl Fn() + Send + Sync + 'static) {
        self.subject(text.into(), Body::sync(body), FlagType::None, CodeLocation::caller());
    }

    #[track_caller]
    pub fn fit(&mut self, text: impl Into<String>, body: impl Fn() + Send + Sync + 'static) {
        self.subject(text.into(), Body::sync(body), FlagType::Focused, CodeLocation::caller());
    }

    #[track_caller]
    pub fn pit(&mut self, text: impl Into<String>, body: impl Fn() + Send + Sync + 'static) {
        self.subject(text.into(), Body::sync(body), FlagType::Pending, CodeLocation::caller());
    }

    /// An async spec that must call [`Done::signal`] within the suite's
    /// default timeout (`default_timeout_ms` in the run's config).
    #[track_caller]
    pub fn it_async(&mut self, text: impl Into<String>, body: impl Fn(Done) + Send + Sync + 'static) {
        let location = CodeLocation::caller();
        self.subject(text.into(), Body::with_done(body), FlagType::None, location);
    }

    #[track_caller]
    pub fn fit_async(&mut self, text: impl Into<String>, body: impl Fn(Done) + Send + Sync + 'static) {
        let location = CodeLocation::caller();
        self.subject(text.into(), Body::with_done(body), FlagType::Focused, location);
    }

    #[track_caller]
    pub fn it_async_with_timeout(
        &mut self,
        text: impl Into<String>,
        timeout: Duration,
        body: impl Fn(Done) + Send + Sync + 'static,
    ) {
        let location = CodeLocation::caller();
        self.subject_with_timeout(
            text.into(),
            Body::with_done(body),
            FlagType::None,
            location,
            timeout.into(),
        );
    }

    pub(crate) fn subject(&mut self, text: String, body: Body, flag: FlagType, location: CodeLocation) {
        let timeout = self.default_timeout.clone().into();
        self.subject_with_timeout(text, body, flag, location, timeout);
    }

    fn subject_with_timeout(
        &mut self,
        text: String,
        body: Body,
        flag: FlagType,
        location: CodeLocation,
        timeout: Deadline,
    ) {
        let node = SubjectNode::it(text, body, flag, location, timeout, self.failer(), self.depth());
        self.current().push_subject(node);
    }

    /// A measurement: `body` runs `samples` times and records into the
    /// benchmarker.
    ///
    /// # Panics
    ///
    /// Panics when `samples` is zero.
    #[track_caller]
    pub fn measure(
        &mut self,
        text: impl Into<String>,
        samples: usize,
        body: impl Fn(&Benchmarker) + Send + Sync + 'static,
    ) {
        self.measurement(text.into(), samples, body, FlagType::None, CodeLocation::caller());
    }

    #[track_caller]
    pub fn fmeasure(
        &mut self,
        text: impl Into<String>,
        samples: usize,
        body: impl Fn(&Benchmarker) + Send + Sync + 'static,
    ) {
        self.measurement(text.into(), samples, body, FlagType::Focused, CodeLocation::caller());
    }

    #[track_caller]
    pub fn pmeasure(
        &mut self,
        text: impl Into<String>,
        samples: usize,
        body: impl Fn(&Benchmarker) + Send + Sync + 'static,
    ) {
        self.measurement(text.into(), samples, body, FlagType::Pending, CodeLocation::caller());
    }

    fn measurement(
        &mut self,
        text: String,
        samples: usize,
        body: impl Fn(&Benchmarker) + Send + Sync + 'static,
        flag: FlagType,
        location: CodeLocation,
    ) {
        let node = SubjectNode::measure(
            text,
            Arc::new(body),
            flag,
            location,
            samples,
            self.failer(),
            self.depth(),
        );
        self.current().push_subject(node);
    }

    // Per-spec hooks

    #[track_caller]
    pub fn before_each(&mut self, body: impl Fn() + Send + Sync + 'static) {
        let node = self.setup(NodeType::BeforeEach, Body::sync(body), CodeLocation::caller());
        self.current().push_before_each(node);
    }

    #[track_caller]
    pub fn before_each_async(&mut self, body: impl Fn(Done) + Send + Sync + 'static) {
        let node = self.setup(NodeType::BeforeEach, Body::with_done(body), CodeLocation::caller());
        self.current().push_before_each(node);
    }

    #[track_caller]
    pub fn just_before_each(&mut self, body: impl Fn() + Send + Sync + 'static) {
        let node = self.setup(NodeType::JustBeforeEach, Body::sync(body), CodeLocation::caller());
        self.current().push_just_before_each(node);
    }

    #[track_caller]
    pub fn just_before_each_async(&mut self, body: impl Fn(Done) + Send + Sync + 'static) {
        let node = self.setup(
            NodeType::JustBeforeEach,
            Body::with_done(body),
            CodeLocation::caller(),
        );
        self.current().push_just_before_each(node);
    }

    #[track_caller]
    pub fn after_each(&mut self, body: impl Fn() + Send + Sync + 'static) {
        let node = self.setup(NodeType::AfterEach, Body::sync(body), CodeLocation::caller());
        self.current().push_after_each(node);
    }

    #[track_caller]
    pub fn after_each_async(&mut self, body: impl Fn(Done) + Send + Sync + 'static) {
        let node = self.setup(NodeType::AfterEach, Body::with_done(body), CodeLocation::caller());
        self.current().push_after_each(node);
    }

    fn setup(&self, node_type: NodeType, body: Body, location: CodeLocation) -> SetupNode {
        SetupNode::new(
            node_type,
            body,
            location,
            self.default_timeout.clone(),
            self.failer(),
            self.depth(),
        )
    }

    // Suite hooks

    /// Runs once per worker before any spec.
    ///
    /// # Panics
    ///
    /// Panics when a before-suite hook was already declared.
    #[track_caller]
    pub fn before_suite(&mut self, body: impl Fn() + Send + Sync + 'static) {
        let node = SuiteNode::before_suite(
            Body::sync(body),
            CodeLocation::caller(),
            self.default_timeout.clone(),
            self.failer(),
        );
        self.set_before_suite(node);
    }

    /// Runs once per worker after every spec.
    ///
    /// # Panics
    ///
    /// Panics when an after-suite hook was already declared.
    #[track_caller]
    pub fn after_suite(&mut self, body: impl Fn() + Send + Sync + 'static) {
        let node = SuiteNode::after_suite(
            Body::sync(body),
            CodeLocation::caller(),
            self.default_timeout.clone(),
            self.failer(),
        );
        self.set_after_suite(node);
    }

    /// `node1` runs once, on worker 1; its bytes reach `all` on every worker.
    #[track_caller]
    pub fn synchronized_before_suite(
        &mut self,
        node1: impl Fn() -> Vec<u8> + Send + Sync + 'static,
        all: impl Fn(&[u8]) + Send + Sync + 'static,
    ) {
        let node = SuiteNode::synchronized_before_suite(
            Arc::new(node1),
            Arc::new(all),
            CodeLocation::caller(),
            self.failer(),
        );
        self.set_before_suite(node);
    }

    /// `all` runs on every worker; `node1` runs on worker 1 once every
    /// other worker has exited.
    #[track_caller]
    pub fn synchronized_after_suite(
        &mut self,
        all: impl Fn() + Send + Sync + 'static,
        node1: impl Fn() + Send + Sync + 'static,
    ) {
        let node = SuiteNode::synchronized_after_suite(
            Body::sync(all),
            Body::sync(node1),
            CodeLocation::caller(),
            self.default_timeout.clone(),
            self.failer(),
        );
        self.set_after_suite(node);
    }

    #[allow(clippy::panic)]
    fn set_before_suite(&mut self, node: SuiteNode) {
        if let Some(existing) = &self.before_suite {
            panic!(
                "{} at {} conflicts with the one already declared at {}",
                node.node_type(),
                node.code_location(),
                existing.code_location()
            );
        }
        self.before_suite = Some(node);
    }

    #[allow(clippy::panic)]
    fn set_after_suite(&mut self, node: SuiteNode) {
        if let Some(existing) = &self.after_suite {
            panic!(
                "{} at {} conflicts with the one already declared at {}",
                node.node_type(),
                node.code_location(),
                existing.code_location()
            );
        }
        self.after_suite = Some(node);
    }

    fn depth(&self) -> usize {
        self.stack.len().saturating_sub(1)
    }

    fn current(&mut self) -> &mut ContainerNode {
        if self.stack.is_empty() {
            self.stack.push(ContainerNode::root());
        }
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    // Running

    /// Run with config from `grove.toml` and `GROVE_*` variables, reporting
    /// to the console (or the coordination server when running as a
    /// parallel worker) and to a JSON file when configured.
    pub fn run_from_env(self, description: &str) -> Result<bool> {
        let cwd = std::env::current_dir()?;
        self.run_from_dir(description, &cwd)
    }

    /// [`Suite::run_from_env`] with config discovery starting at `dir`.
    pub fn run_from_dir(self, description: &str, dir: &Path) -> Result<bool> {
        let config = SuiteConfig::load(dir)?;
        let reporters = default_reporters(&config);
        self.run(description, reporters, &config)
    }

    /// Order, filter, and run every spec.
    ///
    /// `Err` means `config` was unusable and nothing ran; `Ok(false)` means
    /// the suite ran and failed.
    pub fn run(
        mut self,
        description: &str,
        reporters: Vec<Box<dyn Reporter>>,
        config: &SuiteConfig,
    ) -> Result<bool> {
        let filters = config.validate()?;
        self.default_timeout.set(config.default_timeout());
        self.writer.set_streaming(config.stream_output);

        let mut root = self.close_open_containers();
        root.back_propagate_focus();

        let mut rng = StdRng::seed_from_u64(config.random_seed);
        root.shuffle(&mut rng);

        let mut specs = SpecCollection::from_tree(&root);
        if config.randomize_all_specs {
            specs.shuffle(&mut rng);
        }
        specs.apply_focus(description, filters.focus.as_ref(), filters.skip.as_ref());
        if config.skip_measurements {
            specs.skip_measurements();
        }
        if config.is_parallel() {
            specs.trim_for_parallelization(config.parallel_total, config.parallel_node)?;
        }

        let mut runner = SpecRunner::new(
            description,
            specs,
            reporters,
            Arc::clone(&self.writer),
            config.clone(),
        )
        .with_before_suite(self.before_suite.as_ref())
        .with_after_suite(self.after_suite.as_ref());
        if let Some(interceptor) = self.interceptor.take() {
            runner = runner.with_interceptor(interceptor);
        }
        Ok(runner.run())
    }

    fn close_open_containers(&mut self) -> ContainerNode {
        while self.stack.len() > 1 {
            if let Some(container) = self.stack.pop() {
                self.current().push_container(container);
            }
        }
        self.stack.pop().unwrap_or_else(ContainerNode::root)
    }
}

/// Console (or forwarding, on parallel workers) plus an optional JSON report.
pub fn default_reporters(config: &SuiteConfig) -> Vec<Box<dyn Reporter>> {
    let mut reporters: Vec<Box<dyn Reporter>> = Vec::new();
    match config.parallel_host.as_deref() {
        Some(host) if config.is_parallel() => {
            reporters.push(Box::new(ForwardingReporter::new(Client::new(host))));
        }
        _ => reporters.push(Box::new(ConsoleReporter::stdout(config.no_color))),
    }
    if let Some(path) = &config.json_report {
        let path = if config.is_parallel() {
            path.with_extension(format!("{}.json", config.parallel_node))
        } else {
            path.clone()
        };
        reporters.push(Box::new(JsonReporter::new(path)));
    }
    reporters
}

#[cfg(test)]
#[path = "suite_tests.rs"]
mod tests;
