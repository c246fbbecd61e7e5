// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

use super::*;
use crate::code_location::CodeLocation;
use crate::failer::Failer;
use crate::leaf::{Body, SubjectNode};
use crate::output::BufferInterceptor;
use crate::reporters::{RecordedEvent, RecordingReporter};
use crate::tree::ContainerNode;
use crate::types::FlagType;

/// Sink shared with the test, standing in for stdout.
#[derive(Clone, Default)]
struct Sink(Arc<Mutex<Vec<u8>>>);

impl Sink {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

struct Fixture {
    root: ContainerNode,
    failer: Arc<Failer>,
    writer: Arc<SpecWriter>,
    sink: Sink,
}

impl Fixture {
    fn new() -> Self {
        let sink = Sink::default();
        Self {
            root: ContainerNode::root(),
            failer: Arc::new(Failer::new()),
            writer: Arc::new(SpecWriter::new(Box::new(sink.clone()), false)),
            sink,
        }
    }

    /// A spec that writes `output` to the spec writer and optionally fails.
    fn it(&mut self, text: &str, flag: FlagType, output: &str, fail: bool) {
        let failer = Arc::clone(&self.failer);
        let writer = Arc::clone(&self.writer);
        let output = output.to_string();
        let body = Body::sync(move || {
            let _ = write!(&*writer, "{output}");
            if fail {
                failer.fail("it failed");
            }
        });
        self.root.push_subject(SubjectNode::it(
            text,
            body,
            flag,
            CodeLocation::new("runner.rs", 1),
            Duration::ZERO,
            Arc::clone(&self.failer),
            0,
        ));
    }

    fn before_suite(&self, fail: bool) -> SuiteNode {
        let failer = Arc::clone(&self.failer);
        SuiteNode::before_suite(
            Body::sync(move || {
                if fail {
                    failer.fail("setup failed");
                }
            }),
            CodeLocation::new("suite.rs", 1),
            Duration::ZERO,
            Arc::clone(&self.failer),
        )
    }
}

fn runner<'a>(
    fixture: &'a Fixture,
    recording: &RecordingReporter,
    config: SuiteConfig,
) -> SpecRunner<'a> {
    SpecRunner::new(
        "Runner Suite",
        SpecCollection::from_tree(&fixture.root),
        vec![Box::new(recording.clone())],
        Arc::clone(&fixture.writer),
        config,
    )
}

#[test]
fn reports_callbacks_in_order() {
    let mut fixture = Fixture::new();
    fixture.it("first", FlagType::None, "", false);
    fixture.it("second", FlagType::None, "", false);
    let before = fixture.before_suite(false);
    let recording = RecordingReporter::new();

    let passed = runner(&fixture, &recording, SuiteConfig::default())
        .with_before_suite(Some(&before))
        .run();

    assert!(passed);
    let kinds: Vec<&str> = recording
        .events()
        .iter()
        .map(|event| match event {
            RecordedEvent::SuiteWillBegin { .. } => "begin",
            RecordedEvent::BeforeSuiteDidRun(_) => "before suite",
            RecordedEvent::SpecWillRun(_) => "will run",
            RecordedEvent::SpecDidComplete(_) => "did complete",
            RecordedEvent::AfterSuiteDidRun(_) => "after suite",
            RecordedEvent::SuiteDidEnd(_) => "end",
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "begin",
            "before suite",
            "will run",
            "did complete",
            "will run",
            "did complete",
            "end",
        ]
    );
}

#[test]
fn will_run_summary_is_taken_before_the_spec_runs() {
    let mut fixture = Fixture::new();
    fixture.it("fails", FlagType::None, "", true);
    let recording = RecordingReporter::new();

    runner(&fixture, &recording, SuiteConfig::default()).run();

    let will_run = recording
        .events()
        .into_iter()
        .find_map(|event| match event {
            RecordedEvent::SpecWillRun(summary) => Some(summary),
            _ => None,
        })
        .unwrap();
    assert_eq!(will_run.state, SpecState::Invalid);
    assert_eq!(recording.spec("fails").unwrap().state, SpecState::Failed);
}

#[test]
fn every_summary_carries_the_suite_id() {
    let mut fixture = Fixture::new();
    fixture.it("one", FlagType::None, "", false);
    let recording = RecordingReporter::new();
    let runner = runner(&fixture, &recording, SuiteConfig::default());
    let suite_id = runner.suite_id().to_string();

    runner.run();

    assert_eq!(suite_id.len(), 16);
    assert_eq!(recording.begin_summary().unwrap().suite_id, suite_id);
    assert_eq!(recording.spec("one").unwrap().suite_id, suite_id);
    assert_eq!(recording.end_summary().unwrap().suite_id, suite_id);
}

#[test]
fn writer_output_is_dumped_only_for_failures() {
    let mut fixture = Fixture::new();
    fixture.it("passes", FlagType::None, "hidden ", false);
    fixture.it("fails", FlagType::None, "shown ", true);
    let recording = RecordingReporter::new();

    runner(&fixture, &recording, SuiteConfig::default()).run();

    assert_eq!(fixture.sink.text(), "shown ");
}

#[test]
fn pending_and_skipped_specs_are_reported_but_not_run() {
    let mut fixture = Fixture::new();
    fixture.it("pending", FlagType::Pending, "pending ran ", true);
    fixture.it("runs", FlagType::None, "", false);
    let recording = RecordingReporter::new();

    let passed = runner(&fixture, &recording, SuiteConfig::default()).run();

    assert!(passed);
    assert_eq!(recording.completed_specs().len(), 2);
    assert_eq!(recording.spec("pending").unwrap().state, SpecState::Pending);
    assert_eq!(fixture.sink.text(), "");
    let begin = recording.begin_summary().unwrap();
    assert_eq!(begin.number_of_specs_that_will_be_run, 1);
    assert_eq!(begin.number_of_pending_specs, 1);
}

#[test]
fn failing_before_suite_counts_runnable_specs_as_failed() {
    let mut fixture = Fixture::new();
    fixture.it("one", FlagType::None, "", false);
    fixture.it("two", FlagType::Pending, "", false);
    let before = fixture.before_suite(true);
    let recording = RecordingReporter::new();

    let passed = runner(&fixture, &recording, SuiteConfig::default())
        .with_before_suite(Some(&before))
        .run();

    assert!(!passed);
    let end = recording.end_summary().unwrap();
    assert_eq!(end.number_of_failed_specs, 1);
    assert_eq!(end.number_of_pending_specs, 1);
    assert!(recording.completed_specs().is_empty());
}

#[test]
fn fail_on_pending_fails_the_suite() {
    let mut fixture = Fixture::new();
    fixture.it("pending", FlagType::Pending, "", false);
    let recording = RecordingReporter::new();
    let config = SuiteConfig {
        fail_on_pending: true,
        ..SuiteConfig::default()
    };

    assert!(!runner(&fixture, &recording, config).run());
    assert!(!recording.end_summary().unwrap().suite_succeeded);
}

#[test]
fn interceptor_output_is_attached_to_failed_specs() {
    let mut fixture = Fixture::new();
    let interceptor = BufferInterceptor::new();
    let handle = interceptor.handle();
    let failer = Arc::clone(&fixture.failer);
    fixture.root.push_subject(SubjectNode::it(
        "noisy",
        Body::sync(move || {
            let _ = write!(handle.clone(), "captured");
            failer.fail("noisy failed");
        }),
        FlagType::None,
        CodeLocation::new("runner.rs", 2),
        Duration::ZERO,
        Arc::clone(&fixture.failer),
        0,
    ));
    let recording = RecordingReporter::new();

    runner(&fixture, &recording, SuiteConfig::default())
        .with_interceptor(Box::new(interceptor))
        .run();

    assert_eq!(recording.spec("noisy").unwrap().captured_output, "captured");
}

#[test]
fn empty_suite_succeeds() {
    let fixture = Fixture::new();
    let recording = RecordingReporter::new();

    assert!(runner(&fixture, &recording, SuiteConfig::default()).run());
    let end = recording.end_summary().unwrap();
    assert_eq!(end.number_of_total_specs, 0);
    assert!(end.suite_succeeded);
}
