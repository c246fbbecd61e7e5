// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;

fn failer() -> Arc<Failer> {
    Arc::new(Failer::new())
}

#[test]
fn it_node_exposes_its_declaration() {
    let node = SubjectNode::it(
        "pops the top",
        Body::sync(|| {}),
        FlagType::Focused,
        CodeLocation::new("stack.rs", 12),
        Duration::ZERO,
        failer(),
        2,
    );

    assert_eq!(node.text(), "pops the top");
    assert_eq!(node.flag(), FlagType::Focused);
    assert_eq!(node.samples(), 1);
    assert_eq!(node.node_type(), NodeType::It);
    assert_eq!(node.code_location().line_number, 12);
    assert!(!node.is_measurement());
    assert!(node.measurements().is_empty());
}

#[test]
fn measure_node_records_through_its_benchmarker() {
    let node = SubjectNode::measure(
        "is fast",
        Arc::new(|b: &Benchmarker| b.record_value("size", 3.0)),
        FlagType::None,
        CodeLocation::new("perf.rs", 1),
        4,
        failer(),
        1,
    );

    for _ in 0..node.samples() {
        assert_eq!(node.run().0, SpecState::Passed);
    }

    assert!(node.is_measurement());
    assert_eq!(node.node_type(), NodeType::Measure);
    let report = node.measurements();
    assert_eq!(report["size"].results, vec![3.0; 4]);
}

#[test]
#[should_panic(expected = "must take at least one sample")]
fn measure_with_zero_samples_panics_at_construction() {
    let _ = SubjectNode::measure(
        "never",
        Arc::new(|_: &Benchmarker| {}),
        FlagType::None,
        CodeLocation::new("perf.rs", 1),
        0,
        failer(),
        1,
    );
}

#[test]
fn setup_node_reports_its_type() {
    let node = SetupNode::new(
        NodeType::AfterEach,
        Body::sync(|| {}),
        CodeLocation::new("hooks.rs", 3),
        Duration::ZERO,
        failer(),
        0,
    );

    assert_eq!(node.node_type(), NodeType::AfterEach);
    assert_eq!(node.code_location().file_name, "hooks.rs");
    assert_eq!(node.run().0, SpecState::Passed);
}

#[test]
fn body_mode_is_chosen_at_declaration() {
    assert!(!Body::sync(|| {}).is_async());
    assert!(Body::with_done(|done| done.signal()).is_async());
}

#[test]
fn default_timeout_clones_share_one_value() {
    let default = DefaultTimeout::new(Duration::from_millis(1000));
    let deadline = Deadline::from(default.clone());

    default.set(Duration::from_millis(25));

    assert_eq!(deadline.resolve(), Duration::from_millis(25));
    assert_eq!(Deadline::from(Duration::from_millis(7)).resolve(), Duration::from_millis(7));
}
