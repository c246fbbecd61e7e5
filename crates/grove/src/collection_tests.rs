// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::benchmark::Benchmarker;
use crate::code_location::CodeLocation;
use crate::failer::Failer;
use crate::leaf::{Body, SubjectNode};
use crate::types::{FlagType, SpecState};

fn it(text: &str, flag: FlagType) -> SubjectNode {
    SubjectNode::it(
        text,
        Body::sync(|| {}),
        flag,
        CodeLocation::default(),
        Duration::ZERO,
        Arc::new(Failer::new()),
        1,
    )
}

/// A1 (focused), A2, B1 (focused), B2 (pending).
fn lettered() -> ContainerNode {
    let mut root = ContainerNode::root();
    root.push_subject(it("A1", FlagType::Focused));
    root.push_subject(it("A2", FlagType::None));
    root.push_subject(it("B1", FlagType::Focused));
    root.push_subject(it("B2", FlagType::Pending));
    root
}

fn runnable(collection: &SpecCollection<'_>) -> Vec<String> {
    collection
        .specs()
        .iter()
        .filter(|spec| !spec.is_skipped() && !spec.is_pending())
        .map(|spec| spec.concatenated_text())
        .collect()
}

fn states(collection: &SpecCollection<'_>) -> Vec<SpecState> {
    collection.specs().iter().map(|spec| spec.state()).collect()
}

// =============================================================================
// PROGRAMMATIC FOCUS
// =============================================================================

#[test]
fn programmatic_focus_without_focused_specs_is_a_no_op() {
    let mut root = ContainerNode::root();
    root.push_subject(it("A", FlagType::None));
    root.push_subject(it("B", FlagType::None));
    let mut collection = SpecCollection::from_tree(&root);

    collection.apply_focus("suite", None, None);

    assert!(!collection.has_programmatic_focus());
    assert_eq!(runnable(&collection), vec!["A", "B"]);
}

#[test]
fn programmatic_focus_runs_only_focused_specs_and_leaves_pending_alone() {
    let root = lettered();
    let mut collection = SpecCollection::from_tree(&root);

    collection.apply_focus("suite", None, None);

    assert!(collection.has_programmatic_focus());
    assert_eq!(runnable(&collection), vec!["A1", "B1"]);
    assert_eq!(
        states(&collection),
        vec![
            SpecState::Invalid,
            SpecState::Skipped,
            SpecState::Invalid,
            SpecState::Pending
        ]
    );
}

#[test]
fn focused_pending_spec_does_not_trigger_programmatic_focus() {
    let mut root = ContainerNode::root();
    let mut pending = ContainerNode::new("p", FlagType::Pending, CodeLocation::default());
    pending.push_subject(it("focused", FlagType::Focused));
    root.push_container(pending);
    root.push_subject(it("plain", FlagType::None));
    let mut collection = SpecCollection::from_tree(&root);

    collection.apply_focus("suite", None, None);

    assert!(!collection.has_programmatic_focus());
    assert_eq!(runnable(&collection), vec!["plain"]);
}

// =============================================================================
// REGEX FOCUS
// =============================================================================

#[test]
fn focus_regex_overrides_programmatic_focus() {
    let root = lettered();
    let mut collection = SpecCollection::from_tree(&root);
    let focus = Regex::new("A").unwrap();

    collection.apply_focus("suite", Some(&focus), None);

    assert_eq!(runnable(&collection), vec!["A1", "A2"]);
}

#[test]
fn skip_regex_overrides_programmatic_focus_and_keeps_pending() {
    let root = lettered();
    let mut collection = SpecCollection::from_tree(&root);
    let skip = Regex::new("A").unwrap();

    collection.apply_focus("suite", None, Some(&skip));

    assert_eq!(runnable(&collection), vec!["B1"]);
    assert_eq!(collection.specs()[3].state(), SpecState::Pending);
}

#[test]
fn regex_matches_against_description_and_container_texts() {
    let mut root = ContainerNode::root();
    let mut stack = ContainerNode::new("Stack", FlagType::None, CodeLocation::default());
    stack.push_subject(it("pushes", FlagType::None));
    root.push_container(stack);
    root.push_subject(it("unrelated", FlagType::None));

    let mut by_container = SpecCollection::from_tree(&root);
    by_container.apply_focus("Data", Some(&Regex::new("^Data Stack pushes$").unwrap()), None);
    assert_eq!(runnable(&by_container), vec!["Stack pushes"]);

    let mut by_description = SpecCollection::from_tree(&root);
    by_description.apply_focus("Data", None, Some(&Regex::new("^Data").unwrap()));
    assert!(runnable(&by_description).is_empty());
}

#[test]
fn focus_and_skip_combine() {
    let root = lettered();
    let mut collection = SpecCollection::from_tree(&root);

    collection.apply_focus(
        "suite",
        Some(&Regex::new("A|B").unwrap()),
        Some(&Regex::new("1").unwrap()),
    );

    assert_eq!(runnable(&collection), vec!["A2"]);
}

// =============================================================================
// MEASUREMENTS, SHUFFLING, PARALLEL TRIMMING
// =============================================================================

#[test]
fn skip_measurements_skips_only_measure_specs() {
    let mut root = ContainerNode::root();
    root.push_subject(it("plain", FlagType::None));
    root.push_subject(SubjectNode::measure(
        "bench",
        Arc::new(|_: &Benchmarker| {}),
        FlagType::None,
        CodeLocation::default(),
        2,
        Arc::new(Failer::new()),
        1,
    ));
    let mut collection = SpecCollection::from_tree(&root);

    collection.skip_measurements();

    assert_eq!(runnable(&collection), vec!["plain"]);
}

#[test]
fn shuffle_is_keyed_on_text() {
    let names = ["e", "a", "d", "c", "b", "f", "g"];
    let mut forward = ContainerNode::root();
    let mut backward = ContainerNode::root();
    for name in names {
        forward.push_subject(it(name, FlagType::None));
    }
    for name in names.iter().rev() {
        backward.push_subject(it(name, FlagType::None));
    }
    let mut first = SpecCollection::from_tree(&forward);
    let mut second = SpecCollection::from_tree(&backward);

    first.shuffle(&mut StdRng::seed_from_u64(42));
    second.shuffle(&mut StdRng::seed_from_u64(42));

    assert_eq!(runnable(&first), runnable(&second));
    assert_eq!(first.len(), names.len());
}

#[test]
fn trimming_keeps_the_worker_slice_and_remembers_the_original_count() {
    let mut root = ContainerNode::root();
    for i in 0..10 {
        root.push_subject(it(&format!("spec {i}"), FlagType::None));
    }
    let mut collection = SpecCollection::from_tree(&root);

    collection.trim_for_parallelization(3, 2).unwrap();

    assert_eq!(collection.number_of_original_specs(), 10);
    assert_eq!(runnable(&collection), vec!["spec 3", "spec 4", "spec 5"]);
}

#[test]
fn trimming_rejects_invalid_workers() {
    let root = lettered();
    let mut collection = SpecCollection::from_tree(&root);

    assert!(collection.trim_for_parallelization(2, 3).is_err());
    assert_eq!(collection.len(), 4);
}
