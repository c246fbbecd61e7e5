// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Benchmarks for turning a declared tree into an ordered spec list.
//!
//! Covers the work done before the first spec runs:
//! - Collating a wide, nested tree
//! - Seeded shuffling of the tree and of the flattened list
//! - Regex focus over every spec description

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use regex::Regex;

use grove::collection::SpecCollection;
use grove::leaf::{Body, SubjectNode};
use grove::tree::ContainerNode;
use grove::{CodeLocation, Failer, FlagType};

/// `groups` top-level containers, each holding `nested` containers of
/// `leaves` specs.
fn build_tree(groups: usize, nested: usize, leaves: usize) -> ContainerNode {
    let failer = Arc::new(Failer::new());
    let mut root = ContainerNode::root();
    let mut index = 0;
    for g in 0..groups {
        let mut group = ContainerNode::new(format!("group {g}"), FlagType::None, location(g));
        for n in 0..nested {
            let mut inner = ContainerNode::new(format!("context {n}"), FlagType::None, location(n));
            for l in 0..leaves {
                inner.push_subject(SubjectNode::it(
                    format!("spec {l}"),
                    Body::sync(|| {}),
                    FlagType::None,
                    location(l),
                    Duration::from_secs(1),
                    Arc::clone(&failer),
                    index,
                ));
                index += 1;
            }
            group.push_container(inner);
        }
        root.push_container(group);
    }
    root
}

fn location(line: usize) -> CodeLocation {
    CodeLocation::new("bench.rs", u32::try_from(line).unwrap_or(u32::MAX))
}

fn bench_collate(c: &mut Criterion) {
    let root = build_tree(50, 10, 20);

    c.bench_function("collate_10k", |b| {
        b.iter(|| black_box(SpecCollection::from_tree(black_box(&root)).len()))
    });
}

fn bench_shuffle(c: &mut Criterion) {
    c.bench_function("shuffle_tree_10k", |b| {
        b.iter_batched(
            || build_tree(50, 10, 20),
            |mut root| {
                root.shuffle(&mut StdRng::seed_from_u64(42));
                root
            },
            criterion::BatchSize::LargeInput,
        )
    });

    let root = build_tree(50, 10, 20);
    c.bench_function("shuffle_all_10k", |b| {
        b.iter(|| {
            let mut specs = SpecCollection::from_tree(&root);
            specs.shuffle(&mut StdRng::seed_from_u64(42));
            black_box(specs.len())
        })
    });
}

fn bench_focus(c: &mut Criterion) {
    let root = build_tree(50, 10, 20);
    let focus = Regex::new(r"group 1\d context 3").unwrap();

    c.bench_function("focus_regex_10k", |b| {
        b.iter(|| {
            let mut specs = SpecCollection::from_tree(&root);
            specs.apply_focus("Bench", Some(&focus), None);
            black_box(specs.len())
        })
    });
}

criterion_group!(benches, bench_collate, bench_shuffle, bench_focus);
criterion_main!(benches);
