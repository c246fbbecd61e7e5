// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::thread;

use super::*;

fn close(actual: f64, expected: f64, tolerance: f64) -> bool {
    (actual - expected).abs() <= tolerance
}

#[test]
fn values_are_summarized_per_name() {
    let b = Benchmarker::new();
    b.record_value_with_info("foo", 7.0, "info!");
    b.record_value("foo", 2.0);
    b.record_value("foo", 3.0);
    b.record_value("bar", 0.3);
    b.record_value("bar", 0.1);
    b.record_value("bar", 0.5);
    b.record_value("bar", 0.7);

    let report = b.report();
    assert_eq!(report.len(), 2);

    let foo = &report["foo"];
    assert_eq!(foo.name, "foo");
    assert_eq!(foo.info.as_deref(), Some("info!"));
    assert_eq!(foo.results, vec![7.0, 2.0, 3.0]);
    assert_eq!(foo.smallest, 2.0);
    assert_eq!(foo.largest, 7.0);
    assert_eq!(foo.average, 4.0);
    assert!(close(foo.std_deviation, 2.16, 0.01));
    assert_eq!(foo.smallest_label, "Smallest");
    assert_eq!(foo.largest_label, " Largest");
    assert_eq!(foo.average_label, " Average");
    assert_eq!(foo.units, "");

    let bar = &report["bar"];
    assert!(bar.info.is_none());
    assert!(close(bar.smallest, 0.1, 1e-9));
    assert!(close(bar.largest, 0.7, 1e-9));
    assert!(close(bar.average, 0.4, 1e-9));
    assert!(close(bar.std_deviation, 0.22, 0.01));
}

#[test]
fn timings_are_recorded_in_seconds() {
    let b = Benchmarker::new();
    let elapsed = b.time_with_info("sleep", "info!", || thread::sleep(Duration::from_millis(20)));
    b.time("sleep", || thread::sleep(Duration::from_millis(10)));

    assert!(elapsed >= Duration::from_millis(20));
    let sleep = &b.report()["sleep"];
    assert_eq!(sleep.results.len(), 2);
    assert!(sleep.results[0] >= 0.02);
    assert_eq!(sleep.smallest_label, "Fastest Time");
    assert_eq!(sleep.largest_label, "Slowest Time");
    assert_eq!(sleep.average_label, "Average Time");
    assert_eq!(sleep.units, "s");
    assert_eq!(sleep.info.as_deref(), Some("info!"));
}

#[test]
fn empty_benchmarker_reports_nothing() {
    assert!(Benchmarker::new().report().is_empty());
}
