// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Measurement recording for Measure specs.
//!
//! A benchmarker lives as long as its Measure node, so results accumulate
//! across all samples of the spec.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::types::Measurement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Time,
    Value,
}

#[derive(Debug)]
struct Recorded {
    kind: Kind,
    info: Option<String>,
    results: Vec<f64>,
}

/// Handed to Measure bodies to record timings and values.
#[derive(Debug, Default)]
pub struct Benchmarker {
    recorded: Mutex<BTreeMap<String, Recorded>>,
}

impl Benchmarker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time `body` and record the elapsed seconds under `name`.
    pub fn time(&self, name: &str, body: impl FnOnce()) -> Duration {
        self.timed(name, None, body)
    }

    pub fn time_with_info(&self, name: &str, info: impl Into<String>, body: impl FnOnce()) -> Duration {
        self.timed(name, Some(info.into()), body)
    }

    pub fn record_value(&self, name: &str, value: f64) {
        self.record(name, Kind::Value, None, value);
    }

    pub fn record_value_with_info(&self, name: &str, value: f64, info: impl Into<String>) {
        self.record(name, Kind::Value, Some(info.into()), value);
    }

    /// Statistics for every recorded name.
    pub fn report(&self) -> BTreeMap<String, Measurement> {
        let recorded = self.recorded.lock().unwrap_or_else(PoisonError::into_inner);
        recorded
            .iter()
            .map(|(name, entry)| (name.clone(), summarize(name, entry)))
            .collect()
    }

    fn timed(&self, name: &str, info: Option<String>, body: impl FnOnce()) -> Duration {
        let start = Instant::now();
        body();
        let elapsed = start.elapsed();
        self.record(name, Kind::Time, info, elapsed.as_secs_f64());
        elapsed
    }

    fn record(&self, name: &str, kind: Kind, info: Option<String>, value: f64) {
        let mut recorded = self.recorded.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = recorded.entry(name.to_string()).or_insert_with(|| Recorded {
            kind,
            info,
            results: Vec::new(),
        });
        entry.results.push(value);
    }
}

fn summarize(name: &str, entry: &Recorded) -> Measurement {
    let results = &entry.results;
    let count = results.len() as f64;
    let smallest = results.iter().copied().fold(f64::INFINITY, f64::min);
    let largest = results.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let average = results.iter().sum::<f64>() / count;
    let variance = results.iter().map(|r| (r - average).powi(2)).sum::<f64>() / count;

    let (smallest_label, largest_label, average_label, units) = match entry.kind {
        Kind::Time => ("Fastest Time", "Slowest Time", "Average Time", "s"),
        Kind::Value => ("Smallest", " Largest", " Average", ""),
    };

    Measurement {
        name: name.to_string(),
        info: entry.info.clone(),
        results: results.clone(),
        smallest,
        largest,
        average,
        std_deviation: variance.sqrt(),
        smallest_label: smallest_label.to_string(),
        largest_label: largest_label.to_string(),
        average_label: average_label.to_string(),
        units: units.to_string(),
    }
}

#[cfg(test)]
#[path = "benchmark_tests.rs"]
mod tests;
