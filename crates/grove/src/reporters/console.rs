// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Colored console output: progress marks, failure details, and a summary.

use std::io::{self, Write};
use std::time::Duration;

use termcolor::{ColorSpec, StandardStream, WriteColor};

use super::Reporter;
use crate::color::{resolve_color, scheme};
use crate::config::SuiteConfig;
use crate::types::{Failure, SetupSummary, SpecState, SpecSummary, SuiteSummary};

const DIVIDER: &str = "------------------------------";

pub struct ConsoleReporter<W: WriteColor + Send> {
    out: W,
    /// Failed specs, reprinted in the closing summary.
    failures: Vec<SpecSummary>,
}

impl ConsoleReporter<StandardStream> {
    pub fn stdout(no_color: bool) -> Self {
        Self::new(StandardStream::stdout(resolve_color(false, no_color)))
    }
}

impl<W: WriteColor + Send> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            failures: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn colored(&mut self, spec: &ColorSpec, text: &str) -> io::Result<()> {
        self.out.set_color(spec)?;
        write!(self.out, "{text}")?;
        self.out.reset()
    }

    fn write_suite_header(&mut self, config: &SuiteConfig, summary: &SuiteSummary) -> io::Result<()> {
        let title = format!("Running Suite: {}", summary.suite_description);
        self.colored(&scheme::spec_text(), &title)?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", "=".repeat(title.len()))?;
        write!(self.out, "Random Seed: ")?;
        self.colored(&scheme::spec_text(), &config.random_seed.to_string())?;
        if config.randomize_all_specs {
            write!(self.out, " - Will randomize all specs")?;
        }
        writeln!(self.out)?;
        if config.is_parallel() {
            writeln!(
                self.out,
                "Running in parallel across {} processes",
                config.parallel_total
            )?;
        }
        writeln!(
            self.out,
            "Will run {} of {} specs",
            summary.number_of_specs_that_will_be_run, summary.number_of_total_specs
        )?;
        writeln!(self.out)
    }

    fn write_setup_failure(&mut self, summary: &SetupSummary) -> io::Result<()> {
        let Some(failure) = &summary.failure else {
            return Ok(());
        };
        writeln!(self.out)?;
        writeln!(self.out, "{DIVIDER}")?;
        let title = format!(
            "{} in {} [{}]",
            heading(summary.state),
            summary.node_type,
            seconds(summary.run_time)
        );
        self.colored(&scheme::fail(), &title)?;
        writeln!(self.out)?;
        self.write_location(&summary.code_location.to_string(), 0)?;
        self.write_failure(failure)?;
        self.write_captured(&summary.captured_output)?;
        writeln!(self.out, "{DIVIDER}")
    }

    fn write_spec_failure(&mut self, summary: &SpecSummary) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{DIVIDER}")?;
        let title = format!("{} [{}]", heading(summary.state), seconds(summary.run_time));
        self.colored(&scheme::fail(), &title)?;
        writeln!(self.out)?;

        let components = summary
            .component_texts
            .iter()
            .zip(&summary.component_code_locations);
        for (depth, (text, location)) in components.enumerate() {
            write!(self.out, "{}", indent(depth))?;
            self.colored(&scheme::spec_text(), text)?;
            writeln!(self.out)?;
            self.write_location(&location.to_string(), depth + 1)?;
        }

        if let Some(failure) = &summary.failure {
            self.write_failure(failure)?;
        }
        self.write_captured(&summary.captured_output)?;
        writeln!(self.out, "{DIVIDER}")
    }

    fn write_failure(&mut self, failure: &Failure) -> io::Result<()> {
        writeln!(self.out)?;
        if !failure.node_type.is_subject() && !failure.node_type.is_suite_level() {
            writeln!(
                self.out,
                "  [{}] {}",
                failure.node_type, failure.node_location
            )?;
        }
        write!(self.out, "  ")?;
        self.colored(&scheme::fail(), &failure.message)?;
        writeln!(self.out)?;
        if let Some(panic) = &failure.forwarded_panic {
            writeln!(self.out, "  {panic}")?;
        }
        writeln!(self.out)?;
        self.write_location(&failure.location.to_string(), 1)?;
        if !failure.location.full_stack_trace.is_empty() {
            writeln!(self.out)?;
            writeln!(self.out, "  Full Stack Trace")?;
            for line in failure.location.full_stack_trace.lines() {
                writeln!(self.out, "  {line}")?;
            }
        }
        Ok(())
    }

    fn write_captured(&mut self, captured: &str) -> io::Result<()> {
        if captured.is_empty() {
            return Ok(());
        }
        writeln!(self.out)?;
        writeln!(self.out, "  Captured output:")?;
        for line in captured.lines() {
            writeln!(self.out, "  {line}")?;
        }
        Ok(())
    }

    fn write_location(&mut self, location: &str, depth: usize) -> io::Result<()> {
        write!(self.out, "{}", indent(depth))?;
        self.colored(&scheme::location(), location)?;
        writeln!(self.out)
    }

    fn write_measurements(&mut self, summary: &SpecSummary) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{DIVIDER}")?;
        let title = format!(
            "\u{2022} [MEASUREMENT] {} ({} samples)",
            summary.full_text(),
            summary.number_of_samples
        );
        self.colored(&scheme::pass(), &title)?;
        writeln!(self.out)?;
        for measurement in summary.measurements.values() {
            write!(self.out, "  {}", measurement.name)?;
            if let Some(info) = &measurement.info {
                write!(self.out, " ({info})")?;
            }
            writeln!(self.out, ":")?;
            let units = &measurement.units;
            let detail = format!(
                "    {}: {:.3}{units}\n    {}: {:.3}{units}\n    {}: {:.3}{units} \u{00b1} {:.3}{units}\n",
                measurement.smallest_label.trim(),
                measurement.smallest,
                measurement.largest_label.trim(),
                measurement.largest,
                measurement.average_label.trim(),
                measurement.average,
                measurement.std_deviation,
            );
            self.colored(&scheme::detail(), &detail)?;
        }
        writeln!(self.out, "{DIVIDER}")
    }

    fn write_suite_footer(&mut self, summary: &SuiteSummary) -> io::Result<()> {
        writeln!(self.out)?;
        if !self.failures.is_empty() {
            writeln!(self.out)?;
            writeln!(self.out, "Summarizing {} Failures:", self.failures.len())?;
            for failed in std::mem::take(&mut self.failures) {
                writeln!(self.out)?;
                self.colored(&scheme::fail(), &format!("[{}]", short(failed.state)))?;
                write!(self.out, " {}", failed.full_text())?;
                if let Some(failure) = &failed.failure {
                    write!(self.out, " ")?;
                    self.colored(&scheme::location(), &failure.location.to_string())?;
                }
                writeln!(self.out)?;
            }
            writeln!(self.out)?;
        }

        writeln!(
            self.out,
            "Ran {} of {} Specs in {:.3} seconds",
            summary.number_of_specs_that_will_be_run,
            summary.number_of_total_specs,
            summary.run_time.as_secs_f64()
        )?;
        if summary.suite_succeeded {
            self.colored(&scheme::pass(), "SUCCESS!")?;
        } else {
            self.colored(&scheme::fail(), "FAIL!")?;
        }
        write!(self.out, " -- ")?;
        self.colored(&scheme::pass(), &format!("{} Passed", summary.number_of_passed_specs))?;
        write!(self.out, " | ")?;
        self.colored(&scheme::fail(), &format!("{} Failed", summary.number_of_failed_specs))?;
        write!(self.out, " | ")?;
        self.colored(&scheme::pending(), &format!("{} Pending", summary.number_of_pending_specs))?;
        write!(self.out, " | ")?;
        self.colored(&scheme::skipped(), &format!("{} Skipped", summary.number_of_skipped_specs))?;
        writeln!(self.out)?;
        self.out.flush()
    }

    fn report(&mut self, result: io::Result<()>) {
        if let Err(err) = result {
            tracing::warn!(error = %err, "failed to write console report");
        }
    }
}

impl<W: WriteColor + Send> Reporter for ConsoleReporter<W> {
    fn spec_suite_will_begin(&mut self, config: &SuiteConfig, summary: &SuiteSummary) {
        let result = self.write_suite_header(config, summary);
        self.report(result);
    }

    fn before_suite_did_run(&mut self, summary: &SetupSummary) {
        let result = self.write_setup_failure(summary);
        self.report(result);
    }

    fn spec_will_run(&mut self, _summary: &SpecSummary) {}

    fn spec_did_complete(&mut self, summary: &SpecSummary) {
        let result = match summary.state {
            SpecState::Passed if summary.is_measurement => self.write_measurements(summary),
            SpecState::Passed => self.colored(&scheme::pass(), "\u{2022}"),
            SpecState::Pending => self.colored(&scheme::pending(), "P"),
            SpecState::Skipped => self.colored(&scheme::skipped(), "S"),
            state if state.is_failure() => {
                self.failures.push(summary.clone());
                self.write_spec_failure(summary)
            }
            _ => Ok(()),
        };
        let flushed = result.and_then(|()| self.out.flush());
        self.report(flushed);
    }

    fn after_suite_did_run(&mut self, summary: &SetupSummary) {
        let result = self.write_setup_failure(summary);
        self.report(result);
    }

    fn spec_suite_did_end(&mut self, summary: &SuiteSummary) {
        let result = self.write_suite_footer(summary);
        self.report(result);
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn seconds(run_time: Duration) -> String {
    format!("{:.3} seconds", run_time.as_secs_f64())
}

fn heading(state: SpecState) -> &'static str {
    match state {
        SpecState::Panicked => "\u{2022} Panic",
        SpecState::TimedOut => "\u{2022} Failure (Timeout)",
        _ => "\u{2022} Failure",
    }
}

fn short(state: SpecState) -> &'static str {
    match state {
        SpecState::Panicked => "Panic!",
        SpecState::TimedOut => "Timeout...",
        _ => "Fail",
    }
}

#[cfg(test)]
#[path = "console_tests.rs"]
mod tests;
