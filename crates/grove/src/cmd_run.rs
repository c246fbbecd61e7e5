// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run command implementation.
//!
//! A single worker runs the suite command directly. With `--nodes N` the
//! launcher starts a coordination server, spawns N copies of the command,
//! and merges their reports into one console stream.

use std::process::{Child, Command, ExitCode, ExitStatus};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, bail};

use grove::SuiteConfig;
use grove::cli::RunArgs;
use grove::parallel::Server;
use grove::reporters::{AggregatingReporter, ConsoleReporter, Reporter};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run(args: &RunArgs) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let mut config = SuiteConfig::load(&cwd)?;
    args.apply(&mut config);
    config.validate()?;

    let Some((program, rest)) = args.command.split_first() else {
        bail!("no suite command given");
    };

    if !config.is_parallel() {
        let status = spawn(program, rest, &config)?
            .wait()
            .with_context(|| format!("failed to wait for {program}"))?;
        return Ok(exit_code(status));
    }

    run_parallel(program, rest, config)
}

fn run_parallel(program: &str, rest: &[String], mut config: SuiteConfig) -> anyhow::Result<ExitCode> {
    let total = config.parallel_total;
    let console: Box<dyn Reporter> = Box::new(ConsoleReporter::stdout(config.no_color));
    let aggregator = AggregatingReporter::new(total, vec![console]);

    let mut server = Server::new(total)?;
    server.register_reporters(vec![Box::new(aggregator.clone())]);
    server.start()?;
    config.parallel_host = Some(server.address());
    tracing::debug!(host = %server.address(), total, "coordination server started");

    let mut children = Vec::with_capacity(total);
    for node in 1..=total {
        config.parallel_node = node;
        let child = Arc::new(Mutex::new(spawn(program, rest, &config)?));
        let probe = Arc::clone(&child);
        server.register_alive(node, move || {
            let mut child = probe.lock().unwrap_or_else(PoisonError::into_inner);
            matches!(child.try_wait(), Ok(None))
        });
        children.push(child);
    }

    let statuses = wait_all(&children)?;
    let reported = aggregator.finish();
    server.close();

    let exited_cleanly = statuses.iter().all(ExitStatus::success);
    if exited_cleanly && reported {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn spawn(program: &str, rest: &[String], config: &SuiteConfig) -> anyhow::Result<Child> {
    Command::new(program)
        .args(rest)
        .envs(config.to_env())
        .spawn()
        .with_context(|| format!("failed to start {program}"))
}

/// Poll instead of blocking in `wait` so the liveness probes can still lock
/// each child.
fn wait_all(children: &[Arc<Mutex<Child>>]) -> anyhow::Result<Vec<ExitStatus>> {
    let mut statuses: Vec<Option<ExitStatus>> = vec![None; children.len()];
    while statuses.iter().any(Option::is_none) {
        for (child, status) in children.iter().zip(statuses.iter_mut()) {
            if status.is_some() {
                continue;
            }
            let mut child = child.lock().unwrap_or_else(PoisonError::into_inner);
            *status = child.try_wait().context("failed to poll worker")?;
        }
        thread::sleep(POLL_INTERVAL);
    }
    Ok(statuses.into_iter().flatten().collect())
}

fn exit_code(status: ExitStatus) -> ExitCode {
    match status.code() {
        Some(0) => ExitCode::SUCCESS,
        Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        None => ExitCode::FAILURE,
    }
}
