// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Partition command implementation.

use std::io::Write;
use std::process::ExitCode;

use grove::cli::PartitionArgs;
use grove::partition;

/// Print each worker's slice of the spec list.
pub fn run(args: &PartitionArgs) -> anyhow::Result<ExitCode> {
    partition::validate(args.nodes, 1)?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    for node in 1..=args.nodes {
        let range = partition::index_range(args.specs, args.nodes, node)?;
        writeln!(
            handle,
            "node {node}: {}..{} ({} specs)",
            range.start,
            range.end,
            range.len()
        )?;
    }
    Ok(ExitCode::SUCCESS)
}
