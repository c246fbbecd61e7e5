// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test helpers for behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub use assert_cmd::prelude::*;
pub use predicates;
pub use predicates::prelude::PredicateBooleanExt;
use std::process::Command;

/// Returns a Command configured to run the grove binary, isolated from
/// any `GROVE_*` settings in the test environment.
pub fn grove_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("grove"));
    for (key, _) in std::env::vars() {
        if key.starts_with("GROVE_") {
            cmd.env_remove(key);
        }
    }
    cmd
}
