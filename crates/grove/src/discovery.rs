// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Locating `grove.toml` for a suite.
//!
//! Suites usually run from a crate directory inside a cargo workspace, so the
//! search walks upward and ends at the first project boundary: a git root or
//! a cargo workspace root, whichever comes first. A config in the boundary
//! directory itself still counts.

use std::path::{Path, PathBuf};

use crate::config::defaults::CONFIG_FILE;

/// The nearest `grove.toml` at or above `start_dir`, within its project.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    for dir in start_dir.ancestors() {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if is_project_root(dir) {
            tracing::trace!(root = %dir.display(), "no config below project root");
            break;
        }
    }
    None
}

fn is_project_root(dir: &Path) -> bool {
    dir.join(".git").exists() || is_cargo_workspace(&dir.join("Cargo.toml"))
}

/// A manifest with a `[workspace]` table. Unreadable or malformed manifests
/// are not boundaries.
fn is_cargo_workspace(manifest: &Path) -> bool {
    std::fs::read_to_string(manifest)
        .ok()
        .and_then(|text| text.parse::<toml::Table>().ok())
        .is_some_and(|table| table.contains_key("workspace"))
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
