// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized default values for configuration.

use std::time::{SystemTime, UNIX_EPOCH};

/// Config file looked up from the working directory to the git root.
pub const CONFIG_FILE: &str = "grove.toml";

/// Default timeout for async bodies (ms).
pub const TIMEOUT_MS: u64 = 1000;

/// Polling interval for synchronized suite hooks (ms).
pub const POLL_INTERVAL_MS: u64 = 50;

/// Seed taken from the wall clock, in seconds.
pub fn random_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}
