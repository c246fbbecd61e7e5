// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Splitting a spec list across parallel workers.
//!
//! Every worker builds the same spec list, so each one computes its own
//! slice from the list length alone.

use std::ops::Range;

use crate::error::{Error, Result};

/// Check a one-indexed `node` of `total` workers.
pub fn validate(total: usize, node: usize) -> Result<()> {
    if total < 1 {
        return Err(Error::InvalidParallelTotal { total });
    }
    if node < 1 || node > total {
        return Err(Error::InvalidParallelNode { node, total });
    }
    Ok(())
}

/// The `(start, count)` slice of `length` specs that worker `node` runs.
///
/// Each worker gets `length / total` rounded half up (at least one), the
/// last worker absorbs the remainder, and workers past the end get nothing.
pub fn parallelized_index_range(length: usize, total: usize, node: usize) -> Result<(usize, usize)> {
    validate(total, node)?;
    if length == 0 {
        return Ok((0, 0));
    }

    let mut count = ((2 * length + total) / (2 * total)).max(1);
    let mut start = (node - 1) * count;
    if start >= length {
        start = length;
        count = 0;
    }
    // Rounding up can push a middle worker past the end (13 specs, 8 workers).
    count = count.min(length - start);
    if node == total {
        count = length - start;
    }
    Ok((start, count))
}

/// [`parallelized_index_range`] as a range.
pub fn index_range(length: usize, total: usize, node: usize) -> Result<Range<usize>> {
    let (start, count) = parallelized_index_range(length, total, node)?;
    Ok(start..start + count)
}

#[cfg(test)]
#[path = "partition_tests.rs"]
mod tests;
