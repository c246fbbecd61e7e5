// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Single-slot failure register.
//!
//! Spec bodies report failures here, from the runner's thread or from the
//! thread driving an async body. The first write wins; later writes are
//! ignored until the leaf runner drains the slot after the node finishes.
//!
//! Each drain starts a new generation. A thread bound to an earlier
//! generation (an async body the runner gave up on) can no longer write.

use std::cell::Cell;
use std::panic;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::code_location::CodeLocation;
use crate::types::{Failure, NodeType, SpecState};

/// Unwind payload used by [`Failer::fail_now`] and [`Failer::skip_now`].
///
/// The leaf runner recognizes it and leaves the outcome to whatever was
/// recorded in the failer, instead of reporting a panic.
#[derive(Debug)]
pub(crate) struct AbortSignal;

thread_local! {
    /// Failer identity and generation this thread's body was started under.
    static BOUND: Cell<Option<(usize, u64)>> = const { Cell::new(None) };
}

#[derive(Debug, Default)]
struct Slot {
    outcome: Option<(SpecState, Failure)>,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct Failer {
    slot: Mutex<Slot>,
}

impl Failer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure at the caller's location and keep running.
    #[track_caller]
    pub fn fail(&self, message: impl Into<String>) {
        self.fail_at(message, CodeLocation::caller());
    }

    pub fn fail_at(&self, message: impl Into<String>, location: CodeLocation) {
        self.record(
            SpecState::Failed,
            Failure {
                message: message.into(),
                location,
                ..Failure::default()
            },
        );
    }

    /// Record a failure and abort the current node.
    #[track_caller]
    pub fn fail_now(&self, message: impl Into<String>) -> ! {
        self.fail_at(message, CodeLocation::caller());
        panic::resume_unwind(Box::new(AbortSignal))
    }

    /// Mark the running spec as skipped and keep running.
    #[track_caller]
    pub fn skip(&self, message: impl Into<String>) {
        self.record(
            SpecState::Skipped,
            Failure {
                message: message.into(),
                location: CodeLocation::caller(),
                ..Failure::default()
            },
        );
    }

    /// Mark the running spec as skipped and abort the current node.
    #[track_caller]
    pub fn skip_now(&self, message: impl Into<String>) -> ! {
        self.skip(message);
        panic::resume_unwind(Box::new(AbortSignal))
    }

    pub fn panic(&self, location: CodeLocation, forwarded_panic: String) {
        self.record(
            SpecState::Panicked,
            Failure {
                message: "Test Panicked".to_string(),
                location,
                forwarded_panic: Some(forwarded_panic),
                ..Failure::default()
            },
        );
    }

    pub fn timeout(&self, location: CodeLocation) {
        self.record(
            SpecState::TimedOut,
            Failure {
                message: "Timed out".to_string(),
                location,
                ..Failure::default()
            },
        );
    }

    /// True if something has been recorded since the last drain.
    pub fn has_failure(&self) -> bool {
        self.lock().outcome.is_some()
    }

    /// The current node run; advances on every drain.
    pub(crate) fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Tie the calling thread to node run `generation`. Once that run is
    /// drained, writes from this thread are dropped.
    pub(crate) fn bind_current_thread(&self, generation: u64) {
        BOUND.with(|bound| bound.set(Some((self.id(), generation))));
    }

    /// Take the recorded outcome, stamping it with the node it belongs to.
    ///
    /// Returns `(Passed, None)` when nothing was recorded. The slot is empty
    /// afterwards.
    pub fn drain(
        &self,
        node_type: NodeType,
        node_index: Option<usize>,
        node_location: &CodeLocation,
    ) -> (SpecState, Option<Failure>) {
        let mut slot = self.lock();
        slot.generation = slot.generation.wrapping_add(1);
        match slot.outcome.take() {
            Some((state, mut failure)) => {
                failure.node_type = node_type;
                failure.node_index = node_index;
                failure.node_location = node_location.clone();
                (state, Some(failure))
            }
            None => (SpecState::Passed, None),
        }
    }

    fn record(&self, state: SpecState, failure: Failure) {
        let mut slot = self.lock();
        if self.is_stale(slot.generation) {
            tracing::debug!(
                message = %failure.message,
                "dropping outcome reported after its node finished"
            );
            return;
        }
        if slot.outcome.is_none() {
            slot.outcome = Some((state, failure));
        }
    }

    fn is_stale(&self, current: u64) -> bool {
        BOUND.with(|bound| {
            matches!(bound.get(), Some((id, generation)) if id == self.id() && generation != current)
        })
    }

    fn id(&self) -> usize {
        std::ptr::from_ref(self) as usize
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "failer_tests.rs"]
mod tests;
