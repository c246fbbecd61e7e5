// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Executes one node body under panic recovery and an optional deadline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use crossbeam_channel::{after, bounded, never, select};

use super::capture::{self, Unwound};
use super::{Body, Deadline, Done};
use crate::code_location::CodeLocation;
use crate::failer::Failer;
use crate::types::{Failure, NodeType, SpecState};

/// How the body call itself ended, before consulting the failer.
enum Completion {
    Returned,
    Panicked { location: CodeLocation, message: String },
    TimedOut,
}

/// Runs a single body and drains the shared failer afterwards.
pub struct LeafRunner {
    body: Body,
    code_location: CodeLocation,
    timeout: Deadline,
    failer: Arc<Failer>,
    node_type: NodeType,
    node_index: Option<usize>,
}

impl LeafRunner {
    /// `timeout` only applies to async bodies; zero means no deadline.
    pub fn new(
        body: Body,
        code_location: CodeLocation,
        timeout: impl Into<Deadline>,
        failer: Arc<Failer>,
        node_type: NodeType,
        node_index: Option<usize>,
    ) -> Self {
        Self {
            body,
            code_location,
            timeout: timeout.into(),
            failer,
            node_type,
            node_index,
        }
    }

    pub fn code_location(&self) -> &CodeLocation {
        &self.code_location
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn node_index(&self) -> Option<usize> {
        self.node_index
    }

    /// Run the body once.
    ///
    /// A panic in the body wins over anything the failer recorded. Otherwise
    /// the failer's first recorded outcome wins, then a timeout, then Passed.
    pub fn run(&self) -> (SpecState, Option<Failure>) {
        let completion = match &self.body {
            Body::Sync(body) => match capture::catch(|| body()) {
                Ok(()) | Err(Unwound::Aborted) => Completion::Returned,
                Err(Unwound::Panic { location, message }) => {
                    Completion::Panicked { location, message }
                }
            },
            Body::Async(body) => self.run_async(Arc::clone(body)),
        };

        match completion {
            Completion::Panicked { location, message } => {
                // Discard whatever the body reported before it panicked.
                let _ = self.drain();
                (
                    SpecState::Panicked,
                    Some(Failure {
                        message: "Test Panicked".to_string(),
                        location,
                        forwarded_panic: Some(message),
                        node_index: self.node_index,
                        node_type: self.node_type,
                        node_location: self.code_location.clone(),
                    }),
                )
            }
            Completion::TimedOut => {
                self.failer.timeout(self.code_location.clone());
                self.drain()
            }
            Completion::Returned => self.drain(),
        }
    }

    fn drain(&self) -> (SpecState, Option<Failure>) {
        self.failer
            .drain(self.node_type, self.node_index, &self.code_location)
    }

    fn run_async(&self, body: Arc<dyn Fn(Done) + Send + Sync>) -> Completion {
        let (signal, finished) = bounded::<()>(1);
        let unwound: Arc<Mutex<Option<Unwound>>> = Arc::new(Mutex::new(None));
        let abandoned = Arc::new(AtomicBool::new(false));

        let done = Done::new(signal.clone(), Arc::clone(&abandoned));
        let panic_signal = signal.clone();
        let slot = Arc::clone(&unwound);
        let failer = Arc::clone(&self.failer);
        let generation = failer.generation();
        let spawned = thread::Builder::new()
            .name("grove-async-body".to_string())
            .spawn(move || {
                failer.bind_current_thread(generation);
                if let Err(stopped) = capture::catch(move || body(done)) {
                    *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(stopped);
                    let _ = panic_signal.try_send(());
                }
            });

        if let Err(err) = spawned {
            return Completion::Panicked {
                location: self.code_location.clone(),
                message: format!("failed to spawn async body thread: {err}"),
            };
        }

        let timeout = self.timeout.resolve();
        let deadline = if timeout.is_zero() {
            never()
        } else {
            after(timeout)
        };

        let timed_out = select! {
            recv(finished) -> _ => false,
            recv(deadline) -> _ => true,
        };
        // Keeps the channel connected until the race is decided, so a body
        // that drops its handle without signalling still times out.
        drop(signal);

        if timed_out {
            abandoned.store(true, Ordering::SeqCst);
            tracing::trace!(location = %self.code_location, "async body abandoned after timeout");
        }

        let stopped = unwound.lock().unwrap_or_else(PoisonError::into_inner).take();
        match stopped {
            Some(Unwound::Panic { location, message }) => Completion::Panicked { location, message },
            Some(Unwound::Aborted) => Completion::Returned,
            None if timed_out => Completion::TimedOut,
            None => Completion::Returned,
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
