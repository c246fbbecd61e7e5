// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Panic capture for node bodies.
//!
//! A process-wide panic hook is installed once. While a thread is running a
//! node body it records the panic location into a thread-local slot and
//! stays quiet; on every other thread it defers to the previous hook.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use crate::code_location::{CodeLocation, captured_backtrace};
use crate::failer::AbortSignal;

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
    static LAST_PANIC: RefCell<Option<CodeLocation>> = const { RefCell::new(None) };
}

static INSTALL_HOOK: Once = Once::new();

/// How a body stopped early.
#[derive(Debug)]
pub(crate) enum Unwound {
    /// A real panic, with its own location and rendered payload.
    Panic {
        location: CodeLocation,
        message: String,
    },
    /// `Failer::fail_now` / `Failer::skip_now`; the failer holds the outcome.
    Aborted,
}

fn install_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CAPTURING.with(Cell::get) {
                let mut location = info
                    .location()
                    .map(CodeLocation::from_location)
                    .unwrap_or_default();
                if location.full_stack_trace.is_empty() {
                    location.full_stack_trace = captured_backtrace();
                }
                LAST_PANIC.with(|slot| *slot.borrow_mut() = Some(location));
            } else {
                previous(info);
            }
        }));
    });
}

/// Run `body` on the current thread, converting an unwind into [`Unwound`].
pub(crate) fn catch<F: FnOnce()>(body: F) -> Result<(), Unwound> {
    install_hook();
    LAST_PANIC.with(|slot| slot.borrow_mut().take());
    let was_capturing = CAPTURING.with(|flag| flag.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(body));
    CAPTURING.with(|flag| flag.set(was_capturing));

    match result {
        Ok(()) => Ok(()),
        Err(payload) if payload.is::<AbortSignal>() => Err(Unwound::Aborted),
        Err(payload) => Err(Unwound::Panic {
            location: LAST_PANIC
                .with(|slot| slot.borrow_mut().take())
                .unwrap_or_default(),
            message: payload_message(payload.as_ref()),
        }),
    }
}

pub(crate) fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
