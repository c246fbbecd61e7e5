// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Spec output: the per-spec writer and output interception.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::Result;

/// Writer handed to spec bodies for diagnostic output.
///
/// Buffered mode keeps a spec's output and only writes it to the sink if
/// the spec fails. Stream mode writes through immediately.
pub struct SpecWriter {
    buffer: Mutex<Vec<u8>>,
    sink: Mutex<Box<dyn Write + Send>>,
    stream: AtomicBool,
}

impl SpecWriter {
    pub fn new(sink: Box<dyn Write + Send>, stream: bool) -> Self {
        Self {
            buffer: Mutex::new(Vec::new()),
            sink: Mutex::new(sink),
            stream: AtomicBool::new(stream),
        }
    }

    pub fn stdout(stream: bool) -> Self {
        Self::new(Box::new(io::stdout()), stream)
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.load(Ordering::SeqCst)
    }

    pub fn set_streaming(&self, stream: bool) {
        self.stream.store(stream, Ordering::SeqCst);
    }

    /// Drop anything buffered for the previous spec.
    pub fn truncate(&self) {
        self.buffer().clear();
    }

    /// Write buffered output to the sink.
    pub fn dump_out(&self) -> io::Result<()> {
        if self.is_streaming() {
            return Ok(());
        }
        let buffered = std::mem::take(&mut *self.buffer());
        if buffered.is_empty() {
            return Ok(());
        }
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        sink.write_all(&buffered)?;
        sink.flush()
    }

    /// Currently buffered bytes as text.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer()).into_owned()
    }

    fn buffer(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Write for &SpecWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.is_streaming() {
            let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
            return sink.write(buf);
        }
        self.buffer().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.is_streaming() {
            let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
            return sink.flush();
        }
        Ok(())
    }
}

impl Write for SpecWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&*self).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (&*self).flush()
    }
}

/// Captures output produced while a spec runs.
///
/// The runner starts interception before each spec and attaches the
/// captured text to the spec's summary when the spec fails.
pub trait OutputInterceptor: Send {
    fn start_intercepting_output(&mut self) -> Result<()>;
    fn stop_intercepting_and_return_output(&mut self) -> Result<String>;
}

/// Interceptor over an in-memory buffer.
///
/// Anything written through a [`CaptureHandle`] while interception is on
/// is captured; writes outside that window are discarded.
#[derive(Default)]
pub struct BufferInterceptor {
    shared: Arc<Mutex<Capture>>,
}

#[derive(Default)]
struct Capture {
    active: bool,
    bytes: Vec<u8>,
}

impl BufferInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// A writer that feeds this interceptor.
    pub fn handle(&self) -> CaptureHandle {
        CaptureHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    fn capture(&self) -> MutexGuard<'_, Capture> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OutputInterceptor for BufferInterceptor {
    fn start_intercepting_output(&mut self) -> Result<()> {
        let mut capture = self.capture();
        if capture.active {
            return Err(crate::error::Error::Intercept(
                "already intercepting output".to_string(),
            ));
        }
        capture.active = true;
        capture.bytes.clear();
        Ok(())
    }

    fn stop_intercepting_and_return_output(&mut self) -> Result<String> {
        let mut capture = self.capture();
        if !capture.active {
            return Err(crate::error::Error::Intercept(
                "not intercepting output".to_string(),
            ));
        }
        capture.active = false;
        let bytes = std::mem::take(&mut capture.bytes);
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Cloneable writer into a [`BufferInterceptor`].
#[derive(Clone)]
pub struct CaptureHandle {
    shared: Arc<Mutex<Capture>>,
}

impl Write for CaptureHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut capture = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        if capture.active {
            capture.bytes.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
