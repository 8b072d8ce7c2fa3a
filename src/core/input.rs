//! Raw input channel: scoped raw-mode acquisition and logical event decoding.
//!
//! Invariant: while a [`RawInput`] exists the terminal is in raw mode; dropping
//! it restores the previous mode on every exit path, including unwinding.

use std::collections::VecDeque;
use std::io;
use std::time::Instant;

use crate::core::input_event::{parse_logical_event, LogicalEvent};
use crate::core::terminal::{InputRead, Terminal};
use crate::platform::stdin_buffer::{StdinBuffer, StdinBufferOptions};

/// Upper bound on a single blocking wait, so external interrupts are noticed.
const POLL_INTERVAL_MS: i32 = 50;
const READ_CHUNK: usize = 1024;

/// Blocking source of logical input events.
pub trait EventSource {
    /// Blocks until one complete event is decoded.
    fn next_event(&mut self) -> io::Result<LogicalEvent>;
}

impl<S: EventSource + ?Sized> EventSource for &mut S {
    fn next_event(&mut self) -> io::Result<LogicalEvent> {
        (**self).next_event()
    }
}

/// Scoped handle over a terminal held in raw mode.
pub struct RawInput<T: Terminal> {
    terminal: T,
    buffer: StdinBuffer,
    pending: VecDeque<LogicalEvent>,
    closed: bool,
    active: bool,
}

impl<T: Terminal> RawInput<T> {
    /// Puts the terminal into raw mode for the lifetime of the returned handle.
    pub fn acquire(mut terminal: T, options: StdinBufferOptions) -> io::Result<Self> {
        terminal.start()?;
        tracing::debug!(escape_timeout_ms = options.timeout_ms, "raw input acquired");
        Ok(Self {
            terminal,
            buffer: StdinBuffer::with_options(options),
            pending: VecDeque::new(),
            closed: false,
            active: true,
        })
    }

    /// Restores the terminal now, reporting any failure.
    pub fn release(mut self) -> io::Result<()> {
        self.active = false;
        self.terminal.stop()
    }

    fn fill_pending(&mut self) -> io::Result<()> {
        if self.closed {
            self.pending.push_back(LogicalEvent::Interrupt);
            return Ok(());
        }

        let mut chunk = [0u8; READ_CHUNK];
        let timeout_ms = self
            .buffer
            .next_timeout_ms(Instant::now(), POLL_INTERVAL_MS);
        let sequences = match self.terminal.read_input(&mut chunk, timeout_ms)? {
            InputRead::Bytes(len) => self.buffer.process(&chunk[..len.min(READ_CHUNK)]),
            InputRead::Timeout => self.buffer.flush_due(Instant::now()),
            InputRead::Closed => {
                tracing::info!("terminal input closed");
                self.closed = true;
                let mut rest = self.buffer.flush();
                rest.push("\x03".to_string());
                rest
            }
        };

        self.pending
            .extend(sequences.iter().map(|sequence| parse_logical_event(sequence)));
        Ok(())
    }
}

impl<T: Terminal> EventSource for RawInput<T> {
    fn next_event(&mut self) -> io::Result<LogicalEvent> {
        loop {
            if self.terminal.take_interrupt() {
                tracing::info!("external interrupt received");
                self.pending.clear();
                self.buffer.clear();
                return Ok(LogicalEvent::Interrupt);
            }
            if let Some(event) = self.pending.pop_front() {
                return Ok(event);
            }
            self.fill_pending()?;
        }
    }
}

impl<T: Terminal> Drop for RawInput<T> {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        if let Err(err) = self.terminal.stop() {
            tracing::warn!(error = %err, "failed to restore terminal mode");
        }
    }
}
