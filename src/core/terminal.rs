//! Terminal trait used by the raw input channel.

use std::io;

/// Result of one bounded read from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRead {
    /// `n` bytes were stored at the start of the buffer.
    Bytes(usize),
    /// Nothing arrived before the timeout.
    Timeout,
    /// The input stream reached end of file.
    Closed,
}

/// Minimal terminal interface for an interactive session.
pub trait Terminal {
    /// Enter raw mode: unbuffered, unechoed, no signal generation.
    fn start(&mut self) -> io::Result<()>;

    /// Restore the mode that was active before [`start`](Self::start).
    fn stop(&mut self) -> io::Result<()>;

    /// Read available bytes, waiting at most `timeout_ms` (`-1` waits forever).
    fn read_input(&mut self, buf: &mut [u8], timeout_ms: i32) -> io::Result<InputRead>;

    /// Whether an external interrupt (SIGINT/SIGTERM) arrived since the last call.
    fn take_interrupt(&mut self) -> bool;
}

impl<T: Terminal + ?Sized> Terminal for &mut T {
    fn start(&mut self) -> io::Result<()> {
        (**self).start()
    }

    fn stop(&mut self) -> io::Result<()> {
        (**self).stop()
    }

    fn read_input(&mut self, buf: &mut [u8], timeout_ms: i32) -> io::Result<InputRead> {
        (**self).read_input(buf, timeout_ms)
    }

    fn take_interrupt(&mut self) -> bool {
        (**self).take_interrupt()
    }
}
