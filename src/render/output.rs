//! Typed terminal output commands and a single output gate.
//!
//! Invariant: renderer writes flow through `OutputGate::flush(..)`.

use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCmd {
    /// Text and control sequences written as-is.
    Bytes(String),
    /// One line of text followed by a line break.
    Line(String),

    ClearScreen,
    /// Clear the current line and return the carriage.
    ClearLine,
    HideCursor,
    ShowCursor,
}

impl TerminalCmd {
    pub fn bytes(data: impl Into<String>) -> Self {
        Self::Bytes(data.into())
    }

    pub fn line(data: impl Into<String>) -> Self {
        Self::Line(data.into())
    }
}

#[derive(Debug, Default)]
pub struct OutputGate {
    cmds: Vec<TerminalCmd>,
}

impl OutputGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: TerminalCmd) {
        self.cmds.push(cmd);
    }

    pub fn extend<I>(&mut self, cmds: I)
    where
        I: IntoIterator<Item = TerminalCmd>,
    {
        self.cmds.extend(cmds);
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    /// Write buffered commands in order and flush the writer.
    ///
    /// Lines end in `\r\n` so output stays aligned whether or not the tty
    /// translates newlines.
    pub fn flush<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        for cmd in self.cmds.drain(..) {
            match cmd {
                TerminalCmd::Bytes(data) => out.write_all(data.as_bytes())?,
                TerminalCmd::Line(data) => {
                    out.write_all(data.as_bytes())?;
                    out.write_all(b"\r\n")?;
                }
                TerminalCmd::ClearScreen => out.write_all(b"\x1b[2J\x1b[H")?,
                TerminalCmd::ClearLine => out.write_all(b"\r\x1b[2K")?,
                TerminalCmd::HideCursor => out.write_all(b"\x1b[?25l")?,
                TerminalCmd::ShowCursor => out.write_all(b"\x1b[?25h")?,
            }
        }
        out.flush()
    }
}
