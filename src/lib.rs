//! Interactive terminal engine for multiple-choice question sessions.
//!
//! Invariant: the session core only talks to the terminal through an
//! [`EventSource`] (input) and a [`PresentationSink`] (output); the raw-mode
//! handle is scoped to the session and restores the terminal on every exit
//! path.
//!
//! # Public API Overview
//! - Build [`Item`]s and a [`Session`], then drive it with [`run_session`].
//! - Acquire raw keyboard input through [`RawInput`] over a [`Terminal`]
//!   implementation ([`ProcessTerminal`] on unix).
//! - Render with [`AnsiRenderer`] or any other [`PresentationSink`].
//! - Persist answers by implementing [`AnswerStore`].

pub mod config;
pub mod logging;

pub mod capture;
pub mod core;
pub mod platform;
pub mod render;
pub mod session;

pub use crate::capture::{capture_answer, read_line, CaptureOutcome, NavKey, Progress, TextEntry};
pub use crate::config::EnvConfig;
pub use crate::core::input::{EventSource, RawInput};
pub use crate::core::input_event::{parse_logical_event, LogicalEvent};
pub use crate::core::item::{
    Answer, Item, ItemError, ItemId, ItemKind, SingleSelection, YesNoSelection,
};
pub use crate::core::terminal::{InputRead, Terminal};
pub use crate::logging::init_file_logging;
#[cfg(unix)]
pub use crate::platform::ProcessTerminal;
pub use crate::platform::stdin_buffer::{StdinBuffer, StdinBufferOptions};
pub use crate::render::{
    AnsiRenderer, ItemView, NavHints, Notice, PresentationSink, PromptView, SummaryView,
};
pub use crate::session::{
    run_session, AnswerStore, NavCommand, NavError, NavEvent, NavState, Navigator, PersistReport,
    Session, SessionError, SessionOutcome, Termination,
};
