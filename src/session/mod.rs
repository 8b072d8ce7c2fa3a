//! Session ownership, navigation and the interactive run loop.

pub mod model;
pub mod navigation;
pub mod runner;

use thiserror::Error;

pub use model::Session;
pub use navigation::{NavCommand, NavEvent, NavState, Navigator, Termination};
pub use runner::{run_session, AnswerStore, PersistReport, SessionOutcome};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a session needs at least one question")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("question {target} is out of range 1-{total}")]
    JumpOutOfRange { target: usize, total: usize },
}
