//! The interactive loop: capture, navigate, and persist once on termination.

use std::io;

use super::navigation::{NavCommand, NavEvent, NavState, Navigator, Termination};
use super::Session;
use crate::capture::{capture_answer, read_line, CaptureOutcome, NavKey, TextEntry};
use crate::core::input::EventSource;
use crate::core::input_event::LogicalEvent;
use crate::render::{Notice, PresentationSink, PromptView, SummaryView};

pub const QUIT_PROMPT: &str = "Quit quiz? [y/N]";

/// What a successful persist wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistReport {
    pub answered: usize,
    pub total: usize,
}

/// Durable destination for a finished session.
pub trait AnswerStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn persist(&mut self, session: &Session) -> Result<PersistReport, Self::Error>;
}

impl<A: AnswerStore + ?Sized> AnswerStore for &mut A {
    type Error = A::Error;

    fn persist(&mut self, session: &Session) -> Result<PersistReport, Self::Error> {
        (**self).persist(session)
    }
}

#[derive(Debug)]
pub struct SessionOutcome<E> {
    pub termination: Termination,
    pub persisted: Result<PersistReport, E>,
    /// Input failure that ended the session early, if any.
    pub input_error: Option<io::Error>,
    pub session: Session,
}

/// Runs the session until it terminates, then persists exactly once.
///
/// An input failure terminates the session as interrupted; answers captured
/// so far are still persisted.
pub fn run_session<E, S, A>(
    session: Session,
    events: &mut E,
    sink: &mut S,
    store: &mut A,
) -> SessionOutcome<A::Error>
where
    E: EventSource + ?Sized,
    S: PresentationSink + ?Sized,
    A: AnswerStore + ?Sized,
{
    tracing::info!(items = session.len(), "session started");
    let mut nav = Navigator::new(session);

    let input_error = loop {
        let step = match nav.state() {
            NavState::Terminated(_) => break None,
            NavState::Active => active_step(&mut nav, events, sink),
            NavState::Summary => summary_step(&nav, events, sink),
            NavState::ConfirmQuit => confirm_step(events, sink),
        };
        match step {
            Ok(Some(event)) => {
                // Only jumps can be rejected and those are resolved in `active_step`.
                if let Err(err) = nav.apply(event) {
                    tracing::warn!(error = %err, "navigation event rejected");
                }
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "input failed; terminating session");
                let _ = nav.apply(NavCommand::Interrupt);
                break Some(err);
            }
        }
    };

    let termination = match nav.state() {
        NavState::Terminated(termination) => termination,
        _ => Termination::Interrupted,
    };
    if termination == Termination::Interrupted {
        tracing::info!("session interrupted");
    }

    let session = nav.into_session();
    let persisted = store.persist(&session);
    match &persisted {
        Ok(report) => tracing::info!(
            answered = report.answered,
            total = report.total,
            "answers persisted"
        ),
        Err(err) => tracing::error!(error = %err, "failed to persist answers"),
    }

    SessionOutcome {
        termination,
        persisted,
        input_error,
        session,
    }
}

fn active_step<E, S>(
    nav: &mut Navigator,
    events: &mut E,
    sink: &mut S,
) -> io::Result<Option<NavEvent>>
where
    E: EventSource + ?Sized,
    S: PresentationSink + ?Sized,
{
    let progress = nav.progress();
    let command = match capture_answer(nav.current_item_mut(), progress, events, sink)? {
        CaptureOutcome::Confirmed => NavCommand::Next,
        CaptureOutcome::Navigate(key) => match key {
            NavKey::Previous => NavCommand::Previous,
            NavKey::Next => NavCommand::Next,
            NavKey::Summary => NavCommand::ShowSummary,
            NavKey::Quit => NavCommand::Quit,
            NavKey::Interrupt => NavCommand::Interrupt,
            NavKey::Jump => return jump_step(nav, events, sink),
        },
    };
    Ok(Some(command.into()))
}

/// Prompts until a valid target, an empty line or ESC.
fn jump_step<E, S>(
    nav: &mut Navigator,
    events: &mut E,
    sink: &mut S,
) -> io::Result<Option<NavEvent>>
where
    E: EventSource + ?Sized,
    S: PresentationSink + ?Sized,
{
    let label = format!("Jump to question (1-{})", nav.session().len());
    let mut notice = None;
    loop {
        let text = match read_line(events, sink, &label, notice.as_ref())? {
            TextEntry::Submitted(text) => text,
            TextEntry::Cancelled => return Ok(None),
            TextEntry::Interrupted => return Ok(Some(NavCommand::Interrupt.into())),
        };
        if text.is_empty() {
            return Ok(None);
        }
        let Ok(target) = text.parse::<usize>() else {
            notice = Some(Notice::InvalidJumpInput { input: text });
            continue;
        };
        match nav.apply(NavCommand::Jump(target)) {
            Ok(_) => return Ok(None),
            Err(super::NavError::JumpOutOfRange { target, total }) => {
                notice = Some(Notice::JumpOutOfRange { target, total });
            }
        }
    }
}

fn summary_step<E, S>(
    nav: &Navigator,
    events: &mut E,
    sink: &mut S,
) -> io::Result<Option<NavEvent>>
where
    E: EventSource + ?Sized,
    S: PresentationSink + ?Sized,
{
    let session = nav.session();
    sink.render_summary(&SummaryView {
        items: session.items(),
        answered: session.answered_count(),
        elapsed: session.elapsed(),
    });
    let event = match events.next_event()? {
        LogicalEvent::Interrupt => NavCommand::Interrupt.into(),
        key if key.letter() == Some('q') => NavCommand::Quit.into(),
        _ => NavEvent::Dismiss,
    };
    Ok(Some(event))
}

fn confirm_step<E, S>(events: &mut E, sink: &mut S) -> io::Result<Option<NavEvent>>
where
    E: EventSource + ?Sized,
    S: PresentationSink + ?Sized,
{
    sink.render_prompt(&PromptView {
        label: QUIT_PROMPT,
        text: "",
        notice: None,
    });
    let event = match events.next_event()? {
        LogicalEvent::Interrupt => NavCommand::Interrupt.into(),
        key => NavEvent::QuitAnswer(key.letter() == Some('y')),
    };
    Ok(Some(event))
}
