//! Per-kind answer capture.
//!
//! Each capture call borrows exactly one item mutably, re-renders after every
//! accepted keystroke and returns on Enter or on the first navigation key.
//! Mutations made before a navigation key are kept: every single mutation
//! leaves the item in a committed, self-consistent state.

pub mod multi;
pub mod single;
pub mod text;
pub mod yes_no;

use std::io;

use crate::core::input::EventSource;
use crate::core::input_event::LogicalEvent;
use crate::core::item::{Item, ItemKind};
use crate::render::{ItemView, NavHints, Notice, PresentationSink};

pub use text::{read_line, TextEntry};

/// Label of the free-text prompt for "Other" answers.
pub const OTHER_PROMPT: &str = "Enter your answer (Other)";

/// Navigation request observed during capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Previous,
    Next,
    Jump,
    Summary,
    Quit,
    Interrupt,
}

/// How a capture call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Enter: the current answer state is committed as-is.
    Confirmed,
    Navigate(NavKey),
}

/// Position of the item being captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 1-based.
    pub position: usize,
    pub total: usize,
}

impl Progress {
    pub fn hints(self) -> NavHints {
        NavHints::for_position(self.position, self.total)
    }
}

/// Maps keys shared by every kind to navigation requests.
pub fn navigation_key(event: &LogicalEvent) -> Option<NavKey> {
    match event {
        LogicalEvent::Left => Some(NavKey::Previous),
        LogicalEvent::Right => Some(NavKey::Next),
        LogicalEvent::Interrupt => Some(NavKey::Interrupt),
        other => match other.letter()? {
            'q' => Some(NavKey::Quit),
            'j' => Some(NavKey::Jump),
            's' => Some(NavKey::Summary),
            _ => None,
        },
    }
}

/// Runs the capture protocol that matches the item's kind.
pub fn capture_answer<E, S>(
    item: &mut Item,
    progress: Progress,
    events: &mut E,
    sink: &mut S,
) -> io::Result<CaptureOutcome>
where
    E: EventSource + ?Sized,
    S: PresentationSink + ?Sized,
{
    let outcome = match item.kind() {
        ItemKind::SingleChoice => single::capture(item, progress, events, sink)?,
        ItemKind::MultiChoice => multi::capture(item, progress, events, sink)?,
        ItemKind::YesNoOther => yes_no::capture(item, progress, events, sink)?,
    };
    tracing::debug!(
        position = progress.position,
        kind = item.kind().as_str(),
        answered = item.is_answered(),
        ?outcome,
        "capture finished"
    );
    Ok(outcome)
}

/// What a kind-specific key handler did with one event.
pub(crate) enum KeyEffect {
    /// State changed (or a notice cleared); re-render.
    Changed,
    /// Key rejected with an inline notice.
    Rejected(Notice),
    /// Nothing to do; no re-render.
    Ignored,
    /// The handler ended the capture.
    Finished(CaptureOutcome),
}

/// Shared keystroke loop; `on_key` handles kind-specific keys.
pub(crate) fn capture_loop<E, S, F>(
    item: &mut Item,
    progress: Progress,
    events: &mut E,
    sink: &mut S,
    mut on_key: F,
) -> io::Result<CaptureOutcome>
where
    E: EventSource + ?Sized,
    S: PresentationSink + ?Sized,
    F: FnMut(&mut Item, LogicalEvent, &mut E, &mut S) -> io::Result<KeyEffect>,
{
    let mut notice: Option<Notice> = None;
    let mut dirty = true;

    loop {
        if dirty {
            sink.render_item(&ItemView {
                item: &*item,
                position: progress.position,
                total: progress.total,
                hints: progress.hints(),
                notice: notice.as_ref(),
            });
        }

        let event = events.next_event()?;
        if let Some(key) = navigation_key(&event) {
            return Ok(CaptureOutcome::Navigate(key));
        }
        if event == LogicalEvent::Enter {
            return Ok(CaptureOutcome::Confirmed);
        }

        match on_key(&mut *item, event, &mut *events, &mut *sink)? {
            KeyEffect::Changed => {
                notice = None;
                dirty = true;
            }
            KeyEffect::Rejected(rejected) => {
                notice = Some(rejected);
                dirty = true;
            }
            KeyEffect::Ignored => dirty = false,
            KeyEffect::Finished(outcome) => return Ok(outcome),
        }
    }
}

/// Prompts for "Other" text; `apply` stores it when non-empty.
pub(crate) fn capture_other_text<E, S, F>(
    item: &mut Item,
    events: &mut E,
    sink: &mut S,
    apply: F,
) -> io::Result<KeyEffect>
where
    E: EventSource + ?Sized,
    S: PresentationSink + ?Sized,
    F: FnOnce(&mut Item, &str),
{
    match read_line(events, sink, OTHER_PROMPT, None)? {
        TextEntry::Submitted(text) if !text.is_empty() => {
            apply(item, &text);
            Ok(KeyEffect::Changed)
        }
        TextEntry::Submitted(_) | TextEntry::Cancelled => Ok(KeyEffect::Changed),
        TextEntry::Interrupted => Ok(KeyEffect::Finished(CaptureOutcome::Navigate(
            NavKey::Interrupt,
        ))),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::io;

    use crate::core::input::EventSource;
    use crate::core::input_event::LogicalEvent;
    use crate::core::item::Answer;
    use crate::render::{ItemView, Notice, PresentationSink, PromptView, SummaryView};

    pub struct ScriptedEvents {
        events: VecDeque<LogicalEvent>,
    }

    impl ScriptedEvents {
        pub fn new(events: impl IntoIterator<Item = LogicalEvent>) -> Self {
            Self {
                events: events.into_iter().collect(),
            }
        }

        pub fn remaining(&self) -> usize {
            self.events.len()
        }
    }

    impl EventSource for ScriptedEvents {
        fn next_event(&mut self) -> io::Result<LogicalEvent> {
            self.events
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RenderedItem {
        pub position: usize,
        pub answer: Answer,
        pub notice: Option<Notice>,
    }

    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub items: Vec<RenderedItem>,
        pub summaries: Vec<usize>,
        pub prompts: Vec<String>,
        pub prompt_labels: Vec<String>,
    }

    impl PresentationSink for RecordingSink {
        fn render_item(&mut self, view: &ItemView<'_>) {
            self.items.push(RenderedItem {
                position: view.position,
                answer: view.item.answer().clone(),
                notice: view.notice.cloned(),
            });
        }

        fn render_summary(&mut self, view: &SummaryView<'_>) {
            self.summaries.push(view.answered);
        }

        fn render_prompt(&mut self, view: &PromptView<'_>) {
            self.prompts.push(view.text.to_string());
            self.prompt_labels.push(view.label.to_string());
        }
    }
}
