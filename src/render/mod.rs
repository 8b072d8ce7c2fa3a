//! Presentation sink interface and view models.
//!
//! The session core only ever calls into a [`PresentationSink`]; nothing it
//! renders is read back.

pub mod ansi;
pub mod output;
pub mod text;

use std::fmt;
use std::time::Duration;

use crate::core::item::{Answer, Item, SingleSelection, YesNoSelection};

pub use ansi::AnsiRenderer;

/// Which navigation hints apply at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavHints {
    pub previous: bool,
    pub next: bool,
}

impl NavHints {
    /// `position` is 1-based.
    pub fn for_position(position: usize, total: usize) -> Self {
        Self {
            previous: position > 1,
            next: position < total,
        }
    }
}

/// Inline message shown under the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A digit outside the item's accepted range.
    InvalidChoice { min: usize, max: usize },
    /// A jump target outside `1..=total`.
    JumpOutOfRange { target: usize, total: usize },
    /// Jump input that is not a number.
    InvalidJumpInput { input: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::InvalidChoice { min, max } => {
                write!(f, "Invalid choice. Press {min}-{max}")
            }
            Notice::JumpOutOfRange { total, .. } => {
                write!(f, "Invalid question number. Must be between 1 and {total}")
            }
            Notice::InvalidJumpInput { .. } => f.write_str("Invalid input"),
        }
    }
}

/// In-progress view of one item.
#[derive(Debug, Clone, Copy)]
pub struct ItemView<'a> {
    pub item: &'a Item,
    /// 1-based position.
    pub position: usize,
    pub total: usize,
    pub hints: NavHints,
    pub notice: Option<&'a Notice>,
}

/// Overview of every item and its answer.
#[derive(Debug, Clone, Copy)]
pub struct SummaryView<'a> {
    pub items: &'a [Item],
    pub answered: usize,
    pub elapsed: Duration,
}

/// One-line prompt with the text typed so far.
#[derive(Debug, Clone, Copy)]
pub struct PromptView<'a> {
    pub label: &'a str,
    pub text: &'a str,
    pub notice: Option<&'a Notice>,
}

/// Render calls made by the session core.
pub trait PresentationSink {
    fn render_item(&mut self, view: &ItemView<'_>);
    fn render_summary(&mut self, view: &SummaryView<'_>);
    fn render_prompt(&mut self, view: &PromptView<'_>);
}

impl<S: PresentationSink + ?Sized> PresentationSink for &mut S {
    fn render_item(&mut self, view: &ItemView<'_>) {
        (**self).render_item(view)
    }

    fn render_summary(&mut self, view: &SummaryView<'_>) {
        (**self).render_summary(view)
    }

    fn render_prompt(&mut self, view: &PromptView<'_>) {
        (**self).render_prompt(view)
    }
}

/// Plain-text description of an item's answer, `None` when unanswered.
pub fn describe_answer(item: &Item) -> Option<String> {
    match item.answer() {
        Answer::Single(Some(SingleSelection::Option(index))) => Some(format!(
            "Option {index}: {}",
            item.option(*index).unwrap_or_default()
        )),
        Answer::Single(Some(SingleSelection::Other(text))) => Some(format!("Other: {text}")),
        Answer::Multi(selected) if !selected.is_empty() => Some(
            selected
                .iter()
                .map(|index| format!("{index}: {}", item.option(*index).unwrap_or_default()))
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Answer::YesNo(Some(YesNoSelection::Yes)) => Some(format!("{} (1)", item.yes_no_label(1))),
        Answer::YesNo(Some(YesNoSelection::No)) => Some(format!("{} (2)", item.yes_no_label(2))),
        Answer::YesNo(Some(YesNoSelection::Other(text))) => Some(format!("Other (3): {text}")),
        _ => None,
    }
}

/// Header status such as "Selected: 1, 3 (2 options)", `None` when unanswered.
pub fn answer_status(item: &Item) -> Option<String> {
    match item.answer() {
        Answer::Multi(selected) if !selected.is_empty() => {
            let list = selected
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            let plural = if selected.len() > 1 { "s" } else { "" };
            Some(format!(
                "Selected: {list} ({} option{plural})",
                selected.len()
            ))
        }
        Answer::Single(Some(SingleSelection::Option(index))) => {
            Some(format!("Answered: Option {index}"))
        }
        _ => describe_answer(item).map(|text| format!("Answered: {text}")),
    }
}

/// Formats a duration as `1h 02m 03s`, `2m 03s` or `3s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}
