//! Line entry on top of raw keystrokes.

use std::io;

use crate::core::input::EventSource;
use crate::core::input_event::LogicalEvent;
use crate::render::{Notice, PresentationSink, PromptView};

/// How a line prompt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEntry {
    /// Enter was pressed; the text is trimmed.
    Submitted(String),
    /// ESC was pressed.
    Cancelled,
    Interrupted,
}

/// Reads one line, echoing through the sink after every edit.
pub fn read_line<E, S>(
    events: &mut E,
    sink: &mut S,
    label: &str,
    notice: Option<&Notice>,
) -> io::Result<TextEntry>
where
    E: EventSource + ?Sized,
    S: PresentationSink + ?Sized,
{
    let mut text = String::new();
    let mut notice = notice;
    sink.render_prompt(&PromptView {
        label,
        text: &text,
        notice,
    });

    loop {
        let event = events.next_event()?;
        match event {
            LogicalEvent::Enter => return Ok(TextEntry::Submitted(text.trim().to_string())),
            LogicalEvent::Cancel => return Ok(TextEntry::Cancelled),
            LogicalEvent::Interrupt => return Ok(TextEntry::Interrupted),
            LogicalEvent::Backspace => {
                if text.pop().is_none() {
                    continue;
                }
            }
            other => match other.as_text_char() {
                Some(ch) => text.push(ch),
                None => continue,
            },
        }

        notice = None;
        sink.render_prompt(&PromptView {
            label,
            text: &text,
            notice,
        });
    }
}
