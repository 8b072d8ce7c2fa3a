//! Yes/No/Other capture: `1`/`y`, `2`/`n`, `3`/`o`.

use std::io;

use super::{capture_loop, capture_other_text, CaptureOutcome, KeyEffect, Progress};
use crate::core::input::EventSource;
use crate::core::input_event::LogicalEvent;
use crate::core::item::Item;
use crate::render::{Notice, PresentationSink};

enum Choice {
    Yes,
    No,
    Other,
}

fn choice_for(event: &LogicalEvent) -> Result<Option<Choice>, Notice> {
    if let LogicalEvent::Digit(digit) = event {
        return match digit {
            1 => Ok(Some(Choice::Yes)),
            2 => Ok(Some(Choice::No)),
            3 => Ok(Some(Choice::Other)),
            _ => Err(Notice::InvalidChoice { min: 1, max: 3 }),
        };
    }
    Ok(match event.letter() {
        Some('y') => Some(Choice::Yes),
        Some('n') => Some(Choice::No),
        Some('o') => Some(Choice::Other),
        _ => None,
    })
}

pub fn capture<E, S>(
    item: &mut Item,
    progress: Progress,
    events: &mut E,
    sink: &mut S,
) -> io::Result<CaptureOutcome>
where
    E: EventSource + ?Sized,
    S: PresentationSink + ?Sized,
{
    capture_loop(item, progress, events, sink, |item, event, events, sink| {
        let choice = match choice_for(&event) {
            Ok(Some(choice)) => choice,
            Ok(None) => return Ok(KeyEffect::Ignored),
            Err(notice) => return Ok(KeyEffect::Rejected(notice)),
        };
        match choice {
            Choice::Yes | Choice::No => {
                let yes = matches!(choice, Choice::Yes);
                if let Err(err) = item.choose_yes_no(yes) {
                    tracing::warn!(error = %err, "yes/no answer rejected");
                }
                Ok(KeyEffect::Changed)
            }
            Choice::Other => capture_other_text(item, events, sink, |item, text| {
                if let Err(err) = item.choose_other(text) {
                    tracing::warn!(error = %err, "other answer rejected");
                }
            }),
        }
    })
}
