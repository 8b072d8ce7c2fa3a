//! Single-choice capture: `1..=N` selects, `0` asks for free text.

use std::io;

use super::{capture_loop, capture_other_text, CaptureOutcome, KeyEffect, Progress};
use crate::core::input::EventSource;
use crate::core::input_event::LogicalEvent;
use crate::core::item::Item;
use crate::render::{Notice, PresentationSink};

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
        let LogicalEvent::Digit(digit) = event else {
            return Ok(KeyEffect::Ignored);
        };
        let count = item.options().len();
        let invalid = Notice::InvalidChoice { min: 0, max: count };

        match usize::from(digit) {
            0 => capture_other_text(item, events, sink, |item, text| {
                if let Err(err) = item.select_other(text) {
                    tracing::warn!(error = %err, "other answer rejected");
                }
            }),
            index if index <= count => Ok(match item.select_option(index) {
                Ok(()) => KeyEffect::Changed,
                Err(_) => KeyEffect::Rejected(invalid),
            }),
            _ => Ok(KeyEffect::Rejected(invalid)),
        }
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::capture;
    use crate::capture::testing::{RecordingSink, ScriptedEvents};
    use crate::capture::{CaptureOutcome, NavKey, Progress};
    use crate::core::input_event::LogicalEvent;
    use crate::core::item::{Answer, Item, ItemKind, SingleSelection};
    use crate::render::Notice;

    const PROGRESS: Progress = Progress {
        position: 1,
        total: 3,
    };

    fn capital() -> Item {
        Item::new(
            ItemKind::SingleChoice,
            "Capital of France?",
            vec!["London".into(), "Paris".into(), "Berlin".into()],
        )
        .unwrap()
    }

    #[test]
    fn last_digit_wins_and_enter_confirms() {
        let mut item = capital();
        let mut events = ScriptedEvents::new([
            LogicalEvent::Digit(1),
            LogicalEvent::Digit(2),
            LogicalEvent::Enter,
        ]);
        let mut sink = RecordingSink::default();

        let outcome = capture(&mut item, PROGRESS, &mut events, &mut sink).unwrap();
        assert_eq!(outcome, CaptureOutcome::Confirmed);
        assert_eq!(
            item.answer(),
            &Answer::Single(Some(SingleSelection::Option(2)))
        );
        assert_eq!(sink.items.len(), 3);
    }

    #[test]
    fn out_of_range_digit_shows_notice_and_keeps_state() {
        let mut item = capital();
        let mut events = ScriptedEvents::new([
            LogicalEvent::Digit(2),
            LogicalEvent::Digit(7),
            LogicalEvent::Right,
        ]);
        let mut sink = RecordingSink::default();

        let outcome = capture(&mut item, PROGRESS, &mut events, &mut sink).unwrap();
        assert_eq!(outcome, CaptureOutcome::Navigate(NavKey::Next));
        assert_eq!(
            item.answer(),
            &Answer::Single(Some(SingleSelection::Option(2)))
        );
        assert_eq!(
            sink.items.last().and_then(|view| view.notice.clone()),
            Some(Notice::InvalidChoice { min: 0, max: 3 })
        );
    }

    #[test]
    fn zero_captures_other_text() {
        let mut item = capital();
        let mut events = ScriptedEvents::new([
            LogicalEvent::Digit(0),
            LogicalEvent::Char('L'),
            LogicalEvent::Char('y'),
            LogicalEvent::Char('o'),
            LogicalEvent::Char('n'),
            LogicalEvent::Enter,
            LogicalEvent::Enter,
        ]);
        let mut sink = RecordingSink::default();

        capture(&mut item, PROGRESS, &mut events, &mut sink).unwrap();
        assert_eq!(
            item.answer(),
            &Answer::Single(Some(SingleSelection::Other("Lyon".into())))
        );
        assert_eq!(item.answer().clone(), sink.items.last().unwrap().answer);
    }

    #[test]
    fn digit_after_other_text_replaces_it() {
        let mut item = capital();
        let mut events = ScriptedEvents::new([
            LogicalEvent::Digit(0),
            LogicalEvent::Char('R'),
            LogicalEvent::Char('o'),
            LogicalEvent::Char('m'),
            LogicalEvent::Char('e'),
            LogicalEvent::Enter,
            LogicalEvent::Digit(1),
            LogicalEvent::Enter,
        ]);
        let mut sink = RecordingSink::default();

        let outcome = capture(&mut item, PROGRESS, &mut events, &mut sink).unwrap();
        assert_eq!(outcome, CaptureOutcome::Confirmed);
        assert_eq!(
            item.answer(),
            &Answer::Single(Some(SingleSelection::Option(1)))
        );
        let answers: Vec<_> = sink.items.iter().map(|view| view.answer.clone()).collect();
        assert!(answers.contains(&Answer::Single(Some(SingleSelection::Other("Rome".into())))));
        assert_eq!(
            answers.last(),
            Some(&Answer::Single(Some(SingleSelection::Option(1))))
        );
    }

    #[test]
    fn cancelled_or_empty_other_leaves_answer_unchanged() {
        let mut item = capital();
        let mut events = ScriptedEvents::new([
            LogicalEvent::Digit(3),
            LogicalEvent::Digit(0),
            LogicalEvent::Char('x'),
            LogicalEvent::Cancel,
            LogicalEvent::Digit(0),
            LogicalEvent::Char(' '),
            LogicalEvent::Enter,
            LogicalEvent::Enter,
        ]);
        let mut sink = RecordingSink::default();

        capture(&mut item, PROGRESS, &mut events, &mut sink).unwrap();
        assert_eq!(
            item.answer(),
            &Answer::Single(Some(SingleSelection::Option(3)))
        );
    }

    #[test]
    fn interrupt_inside_other_prompt_navigates() {
        let mut item = capital();
        let mut events = ScriptedEvents::new([LogicalEvent::Digit(0), LogicalEvent::Interrupt]);
        let mut sink = RecordingSink::default();

        let outcome = capture(&mut item, PROGRESS, &mut events, &mut sink).unwrap();
        assert_eq!(outcome, CaptureOutcome::Navigate(NavKey::Interrupt));
        assert!(!item.is_answered());
    }

    #[test]
    fn unrelated_keys_do_not_rerender() {
        let mut item = capital();
        let mut events = ScriptedEvents::new([
            LogicalEvent::Up,
            LogicalEvent::Cancel,
            LogicalEvent::Char('x'),
            LogicalEvent::Char('Q'),
        ]);
        let mut sink = RecordingSink::default();

        let outcome = capture(&mut item, PROGRESS, &mut events, &mut sink).unwrap();
        assert_eq!(outcome, CaptureOutcome::Navigate(NavKey::Quit));
        assert_eq!(sink.items.len(), 1);
    }
}
