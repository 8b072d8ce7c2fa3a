//! Multi-choice capture: `1..=N` toggles membership.

use std::io;

use super::{capture_loop, CaptureOutcome, KeyEffect, Progress};
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
    capture_loop(item, progress, events, sink, |item, event, _, _| {
        let LogicalEvent::Digit(digit) = event else {
            return Ok(KeyEffect::Ignored);
        };
        let count = item.options().len();
        let invalid = Notice::InvalidChoice { min: 1, max: count };
        let index = usize::from(digit);
        if index == 0 || index > count {
            return Ok(KeyEffect::Rejected(invalid));
        }
        Ok(match item.toggle_option(index) {
            Ok(_) => KeyEffect::Changed,
            Err(_) => KeyEffect::Rejected(invalid),
        })
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;

    use super::capture;
    use crate::capture::testing::{RecordingSink, ScriptedEvents};
    use crate::capture::{CaptureOutcome, NavKey, Progress};
    use crate::core::input_event::LogicalEvent;
    use crate::core::item::{Answer, Item, ItemKind};
    use crate::render::Notice;

    const PROGRESS: Progress = Progress {
        position: 2,
        total: 3,
    };

    fn languages() -> Item {
        Item::new(
            ItemKind::MultiChoice,
            "Pick languages",
            vec!["Rust".into(), "Go".into(), "C".into()],
        )
        .unwrap()
    }

    #[test]
    fn toggles_keep_ascending_set() {
        let mut item = languages();
        let mut events = ScriptedEvents::new([
            LogicalEvent::Digit(1),
            LogicalEvent::Digit(3),
            LogicalEvent::Digit(1),
            LogicalEvent::Digit(1),
            LogicalEvent::Enter,
        ]);
        let mut sink = RecordingSink::default();

        let outcome = capture(&mut item, PROGRESS, &mut events, &mut sink).unwrap();
        assert_eq!(outcome, CaptureOutcome::Confirmed);
        assert_eq!(item.answer(), &Answer::Multi(BTreeSet::from([1, 3])));
    }

    #[test]
    fn toggling_everything_off_leaves_item_unanswered() {
        let mut item = languages();
        let mut events = ScriptedEvents::new([
            LogicalEvent::Digit(2),
            LogicalEvent::Digit(2),
            LogicalEvent::Left,
        ]);
        let mut sink = RecordingSink::default();

        let outcome = capture(&mut item, PROGRESS, &mut events, &mut sink).unwrap();
        assert_eq!(outcome, CaptureOutcome::Navigate(NavKey::Previous));
        assert!(!item.is_answered());
    }

    #[test]
    fn zero_and_out_of_range_are_rejected() {
        let mut item = languages();
        let mut events = ScriptedEvents::new([
            LogicalEvent::Digit(0),
            LogicalEvent::Digit(2),
            LogicalEvent::Digit(9),
            LogicalEvent::Char('s'),
        ]);
        let mut sink = RecordingSink::default();

        let outcome = capture(&mut item, PROGRESS, &mut events, &mut sink).unwrap();
        assert_eq!(outcome, CaptureOutcome::Navigate(NavKey::Summary));
        assert_eq!(item.answer(), &Answer::Multi(BTreeSet::from([2])));

        let notices: Vec<_> = sink.items.iter().map(|view| view.notice.clone()).collect();
        let invalid = Some(Notice::InvalidChoice { min: 1, max: 3 });
        assert_eq!(notices, vec![None, invalid.clone(), None, invalid]);
    }
}
