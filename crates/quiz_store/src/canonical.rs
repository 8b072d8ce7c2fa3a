use std::collections::BTreeSet;

use mcq_tui::{Answer, Item, SingleSelection, YesNoSelection};

use crate::schema::{CanonicalAnswer, OtherTag, YesNoLiteral};

/// Persisted form of an item's answer, `None` when it is unanswered.
pub fn to_canonical(item: &Item) -> Option<CanonicalAnswer> {
    let other = |value: &str| CanonicalAnswer::Other {
        tag: OtherTag::Other,
        value: value.to_string(),
    };

    match item.answer() {
        Answer::Single(Some(SingleSelection::Option(index))) => Some(CanonicalAnswer::Choice {
            index: *index,
            option_text: item.option(*index).unwrap_or_default().to_string(),
        }),
        Answer::Single(Some(SingleSelection::Other(text))) => Some(other(text)),
        Answer::Multi(selected) if !selected.is_empty() => Some(CanonicalAnswer::Multi {
            selected_indices: selected.iter().copied().collect(),
            selected_options: selected
                .iter()
                .map(|index| item.option(*index).unwrap_or_default().to_string())
                .collect(),
        }),
        Answer::YesNo(Some(YesNoSelection::Yes)) => Some(CanonicalAnswer::YesNo(YesNoLiteral::Yes)),
        Answer::YesNo(Some(YesNoSelection::No)) => Some(CanonicalAnswer::YesNo(YesNoLiteral::No)),
        Answer::YesNo(Some(YesNoSelection::Other(text))) => Some(other(text)),
        Answer::Single(None) | Answer::Multi(_) | Answer::YesNo(None) => None,
    }
}

/// Reads a stored answer back for `item`, `None` if it does not fit the item's kind.
///
/// Option labels stored next to indices are informational; indices win.
pub fn answer_from_canonical(item: &Item, stored: &CanonicalAnswer) -> Option<Answer> {
    let answer = match (item.answer(), stored) {
        (Answer::Single(_), CanonicalAnswer::Choice { index, .. }) => {
            Answer::Single(Some(SingleSelection::Option(*index)))
        }
        (Answer::Single(_), CanonicalAnswer::Other { value, .. }) => {
            Answer::Single(Some(SingleSelection::Other(value.clone())))
        }
        (
            Answer::Multi(_),
            CanonicalAnswer::Multi {
                selected_indices, ..
            },
        ) => Answer::Multi(selected_indices.iter().copied().collect::<BTreeSet<_>>()),
        (Answer::YesNo(_), CanonicalAnswer::YesNo(YesNoLiteral::Yes)) => {
            Answer::YesNo(Some(YesNoSelection::Yes))
        }
        (Answer::YesNo(_), CanonicalAnswer::YesNo(YesNoLiteral::No)) => {
            Answer::YesNo(Some(YesNoSelection::No))
        }
        (Answer::YesNo(_), CanonicalAnswer::Other { value, .. }) => {
            Answer::YesNo(Some(YesNoSelection::Other(value.clone())))
        }
        _ => return None,
    };
    Some(answer)
}
