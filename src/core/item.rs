//! Question items and their kind-specific answer slots.
//!
//! Invariant: an item's answer is either empty or fully populated for its kind.
//! The kind is fixed by the [`Answer`] variant chosen at construction; every
//! mutation below stays inside that variant.

use std::collections::BTreeSet;
use std::fmt;

/// Interaction mode of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    SingleChoice,
    MultiChoice,
    YesNoOther,
}

impl ItemKind {
    /// Short label used in badges and the summary table.
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::SingleChoice => "single-select",
            ItemKind::MultiChoice => "multi-select",
            ItemKind::YesNoOther => "yes/no",
        }
    }

    /// Document spelling of the kind (`type:` field).
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::SingleChoice => "single",
            ItemKind::MultiChoice => "multi",
            ItemKind::YesNoOther => "yesno",
        }
    }

    /// Parses the document spelling, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "single" => Some(ItemKind::SingleChoice),
            "multi" => Some(ItemKind::MultiChoice),
            "yesno" => Some(ItemKind::YesNoOther),
            _ => None,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stable identifier used to match an item back to its source record.
///
/// Numeric and string ids are compared by their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Committed SingleChoice selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SingleSelection {
    /// 1-based option index.
    Option(usize),
    Other(String),
}

impl SingleSelection {
    /// `0` for Other, otherwise the 1-based option index.
    pub fn selected_index(&self) -> usize {
        match self {
            SingleSelection::Option(index) => *index,
            SingleSelection::Other(_) => 0,
        }
    }
}

/// Committed YesNoOther selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YesNoSelection {
    Yes,
    No,
    Other(String),
}

impl YesNoSelection {
    /// `1` = Yes, `2` = No, `3` = Other.
    pub fn choice(&self) -> u8 {
        match self {
            YesNoSelection::Yes => 1,
            YesNoSelection::No => 2,
            YesNoSelection::Other(_) => 3,
        }
    }
}

/// Kind-dependent answer slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Single(Option<SingleSelection>),
    Multi(BTreeSet<usize>),
    YesNo(Option<YesNoSelection>),
}

impl Answer {
    pub fn empty(kind: ItemKind) -> Self {
        match kind {
            ItemKind::SingleChoice => Answer::Single(None),
            ItemKind::MultiChoice => Answer::Multi(BTreeSet::new()),
            ItemKind::YesNoOther => Answer::YesNo(None),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Answer::Single(_) => ItemKind::SingleChoice,
            Answer::Multi(_) => ItemKind::MultiChoice,
            Answer::YesNo(_) => ItemKind::YesNoOther,
        }
    }

    /// An empty MultiChoice subset counts as unanswered.
    pub fn is_answered(&self) -> bool {
        match self {
            Answer::Single(selection) => selection.is_some(),
            Answer::Multi(selected) => !selected.is_empty(),
            Answer::YesNo(selection) => selection.is_some(),
        }
    }
}

/// Default labels for YesNoOther items without options.
pub const YES_NO_LABELS: [&str; 2] = ["Yes", "No"];

/// Rejected attempts to build or mutate an [`Item`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    #[error("question text is empty")]
    EmptyPrompt,
    #[error("{kind} questions need at least one option")]
    MissingOptions { kind: ItemKind },
    #[error("option {index} is out of range 1-{count}")]
    OptionOutOfRange { index: usize, count: usize },
    #[error("\"Other\" answers need non-empty text")]
    EmptyOtherText,
    #[error("answer for a {found} question does not fit a {expected} question")]
    KindMismatch { expected: ItemKind, found: ItemKind },
}

/// One question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: Option<ItemId>,
    prompt: String,
    options: Vec<String>,
    reference_answer: Option<usize>,
    answer: Answer,
}

impl Item {
    /// Builds an unanswered item. Prompt and option labels are trimmed.
    ///
    /// YesNoOther items without options get the `Yes`/`No` pair.
    pub fn new(
        kind: ItemKind,
        prompt: impl Into<String>,
        options: Vec<String>,
    ) -> Result<Self, ItemError> {
        let prompt = prompt.into().trim().to_string();
        if prompt.is_empty() {
            return Err(ItemError::EmptyPrompt);
        }

        let mut options: Vec<String> = options
            .into_iter()
            .map(|option| option.trim().to_string())
            .collect();
        match kind {
            ItemKind::SingleChoice | ItemKind::MultiChoice if options.is_empty() => {
                return Err(ItemError::MissingOptions { kind });
            }
            ItemKind::YesNoOther if options.is_empty() => {
                options = YES_NO_LABELS.iter().map(|label| label.to_string()).collect();
            }
            _ => {}
        }

        Ok(Self {
            id: None,
            prompt,
            options,
            reference_answer: None,
            answer: Answer::empty(kind),
        })
    }

    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = Some(id);
        self
    }

    /// Attaches a 1-based reference answer used for feedback only.
    pub fn with_reference_answer(mut self, index: usize) -> Result<Self, ItemError> {
        self.check_option(index)?;
        self.reference_answer = Some(index);
        Ok(self)
    }

    /// Replaces the answer slot wholesale, validating it against this item.
    pub fn restore_answer(&mut self, answer: Answer) -> Result<(), ItemError> {
        if answer.kind() != self.kind() {
            return Err(ItemError::KindMismatch {
                expected: self.kind(),
                found: answer.kind(),
            });
        }
        match &answer {
            Answer::Single(Some(SingleSelection::Option(index))) => self.check_option(*index)?,
            Answer::Single(Some(SingleSelection::Other(text)))
            | Answer::YesNo(Some(YesNoSelection::Other(text))) => {
                if text.trim().is_empty() {
                    return Err(ItemError::EmptyOtherText);
                }
            }
            Answer::Multi(selected) => {
                for index in selected {
                    self.check_option(*index)?;
                }
            }
            Answer::Single(None) | Answer::YesNo(_) => {}
        }
        self.answer = answer;
        Ok(())
    }

    pub fn id(&self) -> Option<&ItemId> {
        self.id.as_ref()
    }

    pub fn kind(&self) -> ItemKind {
        self.answer.kind()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Label for a 1-based option index.
    pub fn option(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|zero_based| self.options.get(zero_based))
            .map(String::as_str)
    }

    pub fn reference_answer(&self) -> Option<usize> {
        self.reference_answer
    }

    pub fn answer(&self) -> &Answer {
        &self.answer
    }

    pub fn is_answered(&self) -> bool {
        self.answer.is_answered()
    }

    /// `Some(true)` when a SingleChoice answer matches the reference answer.
    pub fn matches_reference(&self) -> Option<bool> {
        let reference = self.reference_answer?;
        match &self.answer {
            Answer::Single(Some(selection)) => Some(selection.selected_index() == reference),
            Answer::Single(None) => None,
            Answer::Multi(selected) if !selected.is_empty() => {
                Some(selected.len() == 1 && selected.contains(&reference))
            }
            Answer::YesNo(Some(selection)) => Some(usize::from(selection.choice()) == reference),
            _ => None,
        }
    }

    /// SingleChoice: selects a 1-based option, dropping any Other text.
    pub fn select_option(&mut self, index: usize) -> Result<(), ItemError> {
        self.check_option(index)?;
        let Answer::Single(selection) = &mut self.answer else {
            return Err(self.mismatch(ItemKind::SingleChoice));
        };
        *selection = Some(SingleSelection::Option(index));
        Ok(())
    }

    /// SingleChoice: selects "Other" with the given free text.
    pub fn select_other(&mut self, text: &str) -> Result<(), ItemError> {
        let text = non_empty_text(text)?;
        let Answer::Single(selection) = &mut self.answer else {
            return Err(self.mismatch(ItemKind::SingleChoice));
        };
        *selection = Some(SingleSelection::Other(text));
        Ok(())
    }

    /// MultiChoice: toggles membership of a 1-based option index.
    ///
    /// Returns whether the index is selected afterwards.
    pub fn toggle_option(&mut self, index: usize) -> Result<bool, ItemError> {
        self.check_option(index)?;
        let Answer::Multi(selected) = &mut self.answer else {
            return Err(self.mismatch(ItemKind::MultiChoice));
        };
        if selected.remove(&index) {
            Ok(false)
        } else {
            selected.insert(index);
            Ok(true)
        }
    }

    /// YesNoOther: sets Yes (`true`) or No (`false`).
    pub fn choose_yes_no(&mut self, yes: bool) -> Result<(), ItemError> {
        let Answer::YesNo(selection) = &mut self.answer else {
            return Err(self.mismatch(ItemKind::YesNoOther));
        };
        *selection = Some(if yes {
            YesNoSelection::Yes
        } else {
            YesNoSelection::No
        });
        Ok(())
    }

    /// YesNoOther: sets Other with the given free text.
    pub fn choose_other(&mut self, text: &str) -> Result<(), ItemError> {
        let text = non_empty_text(text)?;
        let Answer::YesNo(selection) = &mut self.answer else {
            return Err(self.mismatch(ItemKind::YesNoOther));
        };
        *selection = Some(YesNoSelection::Other(text));
        Ok(())
    }

    /// Label shown for a YesNoOther choice (`1` or `2`).
    pub fn yes_no_label(&self, choice: u8) -> &str {
        let fallback = match choice {
            1 => YES_NO_LABELS[0],
            _ => YES_NO_LABELS[1],
        };
        self.option(usize::from(choice)).unwrap_or(fallback)
    }

    fn check_option(&self, index: usize) -> Result<(), ItemError> {
        if index == 0 || index > self.options.len() {
            return Err(ItemError::OptionOutOfRange {
                index,
                count: self.options.len(),
            });
        }
        Ok(())
    }

    fn mismatch(&self, expected: ItemKind) -> ItemError {
        ItemError::KindMismatch {
            expected,
            found: self.kind(),
        }
    }
}

fn non_empty_text(text: &str) -> Result<String, ItemError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ItemError::EmptyOtherText);
    }
    Ok(text.to_string())
}
