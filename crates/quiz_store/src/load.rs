use std::path::Path;

use mcq_tui::{Item, ItemId, ItemKind, Session};

use crate::canonical::answer_from_canonical;
use crate::document::{questions, read_document};
use crate::error::StoreError;
use crate::schema::{CanonicalAnswer, QuestionRecord};

/// Example document shown when a file cannot be loaded.
pub const EXPECTED_FORMAT: &str = r#"questions:
  - question: "What is the capital of France?"
    options:
      - "London"
      - "Paris"
      - "Berlin"
      - "Madrid"
  - question: "Which languages do you use?"
    type: multi
    options: ["Rust", "Go", "Python"]
  - question: "Ready to continue?"
    type: yesno
"#;

/// Loads every question of the document into a fresh session.
///
/// A previously saved `answer` that fits its question is restored; one that
/// does not is ignored.
pub fn load_session(path: &Path) -> Result<Session, StoreError> {
    let document = read_document(path)?;
    let records = questions(path, &document)?;
    if records.is_empty() {
        return Err(StoreError::NoQuestions {
            path: path.to_path_buf(),
        });
    }

    let items = records
        .iter()
        .enumerate()
        .map(|(index, value)| load_item(path, index + 1, value))
        .collect::<Result<Vec<_>, _>>()?;
    let restored = items.iter().filter(|item| item.is_answered()).count();
    tracing::info!(
        path = %path.display(),
        questions = items.len(),
        restored,
        "question file loaded"
    );

    Session::new(items).map_err(|_| StoreError::NoQuestions {
        path: path.to_path_buf(),
    })
}

/// `position` is 1-based and only used in errors.
fn load_item(path: &Path, position: usize, value: &serde_yaml::Value) -> Result<Item, StoreError> {
    let invalid = |reason: String| StoreError::invalid_question(path, position, reason);

    let record: QuestionRecord =
        serde_yaml::from_value(value.clone()).map_err(|err| invalid(err.to_string()))?;

    let prompt = record.question.unwrap_or_default();
    if prompt.trim().is_empty() {
        return Err(invalid("missing 'question' text".to_string()));
    }
    let kind = match record.kind.as_deref() {
        None => ItemKind::SingleChoice,
        Some(name) => ItemKind::parse(name).ok_or_else(|| {
            invalid(format!(
                "unknown type '{name}' (expected single, multi or yesno)"
            ))
        })?,
    };
    let options = record.options.iter().map(ToString::to_string).collect();

    let mut item = Item::new(kind, prompt, options).map_err(|err| invalid(err.to_string()))?;
    if let Some(id) = &record.id {
        item = item.with_id(ItemId::new(id.to_string()));
    }
    if let Some(correct) = record.correct_answer {
        item = item
            .with_reference_answer(correct)
            .map_err(|err| invalid(format!("correct_answer: {err}")))?;
    }
    if let Some(stored) = record.answer {
        restore_answer(&mut item, position, stored);
    }
    Ok(item)
}

fn restore_answer(item: &mut Item, position: usize, stored: serde_yaml::Value) {
    let answer = serde_yaml::from_value::<CanonicalAnswer>(stored)
        .ok()
        .and_then(|canonical| answer_from_canonical(item, &canonical));
    match answer.map(|answer| item.restore_answer(answer)) {
        Some(Ok(())) => {}
        Some(Err(err)) => {
            tracing::warn!(position, error = %err, "ignoring saved answer");
        }
        None => {
            tracing::warn!(
                position,
                kind = item.kind().as_str(),
                "ignoring saved answer that does not fit the question type"
            );
        }
    }
}
