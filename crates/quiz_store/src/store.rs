use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use mcq_tui::{AnswerStore, Item, PersistReport, Session};
use serde_yaml::{Mapping, Number, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::canonical::to_canonical;
use crate::document::{questions_mut, read_document, root_mapping_mut, write_document_atomic};
use crate::error::StoreError;
use crate::schema::Scalar;

type Clock = Box<dyn FnMut() -> OffsetDateTime>;

/// Writes answers back into the question document they were loaded from.
pub struct YamlAnswerStore {
    path: PathBuf,
    clock: Clock,
}

impl fmt::Debug for YamlAnswerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YamlAnswerStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl YamlAnswerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, OffsetDateTime::now_utc)
    }

    /// Uses `clock` for `metadata.last_answered`.
    pub fn with_clock(
        path: impl Into<PathBuf>,
        clock: impl FnMut() -> OffsetDateTime + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            clock: Box::new(clock),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn timestamp(&mut self) -> Result<String, StoreError> {
        (self.clock)()
            .to_offset(time::UtcOffset::UTC)
            .format(&Rfc3339)
            .map_err(StoreError::ClockFormat)
    }
}

impl AnswerStore for YamlAnswerStore {
    type Error = StoreError;

    fn persist(&mut self, session: &Session) -> Result<PersistReport, StoreError> {
        let timestamp = self.timestamp()?;
        let path = self.path.clone();
        let mut document = read_document(&path)?;
        let root = root_mapping_mut(&path, &mut document)?;

        let items = session.items();
        let by_id = unique_ids(items);

        let records = questions_mut(&path, root)?;
        for (index, record) in records.iter_mut().enumerate() {
            let Some(record) = record.as_mapping_mut() else {
                tracing::warn!(position = index + 1, "skipping question that is not a mapping");
                continue;
            };
            let item = record_id(record)
                .and_then(|id| by_id.get(id.as_str()).copied().flatten())
                .or_else(|| items.get(index));
            let Some(item) = item else {
                continue;
            };
            write_answer(&path, record, item)?;
        }

        let report = PersistReport {
            answered: session.answered_count(),
            total: session.len(),
        };
        write_metadata(root, &timestamp, &report);
        write_document_atomic(&path, &document)?;
        tracing::debug!(path = %path.display(), "question file rewritten");
        Ok(report)
    }
}

/// Items keyed by id. Shared ids map to `None` so those records match by position.
fn unique_ids(items: &[Item]) -> HashMap<&str, Option<&Item>> {
    let mut by_id = HashMap::new();
    for item in items {
        let Some(id) = item.id() else {
            continue;
        };
        by_id
            .entry(id.as_str())
            .and_modify(|entry| *entry = None)
            .or_insert(Some(item));
    }
    by_id
}

fn record_id(record: &Mapping) -> Option<String> {
    let value = record.get("id")?;
    serde_yaml::from_value::<Scalar>(value.clone())
        .ok()
        .map(|id| id.to_string())
}

/// Sets or clears `answer`, keeping the key's position when it already exists.
fn write_answer(path: &Path, record: &mut Mapping, item: &Item) -> Result<(), StoreError> {
    match to_canonical(item) {
        Some(canonical) => {
            let value =
                serde_yaml::to_value(canonical).map_err(|source| StoreError::YamlSerialize {
                    path: path.to_path_buf(),
                    source,
                })?;
            record.insert(Value::String("answer".to_string()), value);
        }
        None => {
            record.shift_remove("answer");
        }
    }
    Ok(())
}

fn write_metadata(root: &mut Mapping, timestamp: &str, report: &PersistReport) {
    let key = Value::String("metadata".to_string());
    if !root.get(&key).is_some_and(Value::is_mapping) {
        root.insert(key.clone(), Value::Mapping(Mapping::new()));
    }
    let Some(metadata) = root.get_mut(&key).and_then(Value::as_mapping_mut) else {
        return;
    };
    metadata.insert(
        Value::String("last_answered".to_string()),
        Value::String(timestamp.to_string()),
    );
    metadata.insert(
        Value::String("answered_count".to_string()),
        Value::Number(Number::from(report.answered as u64)),
    );
    metadata.insert(
        Value::String("total_questions".to_string()),
        Value::Number(Number::from(report.total as u64)),
    );
}
