//! Reading and atomically rewriting the question document.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::error::StoreError;

pub(crate) fn read_document(path: &Path) -> Result<Value, StoreError> {
    let content = fs::read_to_string(path)
        .map_err(|source| StoreError::io("reading question file", path, source))?;
    serde_yaml::from_str(&content).map_err(|source| StoreError::YamlParse {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn root_mapping_mut<'a>(
    path: &Path,
    document: &'a mut Value,
) -> Result<&'a mut Mapping, StoreError> {
    document
        .as_mapping_mut()
        .ok_or_else(|| StoreError::InvalidDocument {
            path: path.to_path_buf(),
            reason: "top level must be a mapping with a 'questions' key".to_string(),
        })
}

pub(crate) fn questions<'a>(path: &Path, document: &'a Value) -> Result<&'a [Value], StoreError> {
    document
        .get("questions")
        .and_then(Value::as_sequence)
        .map(Vec::as_slice)
        .ok_or_else(|| missing_questions(path))
}

pub(crate) fn questions_mut<'a>(
    path: &Path,
    root: &'a mut Mapping,
) -> Result<&'a mut Vec<Value>, StoreError> {
    root.get_mut("questions")
        .and_then(Value::as_sequence_mut)
        .ok_or_else(|| missing_questions(path))
}

fn missing_questions(path: &Path) -> StoreError {
    StoreError::InvalidDocument {
        path: path.to_path_buf(),
        reason: "'questions' key not found or not a list".to_string(),
    }
}

/// Writes through a temporary file beside the resolved target, then renames it
/// over the target. Symlinks stay in place and the target keeps its permissions.
pub(crate) fn write_document_atomic(path: &Path, document: &Value) -> Result<(), StoreError> {
    let content = serde_yaml::to_string(document).map_err(|source| StoreError::YamlSerialize {
        path: path.to_path_buf(),
        source,
    })?;

    let target = fs::canonicalize(path)
        .map_err(|source| StoreError::io("resolving question file", path, source))?;
    let permissions = fs::metadata(&target)
        .map_err(|source| StoreError::io("reading question file permissions", &target, source))?
        .permissions();

    let temp = temp_path(&target);
    fs::write(&temp, content)
        .map_err(|source| StoreError::io("writing temporary answer file", &temp, source))?;
    if let Err(source) = fs::set_permissions(&temp, permissions) {
        let _ = fs::remove_file(&temp);
        return Err(StoreError::io("copying question file permissions", &temp, source));
    }
    if let Err(source) = fs::rename(&temp, &target) {
        let _ = fs::remove_file(&temp);
        return Err(StoreError::io("replacing question file", &target, source));
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "questions.yaml".to_string());
    path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}
