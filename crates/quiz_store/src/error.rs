use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML in {path}: {source}")]
    YamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid question document {path}: {reason}")]
    InvalidDocument { path: PathBuf, reason: String },

    #[error("question {index} in {path} is invalid: {reason}")]
    InvalidQuestion {
        path: PathBuf,
        index: usize,
        reason: String,
    },

    #[error("no questions found in {path}")]
    NoQuestions { path: PathBuf },

    #[error("failed to serialize YAML for {path}: {source}")]
    YamlSerialize {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to format current UTC timestamp as RFC3339: {0}")]
    ClockFormat(#[source] time::error::Format),
}

impl StoreError {
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn invalid_question(
        path: impl Into<PathBuf>,
        index: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidQuestion {
            path: path.into(),
            index,
            reason: reason.into(),
        }
    }
}
