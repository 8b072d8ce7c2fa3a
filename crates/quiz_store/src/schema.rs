use std::fmt;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// One entry of the `questions:` sequence, as read from the document.
///
/// Unknown keys are kept in the document untouched; only these are read.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuestionRecord {
    #[serde(default)]
    pub id: Option<Scalar>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub options: Vec<Scalar>,
    #[serde(default)]
    pub correct_answer: Option<usize>,
    #[serde(default)]
    pub answer: Option<Value>,
}

/// Scalar that is compared and displayed by its textual form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(value) => write!(f, "{value}"),
            Scalar::Float(value) => write!(f, "{value}"),
            Scalar::Bool(value) => write!(f, "{value}"),
            Scalar::Text(value) => f.write_str(value),
        }
    }
}

/// Persisted form of an answer, written under a record's `answer:` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanonicalAnswer {
    /// `{index, option_text}` for a SingleChoice option.
    Choice {
        index: usize,
        #[serde(alias = "option")]
        option_text: String,
    },
    /// `{type: Other, value}` for free text.
    Other {
        #[serde(rename = "type")]
        tag: OtherTag,
        value: String,
    },
    Multi {
        selected_indices: Vec<usize>,
        selected_options: Vec<String>,
    },
    /// Literal `Yes` / `No`.
    YesNo(YesNoLiteral),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OtherTag {
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNoLiteral {
    Yes,
    No,
}
