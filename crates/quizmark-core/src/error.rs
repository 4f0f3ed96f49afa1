//! Error and diagnostic types.
//!
//! `FormError` is the only hard failure: a document that cannot become a
//! form at all. Everything that goes wrong inside a single question is
//! isolated to that question and surfaces as a [`ScoreNote`] on its result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A form or answer document that could not be loaded.
#[derive(Debug, Error)]
pub enum FormError {
    /// The YAML was malformed.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The JSON was malformed, or did not fit the expected shape.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The TOML was malformed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The document parsed but its top level is not a form.
    #[error("invalid document structure: {0}")]
    Structure(String),

    /// Two questions share the same name.
    #[error("duplicate question name: {0}")]
    DuplicateName(String),

    /// The format could not be inferred from the file name.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
}

/// A scoring rule that cannot be applied to its question.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// The `strategy` tag names no known strategy.
    #[error("question '{question}': unknown scoring strategy '{strategy}'")]
    UnknownStrategy { question: String, strategy: String },

    /// The rule is missing fields, or has fields of the wrong type.
    #[error("question '{question}': invalid scoring rule: {message}")]
    Configuration { question: String, message: String },
}

/// Which degenerate configuration was neutralized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "guard", rename_all = "snake_case")]
pub enum DivisionGuard {
    /// `min_length == max_length`; the length share counts as zero.
    EqualLengthBounds,
    /// A criterion with no keywords; it counts as zero.
    EmptyKeywords { criterion: usize },
}

/// Something noteworthy that happened while scoring one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreNote {
    /// No answer, or a blank one, was submitted.
    MissingAnswer,
    /// The rule's strategy is not recognized.
    UnknownStrategy { strategy: String },
    /// The rule is malformed.
    Configuration { message: String },
    /// A zero-width range or empty keyword list was skipped.
    DivisionGuard(DivisionGuard),
    /// A comprehensive rule received a multi-valued answer.
    NotFreeText,
    /// The raw sum exceeded the rule's score and was cut back.
    Capped { uncapped: f64 },
}

impl From<ScoringError> for ScoreNote {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::UnknownStrategy { strategy, .. } => ScoreNote::UnknownStrategy { strategy },
            ScoringError::Configuration { message, .. } => ScoreNote::Configuration { message },
        }
    }
}
