//! Form and answer document loader.
//!
//! Loads forms from YAML, JSON, or TOML files and directories, and checks
//! them for configuration mistakes that would silently cost points.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::answers::Answers;
use crate::error::{FormError, ScoringError};
use crate::model::{
    deserialize_optional_scalar, ChoiceOption, Form, Question, QuestionType, RuleSpec, ScoringRule,
};

/// Title given to documents that are a bare list of questions.
pub const UNTITLED_FORM: &str = "Untitled form";

/// Document syntaxes the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFormat {
    Yaml,
    Json,
    Toml,
}

impl FormFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, FormError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
            .ok_or_else(|| FormError::UnsupportedFormat(path.display().to_string()))
    }

    /// Infer the format from an HTTP `Content-Type` value.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type.split(';').next()?.trim().to_lowercase();
        match mime.as_str() {
            "application/json" | "text/json" => Some(FormFormat::Json),
            "application/yaml" | "application/x-yaml" | "text/yaml" | "text/x-yaml" => {
                Some(FormFormat::Yaml)
            }
            "application/toml" | "text/toml" => Some(FormFormat::Toml),
            _ => None,
        }
    }
}

impl fmt::Display for FormFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormFormat::Yaml => write!(f, "yaml"),
            FormFormat::Json => write!(f, "json"),
            FormFormat::Toml => write!(f, "toml"),
        }
    }
}

impl FromStr for FormFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(FormFormat::Yaml),
            "json" => Ok(FormFormat::Json),
            "toml" => Ok(FormFormat::Toml),
            other => Err(format!("unknown document format: {other}")),
        }
    }
}

/// Intermediate structure for a form document.
#[derive(Debug, Deserialize)]
struct RawForm {
    #[serde(default = "default_title")]
    title: String,
    #[serde(default)]
    description: String,
    questions: Vec<RawQuestion>,
}

fn default_title() -> String {
    UNTITLED_FORM.to_string()
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default, deserialize_with = "deserialize_optional_scalar")]
    name: Option<String>,
    label: String,
    #[serde(rename = "type", default)]
    kind: QuestionType,
    #[serde(default)]
    options: Vec<ChoiceOption>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    scoring: Option<RuleSpec>,
}

/// Parse a form file; the format comes from the extension.
pub fn parse_form(path: &Path) -> Result<Form> {
    let format = FormFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read form file: {}", path.display()))?;

    parse_form_str(&content, format)
        .with_context(|| format!("failed to load form: {}", path.display()))
}

/// Parse a form document from a string.
///
/// The top level is either a mapping with `title`, `description`, and
/// `questions`, or a bare list of questions. Questions without a `name` are
/// named `question_<index>`. Duplicate names are rejected.
pub fn parse_form_str(content: &str, format: FormFormat) -> Result<Form, FormError> {
    let raw = match parse_value(content, format)? {
        list @ Value::Array(_) => RawForm {
            title: default_title(),
            description: String::new(),
            questions: from_value(list)?,
        },
        map @ Value::Object(_) => from_value(map)?,
        other => {
            return Err(FormError::Structure(format!(
                "expected a mapping with `questions` or a list of questions, found {}",
                value_kind(&other)
            )))
        }
    };

    let mut seen = HashSet::new();
    let mut questions = Vec::with_capacity(raw.questions.len());
    for (index, q) in raw.questions.into_iter().enumerate() {
        let name = q.name.unwrap_or_else(|| format!("question_{index}"));
        if !seen.insert(name.clone()) {
            return Err(FormError::DuplicateName(name));
        }
        questions.push(Question {
            name,
            label: q.label,
            kind: q.kind,
            options: q.options,
            required: q.required,
            scoring: q.scoring,
        });
    }

    Ok(Form {
        title: raw.title,
        description: raw.description,
        questions,
    })
}

/// Parse an answers file; the format comes from the extension.
pub fn parse_answers(path: &Path) -> Result<Answers> {
    let format = FormFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers file: {}", path.display()))?;

    parse_answers_str(&content, format)
        .with_context(|| format!("failed to load answers: {}", path.display()))
}

/// Parse an answers document: a mapping of question name to a value or
/// list of values.
pub fn parse_answers_str(content: &str, format: FormFormat) -> Result<Answers, FormError> {
    match parse_value(content, format)? {
        map @ Value::Object(_) => from_value(map),
        other => Err(FormError::Structure(format!(
            "expected a mapping of question names to answers, found {}",
            value_kind(&other)
        ))),
    }
}

/// Split a `name=value` command-line answer.
pub fn parse_answer_pair(pair: &str) -> Result<(String, String), FormError> {
    match pair.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(FormError::Structure(format!(
            "expected `name=value`, got `{pair}`"
        ))),
    }
}

/// Recursively load every form document in a directory.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_form_directory(dir: &Path) -> Result<Vec<Form>> {
    let mut forms = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            forms.extend(load_form_directory(&path)?);
        } else if FormFormat::from_path(&path).is_ok() {
            match parse_form(&path) {
                Ok(form) => forms.push(form),
                Err(e) => {
                    tracing::warn!("skipping {}: {e:#}", path.display());
                }
            }
        }
    }

    Ok(forms)
}

fn parse_value(content: &str, format: FormFormat) -> Result<Value, FormError> {
    Ok(match format {
        FormFormat::Yaml => serde_yaml::from_str(content)?,
        FormFormat::Json => serde_json::from_str(content)?,
        FormFormat::Toml => toml::from_str(content)?,
    })
}

fn from_value<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, FormError> {
    serde_json::from_value(value).map_err(|e| FormError::Structure(e.to_string()))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "an empty document",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

/// A warning from form validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question name (if applicable).
    pub question: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn new(question: &Question, message: impl Into<String>) -> Self {
        Self {
            question: Some(question.name.clone()),
            message: message.into(),
        }
    }
}

/// Check a form for mistakes that would make questions unanswerable or
/// silently score zero.
pub fn validate_form(form: &Form) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if form.questions.is_empty() {
        warnings.push(ValidationWarning {
            question: None,
            message: "form has no questions".into(),
        });
    }

    for q in &form.questions {
        if let QuestionType::Other(kind) = &q.kind {
            warnings.push(ValidationWarning::new(
                q,
                format!("unknown question type '{kind}' will be rendered as text"),
            ));
        }
        if q.kind.is_choice() && q.options.is_empty() {
            warnings.push(ValidationWarning::new(
                q,
                format!("{} question has no options", q.kind),
            ));
        }
        if !q.kind.is_choice() && !q.options.is_empty() {
            warnings.push(ValidationWarning::new(
                q,
                format!("options are ignored for {} questions", q.kind),
            ));
        }

        if let Some(spec) = &q.scoring {
            validate_rule(q, spec, &mut warnings);
        }
    }

    warnings
}

fn validate_rule(q: &Question, spec: &RuleSpec, warnings: &mut Vec<ValidationWarning>) {
    if spec.declared_score().is_none() {
        warnings.push(ValidationWarning::new(
            q,
            "scoring rule has no numeric `score`; it adds nothing to the possible total",
        ));
    }

    let rule = match spec.resolve(&q.name) {
        Ok(rule) => rule,
        Err(ScoringError::UnknownStrategy { strategy, .. }) => {
            warnings.push(ValidationWarning::new(
                q,
                format!("unknown scoring strategy '{strategy}' will score 0"),
            ));
            return;
        }
        Err(ScoringError::Configuration { message, .. }) => {
            warnings.push(ValidationWarning::new(
                q,
                format!("invalid scoring rule: {message}"),
            ));
            return;
        }
    };

    if rule.score() <= 0.0 {
        warnings.push(ValidationWarning::new(
            q,
            format!("scoring rule awards {} points", rule.score()),
        ));
    }

    match &rule {
        ScoringRule::Exact { answer, .. } => {
            if q.kind.is_choice() && !q.options.is_empty() {
                let expected: Vec<&Value> = match answer {
                    Value::Array(items) => items.iter().collect(),
                    other => vec![other],
                };
                for value in expected {
                    let known = q
                        .options
                        .iter()
                        .any(|o| crate::answers::AnswerValue::from(o.value()).matches(value));
                    if !known {
                        warnings.push(ValidationWarning::new(
                            q,
                            format!("expected answer {value} is not one of the options"),
                        ));
                    }
                }
            }
        }
        ScoringRule::Comprehensive {
            score,
            min_length,
            max_length,
            criteria,
        } => {
            if min_length > max_length {
                warnings.push(ValidationWarning::new(
                    q,
                    format!("min_length {min_length} is greater than max_length {max_length}"),
                ));
            } else if min_length == max_length {
                warnings.push(ValidationWarning::new(
                    q,
                    "min_length equals max_length; answer length earns nothing",
                ));
            }
            if criteria.is_empty() {
                warnings.push(ValidationWarning::new(
                    q,
                    "no criteria; only answer length earns points",
                ));
            }
            for (i, criterion) in criteria.iter().enumerate() {
                if criterion.keywords.is_empty() {
                    warnings.push(ValidationWarning::new(
                        q,
                        format!("criteria[{i}] has no keywords and will score 0"),
                    ));
                }
            }
            let criteria_total: f64 = criteria.iter().map(|c| c.score).sum();
            if criteria_total > *score {
                warnings.push(ValidationWarning::new(
                    q,
                    format!(
                        "criteria add up to {criteria_total}, more than the rule's score {score}; totals are capped"
                    ),
                ));
            }
        }
    }
}
