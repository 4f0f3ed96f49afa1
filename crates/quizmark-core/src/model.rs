//! Core data model types for quizmark.
//!
//! A [`Form`] is an ordered list of [`Question`]s. Questions that award
//! points carry a [`RuleSpec`]: the rule exactly as written in the source
//! document. It is resolved into a typed [`ScoringRule`] only when scored,
//! so one broken rule never keeps a form from loading.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::answers::scalar_text;
use crate::error::ScoringError;

/// A loaded quiz or survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    /// Title shown above the form.
    pub title: String,
    /// Optional introduction text.
    #[serde(default)]
    pub description: String,
    /// Questions in display order. Names are unique.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Form {
    /// Look up a question by name.
    pub fn question(&self, name: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.name == name)
    }

    /// Questions that declare a scoring rule.
    pub fn scored_questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|q| q.scoring.is_some())
    }
}

/// A single question on a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Field name; the key under which the answer is submitted.
    pub name: String,
    /// Label shown to the respondent.
    pub label: String,
    /// Input control type.
    #[serde(rename = "type", default)]
    pub kind: QuestionType,
    /// Choices for select, radio, and checkbox questions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
    /// Whether the renderer should mark the field as required.
    #[serde(default)]
    pub required: bool,
    /// Scoring rule, if this question awards points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<RuleSpec>,
}

impl Question {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: QuestionType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            options: Vec::new(),
            required: false,
            scoring: None,
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options
            .into_iter()
            .map(|o| ChoiceOption::Plain(o.into()))
            .collect();
        self
    }

    pub fn with_scoring(mut self, rule: impl Into<RuleSpec>) -> Self {
        self.scoring = Some(rule.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Input control types.
///
/// Unrecognized type names are kept verbatim in `Other` and rendered as a
/// plain text input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionType {
    #[default]
    Text,
    Number,
    Select,
    Radio,
    Checkbox,
    Textarea,
    Other(String),
}

impl QuestionType {
    /// Types that present a fixed list of choices.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            QuestionType::Select | QuestionType::Radio | QuestionType::Checkbox
        )
    }

    /// Types that submit more than one value.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, QuestionType::Checkbox)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Text => write!(f, "text"),
            QuestionType::Number => write!(f, "number"),
            QuestionType::Select => write!(f, "select"),
            QuestionType::Radio => write!(f, "radio"),
            QuestionType::Checkbox => write!(f, "checkbox"),
            QuestionType::Textarea => write!(f, "textarea"),
            QuestionType::Other(other) => write!(f, "{other}"),
        }
    }
}

impl From<String> for QuestionType {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "text" => QuestionType::Text,
            "number" => QuestionType::Number,
            "select" => QuestionType::Select,
            "radio" => QuestionType::Radio,
            "checkbox" => QuestionType::Checkbox,
            "textarea" => QuestionType::Textarea,
            _ => QuestionType::Other(s),
        }
    }
}

impl From<QuestionType> for String {
    fn from(kind: QuestionType) -> Self {
        kind.to_string()
    }
}

/// One choice of a select, radio, or checkbox question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceOption {
    /// `{ value, label }`: submits `value`, displays `label`.
    Labeled {
        #[serde(deserialize_with = "deserialize_scalar")]
        value: String,
        label: String,
    },
    /// A bare value used as both the submitted value and the label.
    Plain(#[serde(deserialize_with = "deserialize_scalar")] String),
}

impl ChoiceOption {
    pub fn value(&self) -> &str {
        match self {
            ChoiceOption::Labeled { value, .. } => value,
            ChoiceOption::Plain(value) => value,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ChoiceOption::Labeled { label, .. } => label,
            ChoiceOption::Plain(value) => value,
        }
    }
}

fn deserialize_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_text(&value)
        .ok_or_else(|| serde::de::Error::custom("expected a string, number, or boolean"))
}

/// Like `deserialize_scalar`, for optional fields; null stays `None`.
pub(crate) fn deserialize_optional_scalar<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => scalar_text(&value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("expected a string, number, or boolean")),
    }
}

/// A scoring rule as written in the document, before validation.
///
/// Any value is accepted here; a rule that is not a mapping is reported
/// when the question is scored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSpec(Value);

impl RuleSpec {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(Value::Object(fields))
    }

    /// The `strategy` tag, if present and a string.
    pub fn strategy(&self) -> Option<&str> {
        self.0.get("strategy").and_then(Value::as_str)
    }

    /// The rule's `score`, if present and numeric. This is what the
    /// question adds to the possible total.
    pub fn declared_score(&self) -> Option<f64> {
        self.0.get("score").and_then(Value::as_f64)
    }

    /// Raw field access.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Resolve into a typed rule for the question called `question`.
    pub fn resolve(&self, question: &str) -> Result<ScoringRule, ScoringError> {
        if !self.0.is_object() {
            return Err(ScoringError::Configuration {
                question: question.to_string(),
                message: "scoring rule must be a mapping".into(),
            });
        }
        match self.strategy() {
            Some("exact") | Some("comprehensive") => {
                serde_json::from_value(self.0.clone()).map_err(|e| {
                    ScoringError::Configuration {
                        question: question.to_string(),
                        message: e.to_string(),
                    }
                })
            }
            Some(other) => Err(ScoringError::UnknownStrategy {
                question: question.to_string(),
                strategy: other.to_string(),
            }),
            None => Err(ScoringError::Configuration {
                question: question.to_string(),
                message: "missing `strategy`".into(),
            }),
        }
    }
}

impl From<ScoringRule> for RuleSpec {
    fn from(rule: ScoringRule) -> Self {
        RuleSpec(serde_json::to_value(rule).unwrap_or_default())
    }
}

/// A validated scoring rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ScoringRule {
    /// Full points when the answer equals `answer`, otherwise none.
    Exact { answer: Value, score: f64 },
    /// Partial credit from answer length and keyword coverage.
    Comprehensive {
        score: f64,
        min_length: f64,
        max_length: f64,
        criteria: Vec<Criterion>,
    },
}

impl ScoringRule {
    /// Maximum points this rule can award.
    pub fn score(&self) -> f64 {
        match self {
            ScoringRule::Exact { score, .. } | ScoringRule::Comprehensive { score, .. } => *score,
        }
    }

    /// The strategy tag as it appears in documents.
    pub fn strategy(&self) -> &'static str {
        match self {
            ScoringRule::Exact { .. } => "exact",
            ScoringRule::Comprehensive { .. } => "comprehensive",
        }
    }
}

/// A cluster of keywords worth `score` when all of them appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub keywords: Vec<String>,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(value: Value) -> RuleSpec {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn question_type_parse_and_display() {
        assert_eq!(QuestionType::from("Number".to_string()), QuestionType::Number);
        assert_eq!(QuestionType::from("checkbox".to_string()), QuestionType::Checkbox);
        assert_eq!(
            QuestionType::from("date".to_string()),
            QuestionType::Other("date".into())
        );
        assert_eq!(QuestionType::Textarea.to_string(), "textarea");
        assert_eq!(QuestionType::Other("date".into()).to_string(), "date");
    }

    #[test]
    fn question_type_defaults_to_text() {
        let q: Question = serde_json::from_value(json!({"name": "n", "label": "Name"})).unwrap();
        assert_eq!(q.kind, QuestionType::Text);
        assert!(!q.required);
        assert!(q.scoring.is_none());
    }

    #[test]
    fn options_accept_plain_labeled_and_numeric() {
        let q: Question = serde_json::from_value(json!({
            "name": "pick",
            "label": "Pick",
            "type": "select",
            "options": ["red", {"value": "b", "label": "Blue"}, 3]
        }))
        .unwrap();
        assert_eq!(q.options.len(), 3);
        assert_eq!(q.options[0].value(), "red");
        assert_eq!(q.options[0].label(), "red");
        assert_eq!(q.options[1].value(), "b");
        assert_eq!(q.options[1].label(), "Blue");
        assert_eq!(q.options[2].value(), "3");
    }

    #[test]
    fn resolve_exact_rule() {
        let rule = spec(json!({"strategy": "exact", "answer": 2, "score": 5}))
            .resolve("q")
            .unwrap();
        assert_eq!(
            rule,
            ScoringRule::Exact {
                answer: json!(2),
                score: 5.0
            }
        );
        assert_eq!(rule.strategy(), "exact");
    }

    #[test]
    fn resolve_comprehensive_rule() {
        let rule = spec(json!({
            "strategy": "comprehensive",
            "score": 10,
            "min_length": 10,
            "max_length": 100,
            "criteria": [{"keywords": ["cat", "dog"], "score": 5}]
        }))
        .resolve("q")
        .unwrap();
        match rule {
            ScoringRule::Comprehensive {
                score,
                min_length,
                max_length,
                criteria,
            } => {
                assert_eq!(score, 10.0);
                assert_eq!(min_length, 10.0);
                assert_eq!(max_length, 100.0);
                assert_eq!(criteria[0].keywords, vec!["cat", "dog"]);
            }
            other => panic!("unexpected rule: {other:?}"),
        }
    }

    #[test]
    fn resolve_unknown_strategy() {
        let err = spec(json!({"strategy": "fuzzy", "score": 3}))
            .resolve("q9")
            .unwrap_err();
        assert_eq!(
            err,
            ScoringError::UnknownStrategy {
                question: "q9".into(),
                strategy: "fuzzy".into()
            }
        );
    }

    #[test]
    fn resolve_missing_fields_is_configuration_error() {
        let err = spec(json!({"strategy": "comprehensive", "score": 10}))
            .resolve("essay")
            .unwrap_err();
        match err {
            ScoringError::Configuration { question, message } => {
                assert_eq!(question, "essay");
                assert!(message.contains("min_length"), "got: {message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = spec(json!({"answer": 1, "score": 1})).resolve("q").unwrap_err();
        assert!(err.to_string().contains("missing `strategy`"));
    }

    #[test]
    fn non_mapping_rule_is_configuration_error() {
        for raw in [json!("exact"), json!(5), json!(["exact", 2])] {
            let spec = spec(raw);
            assert_eq!(spec.strategy(), None);
            assert_eq!(spec.declared_score(), None);
            let err = spec.resolve("q2").unwrap_err();
            assert_eq!(
                err,
                ScoringError::Configuration {
                    question: "q2".into(),
                    message: "scoring rule must be a mapping".into()
                }
            );
        }
    }

    #[test]
    fn declared_score_ignores_non_numeric() {
        assert_eq!(
            spec(json!({"strategy": "fuzzy", "score": 4})).declared_score(),
            Some(4.0)
        );
        assert_eq!(
            spec(json!({"strategy": "exact", "score": "lots"})).declared_score(),
            None
        );
    }

    #[test]
    fn typed_rule_converts_back_to_spec() {
        let spec: RuleSpec = ScoringRule::Exact {
            answer: json!("Blue"),
            score: 3.0,
        }
        .into();
        assert_eq!(spec.strategy(), Some("exact"));
        assert_eq!(spec.declared_score(), Some(3.0));
        assert_eq!(spec.get("answer"), Some(&json!("Blue")));
    }
}
