//! Submitted answers.
//!
//! Answers arrive the way an HTML form serializes them: every field name
//! maps to a string, and fields submitted more than once (checkboxes) map
//! to a list of strings.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The value submitted for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Single(String),
    Multiple(Vec<String>),
}

impl AnswerValue {
    /// The free-text content, if this is a single value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Single(s) => Some(s),
            AnswerValue::Multiple(_) => None,
        }
    }

    /// An empty string or an empty list counts as no answer.
    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Single(s) => s.is_empty(),
            AnswerValue::Multiple(values) => values.is_empty(),
        }
    }

    /// Structural equality against an expected answer from an exact rule.
    ///
    /// Scalars compare by their textual form, except that a numeric
    /// expectation compares numerically with the submitted text, so `2`
    /// matches `"2"` and `"2.0"`. Lists compare element-wise in order, and a
    /// one-element list is interchangeable with its only element.
    pub fn matches(&self, expected: &Value) -> bool {
        match (expected, self) {
            (Value::Array(items), AnswerValue::Multiple(values)) => {
                items.len() == values.len()
                    && items
                        .iter()
                        .zip(values)
                        .all(|(item, value)| scalar_matches(item, value))
            }
            (Value::Array(items), AnswerValue::Single(value)) => {
                items.len() == 1 && scalar_matches(&items[0], value)
            }
            (expected, AnswerValue::Multiple(values)) => {
                values.len() == 1 && scalar_matches(expected, &values[0])
            }
            (expected, AnswerValue::Single(value)) => scalar_matches(expected, value),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            AnswerValue::Single(first) => {
                let first = std::mem::take(first);
                *self = AnswerValue::Multiple(vec![first, value]);
            }
            AnswerValue::Multiple(values) => values.push(value),
        }
    }
}

impl std::fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerValue::Single(s) => write!(f, "{s:?}"),
            AnswerValue::Multiple(values) => write!(f, "{values:?}"),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        AnswerValue::Single(s.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        AnswerValue::Single(s)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(values: Vec<String>) -> Self {
        AnswerValue::Multiple(values)
    }
}

impl TryFrom<Value> for AnswerValue {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            // `essay:` with nothing after it
            Value::Null => Ok(AnswerValue::Single(String::new())),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    scalar_text(item).ok_or_else(|| format!("unsupported list item: {item}"))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(AnswerValue::Multiple),
            other => scalar_text(&other)
                .map(AnswerValue::Single)
                .ok_or_else(|| format!("unsupported answer value: {other}")),
        }
    }
}

impl<'de> Deserialize<'de> for AnswerValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        AnswerValue::try_from(value).map_err(serde::de::Error::custom)
    }
}

/// The full submission, keyed by question name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(BTreeMap<String, AnswerValue>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build answers from `(name, value)` pairs in submission order.
    ///
    /// A name seen once maps to a single value; a name seen again is
    /// promoted to a list holding every value in order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut answers: BTreeMap<String, AnswerValue> = BTreeMap::new();
        for (name, value) in pairs {
            match answers.entry(name.into()) {
                Entry::Occupied(mut existing) => existing.get_mut().push(value.into()),
                Entry::Vacant(slot) => {
                    slot.insert(AnswerValue::Single(value.into()));
                }
            }
        }
        Self(answers)
    }

    pub fn get(&self, name: &str) -> Option<&AnswerValue> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AnswerValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Answers
where
    K: Into<String>,
    V: Into<AnswerValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Textual form of a scalar JSON value; `None` for null, lists, and maps.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn scalar_matches(expected: &Value, submitted: &str) -> bool {
    match expected {
        Value::Number(n) => match (n.as_f64(), submitted.trim().parse::<f64>()) {
            (Some(want), Ok(got)) => want == got,
            _ => false,
        },
        other => scalar_text(other).is_some_and(|want| want == submitted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_expectation_matches_text() {
        let answer = AnswerValue::from("2");
        assert!(answer.matches(&json!(2)));
        assert!(AnswerValue::from(" 2.0 ").matches(&json!(2)));
        assert!(!AnswerValue::from("3").matches(&json!(2)));
        assert!(!AnswerValue::from("two").matches(&json!(2)));
    }

    #[test]
    fn string_expectation_is_exact() {
        assert!(AnswerValue::from("Blue").matches(&json!("Blue")));
        assert!(!AnswerValue::from("blue").matches(&json!("Blue")));
        assert!(AnswerValue::from("6").matches(&json!("6")));
    }

    #[test]
    fn boolean_and_null_expectations() {
        assert!(AnswerValue::from("true").matches(&json!(true)));
        assert!(!AnswerValue::from("yes").matches(&json!(true)));
        assert!(!AnswerValue::from("").matches(&Value::Null));
    }

    #[test]
    fn lists_compare_in_order() {
        let answer = AnswerValue::Multiple(vec!["a".into(), "b".into()]);
        assert!(answer.matches(&json!(["a", "b"])));
        assert!(!answer.matches(&json!(["b", "a"])));
        assert!(!answer.matches(&json!(["a"])));
        assert!(!answer.matches(&json!({"a": "b"})));
    }

    #[test]
    fn single_element_list_equals_scalar() {
        assert!(AnswerValue::Multiple(vec!["x".into()]).matches(&json!("x")));
        assert!(AnswerValue::from("x").matches(&json!(["x"])));
    }

    #[test]
    fn from_pairs_promotes_repeated_names() {
        let answers = Answers::from_pairs([
            ("name", "Ada"),
            ("colors", "red"),
            ("colors", "blue"),
            ("colors", "green"),
        ]);
        assert_eq!(answers.get("name"), Some(&AnswerValue::from("Ada")));
        assert_eq!(
            answers.get("colors"),
            Some(&AnswerValue::Multiple(vec![
                "red".into(),
                "blue".into(),
                "green".into()
            ]))
        );
        assert_eq!(answers.len(), 2);
    }

    #[test]
    fn deserialize_coerces_scalars() {
        let answers: Answers =
            serde_json::from_value(json!({"q1": 6, "q2": "text", "q3": ["a", 1, true]})).unwrap();
        assert_eq!(answers.get("q1"), Some(&AnswerValue::from("6")));
        assert_eq!(answers.get("q2"), Some(&AnswerValue::from("text")));
        assert_eq!(
            answers.get("q3"),
            Some(&AnswerValue::Multiple(vec![
                "a".into(),
                "1".into(),
                "true".into()
            ]))
        );
    }

    #[test]
    fn null_answer_is_blank() {
        let answers: Answers = serde_json::from_value(json!({"q1": "6", "essay": null})).unwrap();
        assert_eq!(answers.get("q1"), Some(&AnswerValue::from("6")));
        assert!(answers.get("essay").is_some_and(AnswerValue::is_blank));
    }

    #[test]
    fn deserialize_rejects_nested_maps() {
        let result: Result<Answers, _> = serde_json::from_value(json!({"q1": {"nested": 1}}));
        assert!(result.is_err());
    }

    #[test]
    fn blank_answers() {
        assert!(AnswerValue::from("").is_blank());
        assert!(AnswerValue::Multiple(vec![]).is_blank());
        assert!(!AnswerValue::from(" ").is_blank());
    }
}
