//! In-memory source, for embedding and tests.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use quizmark_core::error::FormError;
use quizmark_core::model::Form;
use quizmark_core::parser::{parse_form_str, FormFormat};
use quizmark_core::traits::QuestionSource;

/// Serves a form held in memory.
///
/// Every load hands out a fresh copy and bumps a counter, so tests can
/// check how often a session went back to its source.
pub struct InlineSource {
    name: String,
    form: Form,
    load_count: AtomicU32,
}

impl InlineSource {
    pub fn new(form: Form) -> Self {
        Self {
            name: "inline".to_string(),
            form,
            load_count: AtomicU32::new(0),
        }
    }

    /// Parse a document up front and serve the result.
    pub fn parse(content: &str, format: FormFormat) -> Result<Self, FormError> {
        Ok(Self::new(parse_form_str(content, format)?))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of times `load` has been called.
    pub fn load_count(&self) -> u32 {
        self.load_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl QuestionSource for InlineSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> anyhow::Result<Form> {
        self.load_count.fetch_add(1, Ordering::Relaxed);
        Ok(self.form.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizmark_core::answers::Answers;
    use quizmark_core::scorer::ScorerConfig;
    use quizmark_core::session::QuizSession;

    const FORM: &str = r#"
title: Inline
questions:
  - name: product
    label: 2 * 3 = ?
    type: number
    scoring: { strategy: exact, answer: 6, score: 5 }
"#;

    #[tokio::test]
    async fn session_loads_once() {
        let source = InlineSource::parse(FORM, FormFormat::Yaml)
            .unwrap()
            .with_name("memory");
        assert_eq!(source.name(), "memory");

        let session = QuizSession::initialize(&source, ScorerConfig::default())
            .await
            .unwrap();
        session.submit(&Answers::from_pairs([("product", "6")]));
        let report = session.submit(&Answers::from_pairs([("product", "7")]));

        assert_eq!(report.summary_line(), "0 / 5");
        assert_eq!(source.load_count(), 1);
    }

    #[test]
    fn parse_errors_surface() {
        assert!(InlineSource::parse("[", FormFormat::Json).is_err());
    }
}
