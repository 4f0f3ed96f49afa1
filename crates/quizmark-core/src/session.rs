//! A quiz session: one loaded form, scored any number of times.

use anyhow::{Context, Result};

use crate::answers::Answers;
use crate::model::{Form, Question};
use crate::numbering::numbered;
use crate::report::ScoreReport;
use crate::scorer::{Scorer, ScorerConfig};
use crate::traits::QuestionSource;

/// Holds a form for display and scoring.
///
/// The form is read-only after initialization; every submission is scored
/// against the same questions.
#[derive(Debug, Clone)]
pub struct QuizSession {
    form: Form,
    scorer: Scorer,
}

impl QuizSession {
    /// Load the form from `source`.
    pub async fn initialize(source: &dyn QuestionSource, config: ScorerConfig) -> Result<Self> {
        let form = source
            .load()
            .await
            .with_context(|| format!("failed to load questions from {}", source.name()))?;

        tracing::info!(
            source = source.name(),
            title = %form.title,
            questions = form.questions.len(),
            "form loaded"
        );

        Ok(Self::from_form(form, config))
    }

    /// Start a session from an already loaded form.
    pub fn from_form(form: Form, config: ScorerConfig) -> Self {
        Self {
            form,
            scorer: Scorer::new(config),
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Questions labeled for display, `"1. ..."` onward.
    pub fn numbered_questions(&self) -> Vec<Question> {
        numbered(&self.form.questions)
    }

    /// Score a submission.
    pub fn submit(&self, answers: &Answers) -> ScoreReport {
        let sheet = self.scorer.score(&self.form.questions, answers);
        let report = ScoreReport::new(&self.form, sheet);
        tracing::info!(report = %report.id, result = %report.summary_line(), "submission scored");
        report
    }
}
