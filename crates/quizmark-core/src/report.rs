//! Score report types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DivisionGuard, ScoreNote};
use crate::model::Form;
use crate::scorer::ScoreSheet;

/// The outcome of scoring one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the submission was scored.
    pub scored_at: DateTime<Utc>,
    /// Summary of the form (without the question definitions).
    pub form: FormSummary,
    /// Totals and per-question results.
    pub sheet: ScoreSheet,
}

/// Summary of a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSummary {
    pub title: String,
    pub question_count: usize,
    pub scored_count: usize,
}

impl From<&Form> for FormSummary {
    fn from(form: &Form) -> Self {
        Self {
            title: form.title.clone(),
            question_count: form.questions.len(),
            scored_count: form.scored_questions().count(),
        }
    }
}

impl ScoreReport {
    pub fn new(form: &Form, sheet: ScoreSheet) -> Self {
        Self {
            id: Uuid::new_v4(),
            scored_at: Utc::now(),
            form: form.into(),
            sheet,
        }
    }

    /// `"<total> / <possible>"`, the result line shown to respondents.
    pub fn summary_line(&self) -> String {
        format!(
            "{} / {}",
            format_points(self.sheet.total),
            format_points(self.sheet.possible)
        )
    }

    /// Render the report as a Markdown document.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        md.push_str(&format!("# {}\n\n", self.form.title));
        md.push_str(&format!(
            "**Score:** {} ({:.0}%)\n\n",
            self.summary_line(),
            self.sheet.ratio() * 100.0
        ));
        md.push_str(&format!(
            "Scored at {} · {} of {} questions scored\n\n",
            self.scored_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.form.scored_count,
            self.form.question_count
        ));

        if self.sheet.questions.is_empty() {
            md.push_str("_No scored questions._\n");
            return md;
        }

        md.push_str("| Question | Strategy | Points | Notes |\n");
        md.push_str("|---|---|---|---|\n");
        for q in &self.sheet.questions {
            let notes: Vec<String> = q.notes.iter().map(describe_note).collect();
            md.push_str(&format!(
                "| {} | {} | {} / {} | {} |\n",
                table_cell(&q.name),
                table_cell(q.strategy.as_deref().unwrap_or("-")),
                format_points(q.awarded),
                format_points(q.possible),
                table_cell(&notes.join("; "))
            ));
        }

        md
    }
}

/// Escape text for a Markdown table cell.
fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Points with at most two decimals and no trailing zeros.
pub fn format_points(points: f64) -> String {
    let rounded = format!("{points:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Short human-readable description of a note.
pub fn describe_note(note: &ScoreNote) -> String {
    match note {
        ScoreNote::MissingAnswer => "no answer".into(),
        ScoreNote::UnknownStrategy { strategy } => format!("unknown strategy '{strategy}'"),
        ScoreNote::Configuration { message } => format!("invalid rule: {message}"),
        ScoreNote::DivisionGuard(DivisionGuard::EqualLengthBounds) => {
            "length bounds are equal; length not scored".into()
        }
        ScoreNote::DivisionGuard(DivisionGuard::EmptyKeywords { criterion }) => {
            format!("criteria[{criterion}] has no keywords")
        }
        ScoreNote::NotFreeText => "expected a single text answer".into(),
        ScoreNote::Capped { uncapped } => {
            format!("capped from {}", format_points(*uncapped))
        }
    }
}
