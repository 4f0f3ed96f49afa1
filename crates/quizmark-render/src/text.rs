//! Plain-text form rendering.

use quizmark_core::model::{Form, QuestionType};
use quizmark_core::numbering::numbered;
use quizmark_core::report::format_points;

/// Render a form for the terminal, questions numbered from 1.
///
/// Required questions are marked with `*`; scored questions show the
/// points they are worth.
pub fn render_form_text(form: &Form) -> String {
    let mut out = String::new();
    out.push_str(&form.title);
    out.push('\n');
    out.push_str(&"=".repeat(form.title.chars().count()));
    out.push('\n');
    if !form.description.is_empty() {
        out.push('\n');
        out.push_str(form.description.trim_end());
        out.push('\n');
    }

    for question in numbered(&form.questions) {
        out.push('\n');
        out.push_str(&question.label);
        if question.required {
            out.push_str(" *");
        }
        if let Some(points) = question.scoring.as_ref().and_then(|s| s.declared_score()) {
            out.push_str(&format!(" ({} pts)", format_points(points)));
        }
        out.push('\n');

        let marker = match question.kind {
            QuestionType::Radio => "( )",
            QuestionType::Checkbox => "[ ]",
            _ => "-",
        };
        if question.kind.is_choice() {
            for option in &question.options {
                out.push_str(&format!("   {marker} {}\n", option.label()));
            }
        } else {
            out.push_str(&format!("   [{}]\n", question.kind));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizmark_core::model::{Question, ScoringRule};
    use serde_json::json;

    fn form() -> Form {
        Form {
            title: "Arithmetic".into(),
            description: "Warm-up".into(),
            questions: vec![
                Question::new("name", "What is your name?", QuestionType::Text).required(),
                Question::new("sum", "1 + 1 = ?", QuestionType::Number).with_scoring(
                    ScoringRule::Exact {
                        answer: json!(2),
                        score: 5.0,
                    },
                ),
                Question::new("color", "Pick a color", QuestionType::Radio)
                    .with_options(["Red", "Blue"]),
            ],
        }
    }

    #[test]
    fn numbers_and_marks_questions() {
        let text = render_form_text(&form());
        assert!(text.starts_with("Arithmetic\n==========\n"));
        assert!(text.contains("Warm-up"));
        assert!(text.contains("1. What is your name? *\n   [text]"));
        assert!(text.contains("2. 1 + 1 = ? (5 pts)\n   [number]"));
        assert!(text.contains("3. Pick a color\n   ( ) Red\n   ( ) Blue"));
    }

    #[test]
    fn empty_form_renders_title_only() {
        let form = Form {
            title: "Empty".into(),
            description: String::new(),
            questions: vec![],
        };
        assert_eq!(render_form_text(&form), "Empty\n=====\n");
    }
}
