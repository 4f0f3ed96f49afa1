//! Question numbering.
//!
//! Numbering produces labeled copies and leaves the input untouched, so a
//! form can be numbered for display any number of times.

use crate::model::Question;

/// Display label for the question at `index` (0-based).
pub fn number_label(index: usize, label: &str) -> String {
    format!("{}. {}", index + 1, label)
}

/// Copies of `questions` with labels prefixed by their 1-based position.
pub fn numbered(questions: &[Question]) -> Vec<Question> {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| Question {
            label: number_label(i, &q.label),
            ..q.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionType;

    fn sample() -> Vec<Question> {
        vec![
            Question::new("name", "What is your name?", QuestionType::Text),
            Question::new("sum", "1 + 1 = ?", QuestionType::Number),
        ]
    }

    #[test]
    fn labels_are_prefixed() {
        let labeled = numbered(&sample());
        assert_eq!(labeled[0].label, "1. What is your name?");
        assert_eq!(labeled[1].label, "2. 1 + 1 = ?");
        assert_eq!(labeled[1].name, "sum");
    }

    #[test]
    fn numbering_does_not_touch_input() {
        let questions = sample();
        let first = numbered(&questions);
        let second = numbered(&questions);
        assert_eq!(first, second);
        assert_eq!(questions[0].label, "What is your name?");
    }
}
