//! End-to-end scoring scenarios: documents in, score sheets out.
//!
//! These go through the same loader and session the CLI uses, without the
//! process boundary.

use quizmark_core::answers::Answers;
use quizmark_core::error::ScoreNote;
use quizmark_core::parser::{parse_form_str, FormFormat};
use quizmark_core::scorer::{calculate_possible_total, ScorerConfig};
use quizmark_core::session::QuizSession;
use quizmark_sources::{FileSource, InlineSource};

fn session(yaml: &str) -> QuizSession {
    let form = parse_form_str(yaml, FormFormat::Yaml).unwrap();
    QuizSession::from_form(form, ScorerConfig::default())
}

#[test]
fn exact_match_scenario() {
    let session = session(
        r#"
questions:
  - name: q1
    label: 2 * 3 = ?
    scoring: { strategy: exact, answer: 6, score: 5 }
"#,
    );

    let report = session.submit(&Answers::from_pairs([("q1", "6")]));
    assert_eq!(report.sheet.total, 5.0);
    assert_eq!(report.sheet.possible, 5.0);
    assert_eq!(report.summary_line(), "5 / 5");

    for wrong in ["5", "six", "", "6 "] {
        let report = session.submit(&Answers::from_pairs([("q1", wrong)]));
        let expected = if wrong == "6 " { 5.0 } else { 0.0 };
        assert_eq!(report.sheet.total, expected, "answer {wrong:?}");
    }
}

#[test]
fn comprehensive_scenario() {
    let session = session(
        r#"
questions:
  - name: q2
    label: Describe your pets
    type: textarea
    scoring:
      strategy: comprehensive
      score: 10
      min_length: 10
      max_length: 100
      criteria:
        - keywords: [cat, dog]
          score: 5
"#,
    );

    let report = session.submit(&Answers::from_pairs([("q2", "I have a dog")]));
    let length_share = (12.0 - 10.0) / 90.0 * 0.2 * 10.0;
    assert!((report.sheet.total - (2.5 + length_share)).abs() < 1e-9);
    assert!(report.sheet.total < 10.0);
    assert_eq!(report.summary_line(), "2.54 / 10");
}

#[test]
fn unknown_strategy_scenario() {
    let session = session(
        r#"
questions:
  - name: guess
    label: Guess
    scoring: { strategy: fuzzy, score: 4 }
  - name: q1
    label: 1 + 1
    scoring: { strategy: exact, answer: 2, score: 5 }
"#,
    );

    let report = session.submit(&Answers::from_pairs([("guess", "anything"), ("q1", "2")]));
    assert_eq!(report.sheet.total, 5.0);
    assert_eq!(report.sheet.possible, 9.0);
    assert_eq!(report.sheet.score_of("guess"), Some(0.0));
    assert!(matches!(
        report.sheet.questions[0].notes.as_slice(),
        [ScoreNote::UnknownStrategy { strategy }] if strategy == "fuzzy"
    ));
}

#[test]
fn total_possible_is_additive() {
    let first = parse_form_str(
        r#"
questions:
  - { name: a, label: A, scoring: { strategy: exact, answer: 1, score: 2 } }
  - { name: b, label: B, scoring: { strategy: exact, answer: 1, score: 3 } }
"#,
        FormFormat::Yaml,
    )
    .unwrap();
    let second = parse_form_str(
        r#"
questions:
  - { name: c, label: C, scoring: { strategy: fuzzy, score: 4 } }
  - { name: d, label: D }
"#,
        FormFormat::Yaml,
    )
    .unwrap();

    let mut combined = first.questions.clone();
    combined.extend(second.questions.clone());
    assert_eq!(
        calculate_possible_total(&combined),
        calculate_possible_total(&first.questions) + calculate_possible_total(&second.questions)
    );
    assert_eq!(calculate_possible_total(&combined), 9.0);
}

#[test]
fn checkbox_answers_compare_in_order() {
    let session = session(
        r#"
questions:
  - name: toppings
    label: Toppings
    type: checkbox
    options: [cheese, olives, ham]
    scoring: { strategy: exact, answer: [cheese, olives], score: 2 }
"#,
    );

    let right = Answers::from_pairs([("toppings", "cheese"), ("toppings", "olives")]);
    let reversed = Answers::from_pairs([("toppings", "olives"), ("toppings", "cheese")]);
    assert_eq!(session.submit(&right).sheet.total, 2.0);
    assert_eq!(session.submit(&reversed).sheet.total, 0.0);
}

#[tokio::test]
async fn sample_form_from_disk() {
    let source = FileSource::new("../../forms/arithmetic.yaml");
    let session = QuizSession::initialize(&source, ScorerConfig::default())
        .await
        .unwrap();

    let answers = quizmark_core::parser::parse_answers(std::path::Path::new(
        "../../submissions/arithmetic.json",
    ))
    .unwrap();
    let report = session.submit(&answers);
    assert_eq!(report.summary_line(), "10 / 13");
    assert_eq!(report.sheet.score_of("favorite_color"), Some(0.0));
    assert_eq!(report.sheet.score_of("two_times_three"), Some(5.0));
}

#[tokio::test]
async fn session_does_not_mutate_its_form() {
    let source = InlineSource::parse(
        r#"
questions:
  - { name: a, label: First, scoring: { strategy: exact, answer: x, score: 1 } }
  - { name: b, label: Second }
"#,
        FormFormat::Yaml,
    )
    .unwrap();
    let session = QuizSession::initialize(&source, ScorerConfig::default())
        .await
        .unwrap();

    let before = session.form().clone();
    let _ = session.numbered_questions();
    let first = session.submit(&Answers::from_pairs([("a", "x")]));
    let second = session.submit(&Answers::from_pairs([("a", "x")]));

    assert_eq!(session.form(), &before);
    assert_eq!(first.sheet, second.sheet);
    assert_eq!(source.load_count(), 1);
}
