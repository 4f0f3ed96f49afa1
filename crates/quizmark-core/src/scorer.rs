//! The scoring engine.
//!
//! Each question with a scoring rule is scored on its own. A broken rule, an
//! unknown strategy, or a missing answer costs that question its points and
//! leaves a [`ScoreNote`] on its result; the rest of the pass continues.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::answers::{AnswerValue, Answers};
use crate::error::{DivisionGuard, ScoreNote};
use crate::model::{Criterion, Question, ScoringRule};

/// Share of a comprehensive rule's score earned by answer length.
pub const DEFAULT_LENGTH_WEIGHT: f64 = 0.2;

/// Tunables for the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Share of a comprehensive rule's score earned by answer length.
    #[serde(default = "default_length_weight")]
    pub length_weight: f64,
}

fn default_length_weight() -> f64 {
    DEFAULT_LENGTH_WEIGHT
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            length_weight: DEFAULT_LENGTH_WEIGHT,
        }
    }
}

/// Per-question outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionScore {
    /// Question name.
    pub name: String,
    /// Strategy tag from the rule, if it had one.
    pub strategy: Option<String>,
    /// Points earned.
    pub awarded: f64,
    /// Points this question adds to the possible total.
    pub possible: f64,
    /// Component breakdown for comprehensive rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<ComprehensiveDetail>,
    /// Anything that reduced or guarded the score.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<ScoreNote>,
}

/// How a comprehensive score was put together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComprehensiveDetail {
    /// Character count of the answer.
    pub length: usize,
    /// Points from answer length.
    pub length_score: f64,
    /// Points from each criterion, in rule order.
    pub criteria: Vec<CriterionScore>,
    /// Length plus criteria before the ceiling was applied.
    pub uncapped: f64,
}

/// Points earned by one criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub matched: usize,
    pub keywords: usize,
    pub score: f64,
}

/// Result of one scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSheet {
    /// Sum of points earned.
    pub total: f64,
    /// Sum of points available.
    pub possible: f64,
    /// One entry per scored question, in form order.
    pub questions: Vec<QuestionScore>,
}

impl ScoreSheet {
    /// Points earned by the named question.
    pub fn score_of(&self, name: &str) -> Option<f64> {
        self.questions
            .iter()
            .find(|q| q.name == name)
            .map(|q| q.awarded)
    }

    /// Share of possible points earned; zero when nothing can be earned.
    pub fn ratio(&self) -> f64 {
        if self.possible > 0.0 {
            self.total / self.possible
        } else {
            0.0
        }
    }
}

/// Sum of declared scores over every question with a scoring rule.
pub fn calculate_possible_total(questions: &[Question]) -> f64 {
    questions
        .iter()
        .filter_map(|q| q.scoring.as_ref())
        .filter_map(|rule| rule.declared_score())
        .sum()
}

/// Total points earned with the default configuration.
pub fn calculate_score(questions: &[Question], answers: &Answers) -> f64 {
    Scorer::default().score(questions, answers).total
}

/// Scores submissions against a question list.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    config: ScorerConfig,
}

impl Scorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Score every question that declares a rule.
    #[instrument(skip_all, fields(questions = questions.len(), answers = answers.len()))]
    pub fn score(&self, questions: &[Question], answers: &Answers) -> ScoreSheet {
        let mut total = 0.0;
        let mut possible = 0.0;
        let mut scored = Vec::new();

        for question in questions {
            if let Some(result) = self.score_question(question, answers.get(&question.name)) {
                total += result.awarded;
                possible += result.possible;
                scored.push(result);
            }
        }

        tracing::debug!(total, possible, "scoring pass complete");

        ScoreSheet {
            total,
            possible,
            questions: scored,
        }
    }

    /// Score a single question. Returns `None` when it has no rule.
    pub fn score_question(
        &self,
        question: &Question,
        answer: Option<&AnswerValue>,
    ) -> Option<QuestionScore> {
        let spec = question.scoring.as_ref()?;
        let possible = spec.declared_score().unwrap_or(0.0);
        let mut result = QuestionScore {
            name: question.name.clone(),
            strategy: spec.strategy().map(str::to_string),
            awarded: 0.0,
            possible,
            detail: None,
            notes: Vec::new(),
        };

        let rule = match spec.resolve(&question.name) {
            Ok(rule) => rule,
            Err(e) => {
                tracing::warn!("{e}; scoring as 0");
                result.notes.push(e.into());
                return Some(result);
            }
        };

        let answer = answer.filter(|a| !a.is_blank());
        let Some(answer) = answer else {
            result.notes.push(ScoreNote::MissingAnswer);
            tracing::debug!(
                question = %question.name,
                strategy = rule.strategy(),
                score = 0.0,
                "no answer submitted"
            );
            return Some(result);
        };

        match &rule {
            ScoringRule::Exact {
                answer: expected,
                score,
            } => {
                result.awarded = exact_score(expected, *score, answer);
            }
            ScoringRule::Comprehensive {
                score,
                min_length,
                max_length,
                criteria,
            } => match answer.as_text() {
                Some(text) => {
                    let outcome = comprehensive_score(
                        text,
                        *score,
                        *min_length,
                        *max_length,
                        criteria,
                        self.config.length_weight,
                    );
                    result.awarded = outcome.awarded;
                    result.notes.extend(outcome.notes);
                    result.detail = Some(outcome.detail);
                }
                None => result.notes.push(ScoreNote::NotFreeText),
            },
        }

        tracing::debug!(
            question = %question.name,
            answer = %answer,
            strategy = rule.strategy(),
            score = result.awarded,
            "scored question"
        );

        Some(result)
    }
}

fn exact_score(expected: &Value, score: f64, answer: &AnswerValue) -> f64 {
    if answer.matches(expected) {
        score
    } else {
        0.0
    }
}

/// Outcome of the comprehensive strategy for one answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ComprehensiveOutcome {
    pub awarded: f64,
    pub detail: ComprehensiveDetail,
    pub notes: Vec<ScoreNote>,
}

/// Weighted length plus keyword coverage, capped at `score`.
///
/// The length share is `(len - min) / (max - min)` clamped below at zero but
/// not above, times `length_weight * score`. Answers longer than
/// `max_length` therefore earn more than the nominal weight; the final cap
/// at `score` still bounds the question.
pub fn comprehensive_score(
    answer: &str,
    score: f64,
    min_length: f64,
    max_length: f64,
    criteria: &[Criterion],
    length_weight: f64,
) -> ComprehensiveOutcome {
    let normalized = answer.to_lowercase();
    let length = answer.chars().count();
    let mut notes = Vec::new();

    let span = max_length - min_length;
    let length_score = if span == 0.0 {
        notes.push(ScoreNote::DivisionGuard(DivisionGuard::EqualLengthBounds));
        0.0
    } else {
        ((length as f64 - min_length) / span).max(0.0) * length_weight * score
    };

    let criteria: Vec<CriterionScore> = criteria
        .iter()
        .enumerate()
        .map(|(i, criterion)| {
            let keywords = criterion.keywords.len();
            if keywords == 0 {
                notes.push(ScoreNote::DivisionGuard(DivisionGuard::EmptyKeywords {
                    criterion: i,
                }));
                return CriterionScore {
                    name: criterion.name.clone(),
                    matched: 0,
                    keywords: 0,
                    score: 0.0,
                };
            }
            let matched = criterion
                .keywords
                .iter()
                .filter(|k| normalized.contains(&k.to_lowercase()))
                .count();
            CriterionScore {
                name: criterion.name.clone(),
                matched,
                keywords,
                score: matched as f64 / keywords as f64 * criterion.score,
            }
        })
        .collect();

    let uncapped = length_score + criteria.iter().map(|c| c.score).sum::<f64>();
    let awarded = uncapped.min(score);
    if uncapped > score {
        notes.push(ScoreNote::Capped { uncapped });
    }

    ComprehensiveOutcome {
        awarded,
        detail: ComprehensiveDetail {
            length,
            length_score,
            criteria,
            uncapped,
        },
        notes,
    }
}
