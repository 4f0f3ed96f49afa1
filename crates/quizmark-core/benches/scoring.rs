use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizmark_core::answers::Answers;
use quizmark_core::model::{Criterion as KeywordCriterion, Question, QuestionType, ScoringRule};
use quizmark_core::scorer::{comprehensive_score, Scorer, DEFAULT_LENGTH_WEIGHT};
use serde_json::json;

fn make_form(size: usize) -> (Vec<Question>, Answers) {
    let mut questions = Vec::with_capacity(size);
    let mut pairs = Vec::with_capacity(size);
    for i in 0..size {
        let name = format!("q{i}");
        if i % 2 == 0 {
            questions.push(
                Question::new(&name, format!("{i} + {i} = ?"), QuestionType::Number).with_scoring(
                    ScoringRule::Exact {
                        answer: json!(i * 2),
                        score: 5.0,
                    },
                ),
            );
            pairs.push((name, (i * 2).to_string()));
        } else {
            questions.push(
                Question::new(&name, "Tell us about your pets", QuestionType::Textarea)
                    .with_scoring(ScoringRule::Comprehensive {
                        score: 10.0,
                        min_length: 10.0,
                        max_length: 200.0,
                        criteria: essay_criteria(),
                    }),
            );
            pairs.push((name, "I have a dog and a cat that sleep all day".to_string()));
        }
    }
    (questions, Answers::from_pairs(pairs))
}

fn essay_criteria() -> Vec<KeywordCriterion> {
    vec![
        KeywordCriterion {
            name: Some("pets".into()),
            keywords: vec!["cat".into(), "dog".into()],
            score: 5.0,
        },
        KeywordCriterion {
            name: Some("habits".into()),
            keywords: vec!["sleep".into(), "play".into(), "eat".into()],
            score: 3.0,
        },
    ]
}

fn bench_comprehensive(c: &mut Criterion) {
    let mut group = c.benchmark_group("comprehensive_score");
    let criteria = essay_criteria();
    let short = "I have a dog";
    let long = "My dog and my cat sleep, play, and eat together. ".repeat(40);

    group.bench_function("short", |b| {
        b.iter(|| {
            comprehensive_score(
                black_box(short),
                10.0,
                10.0,
                100.0,
                black_box(&criteria),
                DEFAULT_LENGTH_WEIGHT,
            )
        })
    });

    group.bench_function("long", |b| {
        b.iter(|| {
            comprehensive_score(
                black_box(&long),
                10.0,
                10.0,
                100.0,
                black_box(&criteria),
                DEFAULT_LENGTH_WEIGHT,
            )
        })
    });

    group.finish();
}

fn bench_score_form(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_form");
    let scorer = Scorer::default();

    for size in [10, 100, 1000] {
        let (questions, answers) = make_form(size);
        group.bench_function(format!("questions={size}"), |b| {
            b.iter(|| scorer.score(black_box(&questions), black_box(&answers)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_comprehensive, bench_score_form);
criterion_main!(benches);
