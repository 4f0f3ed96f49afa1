//! The `quizmark score` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizmark_core::answers::Answers;
use quizmark_core::parser::{parse_answer_pair, parse_answers};
use quizmark_core::report::{describe_note, format_points, ScoreReport};
use quizmark_core::session::QuizSession;
use quizmark_sources::{load_config_from, resolve_source};

pub struct ScoreArgs {
    pub form: Option<String>,
    pub source: Option<String>,
    pub answers: Option<PathBuf>,
    pub answer: Vec<String>,
    pub format: String,
    pub output: Option<PathBuf>,
    pub fail_below: Option<f64>,
    pub config: Option<PathBuf>,
}

pub async fn execute(args: ScoreArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;
    let source = resolve_source(args.form.as_deref(), args.source.as_deref(), &config)?;
    let session = QuizSession::initialize(source.as_ref(), config.scoring).await?;

    let answers = match &args.answers {
        Some(path) => parse_answers(path)?,
        None => {
            let pairs = args
                .answer
                .iter()
                .map(|pair| parse_answer_pair(pair))
                .collect::<Result<Vec<_>, _>>()?;
            Answers::from_pairs(pairs)
        }
    };

    for (name, _) in answers.iter() {
        if session.form().question(name).is_none() {
            tracing::warn!("ignoring answer for unknown question '{name}'");
        }
    }

    let report = session.submit(&answers);

    let rendered = match args.format.as_str() {
        "text" => text_summary(&report),
        "json" => serde_json::to_string_pretty(&report)?,
        "markdown" | "md" => report.to_markdown(),
        "html" => quizmark_render::generate_result_html(&report),
        other => anyhow::bail!("unknown format: {other} (expected text, json, markdown, html)"),
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            eprintln!("Report written to: {}", path.display());
        }
        None => println!("{rendered}"),
    }

    if let Some(threshold) = args.fail_below {
        let ratio = report.sheet.ratio();
        if ratio < threshold {
            eprintln!(
                "Score {:.1}% is below the required {:.1}%",
                ratio * 100.0,
                threshold * 100.0
            );
            std::process::exit(2);
        }
    }

    Ok(())
}

fn text_summary(report: &ScoreReport) -> String {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Question", "Strategy", "Points", "Notes"]);

    for q in &report.sheet.questions {
        let notes: Vec<String> = q.notes.iter().map(describe_note).collect();
        table.add_row(vec![
            Cell::new(&q.name),
            Cell::new(q.strategy.as_deref().unwrap_or("-")),
            Cell::new(format!(
                "{} / {}",
                format_points(q.awarded),
                format_points(q.possible)
            )),
            Cell::new(notes.join("; ")),
        ]);
    }

    format!(
        "{}\n{table}\nScore: {}",
        report.form.title,
        report.summary_line()
    )
}
