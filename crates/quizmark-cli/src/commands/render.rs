//! The `quizmark render` command.

use std::path::PathBuf;

use anyhow::Result;

use quizmark_core::traits::QuestionSource;
use quizmark_render::{generate_form_html, render_form_text, write_html};
use quizmark_sources::{load_config_from, resolve_source};

pub async fn execute(
    form: Option<String>,
    source: Option<String>,
    format: String,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config.as_deref())?;
    let source = resolve_source(form.as_deref(), source.as_deref(), &config)?;
    let form = source.load().await?;

    let rendered = match format.as_str() {
        "text" => render_form_text(&form),
        "html" => generate_form_html(&form),
        other => anyhow::bail!("unknown format: {other} (expected text, html)"),
    };

    match output {
        Some(path) => {
            write_html(&rendered, &path)?;
            eprintln!("Form written to: {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
