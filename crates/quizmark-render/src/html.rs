//! HTML rendering.
//!
//! Produces self-contained pages with all CSS inlined: the fillable form,
//! and the score summary shown after submission.

use std::path::Path;

use anyhow::{Context, Result};

use quizmark_core::model::{Form, Question, QuestionType};
use quizmark_core::numbering::numbered;
use quizmark_core::report::{describe_note, format_points, ScoreReport};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn page_head(html: &mut String, title: &str) {
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", html_escape(title)));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");
}

/// Generate a fillable HTML form.
///
/// Questions are numbered from 1. Field names are the question names, so a
/// browser submission maps straight onto `Answers::from_pairs`.
pub fn generate_form_html(form: &Form) -> String {
    let mut html = String::new();
    page_head(&mut html, &form.title);

    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&form.title)));
    if !form.description.is_empty() {
        html.push_str(&format!(
            "<p class=\"meta\">{}</p>\n",
            html_escape(&form.description)
        ));
    }
    html.push_str("</header>\n");

    html.push_str("<form method=\"post\">\n");
    for question in numbered(&form.questions) {
        html.push_str(&question_html(&question));
    }
    html.push_str("<button type=\"submit\">Submit</button>\n");
    html.push_str("</form>\n");

    html.push_str("</body>\n</html>");
    html
}

fn question_html(q: &Question) -> String {
    let id = format!("q-{}", html_escape(&q.name));
    let name = html_escape(&q.name);
    let required = if q.required { " required" } else { "" };
    let marker = if q.required {
        " <span class=\"required\">*</span>"
    } else {
        ""
    };

    let mut html = String::from("<div class=\"question\">\n");

    match &q.kind {
        QuestionType::Radio | QuestionType::Checkbox => {
            let input_type = if q.kind == QuestionType::Radio {
                "radio"
            } else {
                "checkbox"
            };
            html.push_str(&format!(
                "<fieldset id=\"{id}\">\n<legend>{}{marker}</legend>\n",
                html_escape(&q.label)
            ));
            for option in &q.options {
                html.push_str(&format!(
                    "<label><input type=\"{input_type}\" name=\"{name}\" value=\"{}\"{}> {}</label>\n",
                    html_escape(option.value()),
                    // a required checkbox group would force every box to be ticked
                    if input_type == "radio" { required } else { "" },
                    html_escape(option.label())
                ));
            }
            html.push_str("</fieldset>\n");
        }
        QuestionType::Select => {
            html.push_str(&format!(
                "<label for=\"{id}\">{}{marker}</label>\n",
                html_escape(&q.label)
            ));
            html.push_str(&format!("<select id=\"{id}\" name=\"{name}\"{required}>\n"));
            html.push_str("<option value=\"\"></option>\n");
            for option in &q.options {
                html.push_str(&format!(
                    "<option value=\"{}\">{}</option>\n",
                    html_escape(option.value()),
                    html_escape(option.label())
                ));
            }
            html.push_str("</select>\n");
        }
        QuestionType::Textarea => {
            html.push_str(&format!(
                "<label for=\"{id}\">{}{marker}</label>\n",
                html_escape(&q.label)
            ));
            html.push_str(&format!(
                "<textarea id=\"{id}\" name=\"{name}\" rows=\"6\"{required}></textarea>\n"
            ));
        }
        QuestionType::Number => {
            html.push_str(&format!(
                "<label for=\"{id}\">{}{marker}</label>\n",
                html_escape(&q.label)
            ));
            html.push_str(&format!(
                "<input type=\"number\" step=\"any\" id=\"{id}\" name=\"{name}\"{required}>\n"
            ));
        }
        QuestionType::Text | QuestionType::Other(_) => {
            html.push_str(&format!(
                "<label for=\"{id}\">{}{marker}</label>\n",
                html_escape(&q.label)
            ));
            html.push_str(&format!(
                "<input type=\"text\" id=\"{id}\" name=\"{name}\"{required}>\n"
            ));
        }
    }

    html.push_str("</div>\n");
    html
}

/// Generate the score summary page for a scored submission.
pub fn generate_result_html(report: &ScoreReport) -> String {
    let mut html = String::new();
    page_head(&mut html, &format!("{} results", report.form.title));

    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&report.form.title)));
    html.push_str(&format!(
        "<p class=\"meta\">{} | {} of {} questions scored</p>\n",
        report.scored_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.form.scored_count,
        report.form.question_count
    ));
    html.push_str("</header>\n");

    html.push_str("<section class=\"dashboard\">\n");
    html.push_str(&format!(
        "<p class=\"total\">Your score: <strong>{}</strong></p>\n",
        report.summary_line()
    ));
    html.push_str("</section>\n");

    html.push_str("<section class=\"results\">\n");
    html.push_str("<table class=\"results-table\">\n");
    html.push_str(
        "<thead><tr><th>Question</th><th>Strategy</th><th>Points</th><th>Notes</th></tr></thead>\n",
    );
    html.push_str("<tbody>\n");
    for q in &report.sheet.questions {
        let class = if q.possible > 0.0 && q.awarded >= q.possible {
            "pass"
        } else if q.awarded > 0.0 {
            "partial"
        } else {
            "fail"
        };
        let notes: Vec<String> = q.notes.iter().map(describe_note).collect();
        html.push_str(&format!(
            "<tr class=\"{class}\"><td>{}</td><td>{}</td><td>{} / {}</td><td>{}</td></tr>\n",
            html_escape(&q.name),
            html_escape(q.strategy.as_deref().unwrap_or("-")),
            format_points(q.awarded),
            format_points(q.possible),
            html_escape(&notes.join("; "))
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write a rendered page to a file, creating parent directories.
pub fn write_html(html: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --partial: #fef9c3; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --partial: #713f12; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0 auto; max-width: 48rem; padding: 2rem; background: var(--bg); color: var(--fg); }
h1 { margin-top: 1rem; }
.meta { color: #6b7280; }
.question { margin: 1.5rem 0; }
.question label, .question legend { display: block; font-weight: 600; margin-bottom: 0.4rem; }
fieldset label { font-weight: normal; }
fieldset { border: 1px solid var(--border); border-radius: 8px; padding: 0.75rem 1rem; }
input[type=text], input[type=number], select, textarea { width: 100%; padding: 0.4rem; border: 1px solid var(--border); border-radius: 6px; background: var(--bg); color: var(--fg); }
.required { color: #ef4444; }
button { padding: 0.6rem 1.5rem; border: none; border-radius: 6px; background: #2563eb; color: #fff; cursor: pointer; }
.total { font-size: 1.5rem; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.pass { background: var(--pass); }
.partial { background: var(--partial); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;
