//! The `quizmark validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(form_path: PathBuf) -> Result<()> {
    let forms = if form_path.is_dir() {
        quizmark_core::parser::load_form_directory(&form_path)?
    } else {
        vec![quizmark_core::parser::parse_form(&form_path)?]
    };

    let mut total_warnings = 0;

    for form in &forms {
        println!(
            "Form: {} ({} questions, {} scored)",
            form.title,
            form.questions.len(),
            form.scored_questions().count()
        );

        let warnings = quizmark_core::parser::validate_form(form);
        for w in &warnings {
            let prefix = w
                .question
                .as_ref()
                .map(|name| format!("  [{name}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if forms.is_empty() {
        println!("No forms found.");
    } else if total_warnings == 0 {
        println!("All forms valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
