//! The `quizmark init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizmark.toml").exists() {
        println!("quizmark.toml already exists, skipping.");
    } else {
        std::fs::write("quizmark.toml", SAMPLE_CONFIG)?;
        println!("Created quizmark.toml");
    }

    std::fs::create_dir_all("forms")?;
    let example_path = std::path::Path::new("forms/example.yaml");
    if example_path.exists() {
        println!("forms/example.yaml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_FORM)?;
        println!("Created forms/example.yaml");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizmark validate --form forms/example.yaml");
    println!("  2. Run: quizmark render --form forms/example.yaml");
    println!("  3. Run: quizmark score --form forms/example.yaml --answer capital=Paris");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizmark configuration

default_source = "example"

[scoring]
# Share of a comprehensive rule's score earned by answer length.
length_weight = 0.2

[sources.example]
type = "file"
path = "forms/example.yaml"

# [sources.remote]
# type = "http"
# url = "https://example.com/quiz.json"
# headers = { Authorization = "Bearer ${QUIZ_TOKEN}" }
# timeout_secs = 30
"#;

const EXAMPLE_FORM: &str = r#"title: Example quiz
description: A short quiz to get started.
questions:
  - name: name
    label: What is your name?
    type: text
    required: true

  - name: capital
    label: What is the capital of France?
    type: select
    options: [Berlin, Madrid, Paris]
    scoring:
      strategy: exact
      answer: Paris
      score: 2

  - name: sum
    label: 7 + 5 = ?
    type: number
    scoring:
      strategy: exact
      answer: 12
      score: 2

  - name: pets
    label: Tell us about your pets.
    type: textarea
    scoring:
      strategy: comprehensive
      score: 6
      min_length: 20
      max_length: 200
      criteria:
        - name: animals
          keywords: [cat, dog]
          score: 3
        - name: care
          keywords: [feed, walk]
          score: 2
"#;
