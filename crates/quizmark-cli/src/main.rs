//! quizmark CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

mod commands;

#[derive(Parser)]
#[command(name = "quizmark", version, about = "Quiz and survey form scorer")]
struct Cli {
    /// Log debug output (per-question scoring lines) to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a submission against a form
    Score {
        /// Form file or http(s) URL
        #[arg(long)]
        form: Option<String>,

        /// Named source from the config file
        #[arg(long, conflicts_with = "form")]
        source: Option<String>,

        /// Answers file (YAML, JSON, or TOML)
        #[arg(long, conflicts_with = "answer")]
        answers: Option<PathBuf>,

        /// A single answer as name=value; repeat a name for multiple values
        #[arg(long = "answer", value_name = "NAME=VALUE")]
        answer: Vec<String>,

        /// Output format: text, json, markdown, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the output to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit with status 2 if total / possible is below this ratio
        #[arg(long)]
        fail_below: Option<f64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check form files for configuration mistakes
    Validate {
        /// Form file or directory
        #[arg(long)]
        form: PathBuf,
    },

    /// Print a form with numbered questions
    Render {
        /// Form file or http(s) URL
        #[arg(long)]
        form: Option<String>,

        /// Named source from the config file
        #[arg(long, conflicts_with = "form")]
        source: Option<String>,

        /// Output format: text, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the output to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example form
    Init,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
        format!("quizmark={level}")
            .parse()
            .unwrap_or_else(|_| LevelFilter::INFO.into()),
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Score {
            form,
            source,
            answers,
            answer,
            format,
            output,
            fail_below,
            config,
        } => {
            commands::score::execute(commands::score::ScoreArgs {
                form,
                source,
                answers,
                answer,
                format,
                output,
                fail_below,
                config,
            })
            .await
        }
        Commands::Validate { form } => commands::validate::execute(form),
        Commands::Render {
            form,
            source,
            format,
            output,
            config,
        } => commands::render::execute(form, source, format, output, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
