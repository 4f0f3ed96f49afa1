//! quizmark-sources: Where forms come from.
//!
//! Implements the `QuestionSource` trait for local files, HTTP endpoints,
//! and in-memory documents, plus the `quizmark.toml` configuration that
//! names them.

pub mod config;
pub mod error;
pub mod file;
pub mod http;
pub mod inline;

pub use config::{
    create_source, load_config, load_config_from, resolve_source, QuizmarkConfig, SourceConfig,
};
pub use error::SourceError;
pub use file::FileSource;
pub use http::HttpSource;
pub use inline::InlineSource;
