//! Local file source.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::instrument;

use quizmark_core::model::Form;
use quizmark_core::parser::{parse_form_str, FormFormat};
use quizmark_core::traits::QuestionSource;

use crate::error::SourceError;

/// Loads a YAML, JSON, or TOML form from disk.
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuestionSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(path = %self.name))]
    async fn load(&self) -> anyhow::Result<Form> {
        let format = FormFormat::from_path(&self.path).map_err(SourceError::from)?;

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => SourceError::NotFound(self.name.clone()),
                _ => SourceError::Io(format!("{}: {e}", self.name)),
            })?;

        let form = parse_form_str(&content, format).map_err(SourceError::from)?;
        tracing::debug!(questions = form.questions.len(), "read form file");
        Ok(form)
    }
}
