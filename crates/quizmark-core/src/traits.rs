//! Seams between the core and its collaborators.

use async_trait::async_trait;

use crate::model::Form;

/// Somewhere a form can be loaded from: a file, a URL, memory.
///
/// Implemented by the `quizmark-sources` crate.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Human-readable description (e.g. the path or URL).
    fn name(&self) -> &str;

    /// Load and parse the form.
    async fn load(&self) -> anyhow::Result<Form>;
}
