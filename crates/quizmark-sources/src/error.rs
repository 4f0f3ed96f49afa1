//! Source error types.

use quizmark_core::error::FormError;
use thiserror::Error;

/// Errors that can occur while fetching a form document.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file or URL does not exist.
    #[error("form not found: {0}")]
    NotFound(String),

    /// The server answered with an error status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        url: String,
        status: u16,
        message: String,
    },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network or filesystem error occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// A configured header name or value is not valid HTTP.
    #[error("invalid header '{0}'")]
    InvalidHeader(String),

    /// The document was fetched but is not a valid form.
    #[error(transparent)]
    Document(#[from] FormError),
}
