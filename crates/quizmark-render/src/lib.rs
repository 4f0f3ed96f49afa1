//! quizmark-render: Presentation for forms and score reports.
//!
//! Renders numbered forms as plain text or as a self-contained HTML page,
//! and score reports as an HTML summary.

pub mod html;
pub mod text;

pub use html::{generate_form_html, generate_result_html, write_html};
pub use text::render_form_text;
