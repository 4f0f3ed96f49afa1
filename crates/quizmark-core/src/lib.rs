//! quizmark-core: Form model, loader, and scoring engine.
//!
//! This crate defines the question/answer data model, the document loader,
//! and the scorer that turns a submission into per-question and total
//! points. Everything else in quizmark builds on it.

pub mod answers;
pub mod error;
pub mod model;
pub mod numbering;
pub mod parser;
pub mod report;
pub mod scorer;
pub mod session;
pub mod traits;
