//! Error types for madrasati-core.

use thiserror::Error;

/// Result type alias using TemplateError.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Errors that can occur while parsing a fill-in-the-blank template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unclosed blank marker at byte {offset}")]
    UnclosedBlank { offset: usize },

    #[error("blank {index} has no expected answer")]
    EmptyBlank { index: usize },

    #[error("template declares no blanks")]
    NoBlanks,
}
