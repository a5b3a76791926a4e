//! Error types for code analysis.

use thiserror::Error;

/// Errors that can occur while explaining a snippet.
///
/// `analyze` never returns these directly; they are folded into an error
/// envelope at the analysis boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExplainError {
    /// The source could not be parsed (Python only).
    #[error("{message} (line {line})")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("parser failure: {0}")]
    Parser(String),
    #[error("{0}")]
    Internal(String),
    #[error("language {0:?} is not supported (supported: python, javascript, java, cpp)")]
    UnsupportedLanguage(String),
}

impl ExplainError {
    /// Whether this is a parse failure rather than an internal one.
    pub fn is_syntax(&self) -> bool {
        matches!(self, ExplainError::Syntax { .. })
    }
}

impl From<tree_sitter::LanguageError> for ExplainError {
    fn from(err: tree_sitter::LanguageError) -> Self {
        ExplainError::Parser(err.to_string())
    }
}

impl From<tree_sitter::QueryError> for ExplainError {
    fn from(err: tree_sitter::QueryError) -> Self {
        ExplainError::Parser(format!("invalid query: {}", err))
    }
}
