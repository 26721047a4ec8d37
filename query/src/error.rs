use thiserror::Error;

/// Errors surfaced by statement compilation. A compile error aborts before
/// any SQL reaches the execution layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Placeholder count mismatch: expected {expected}, found {found}")]
    PlaceholderCountMismatch { expected: usize, found: usize },
    #[error("Subquery must project exactly one field, found {found}")]
    SubqueryProjection { found: usize },
    #[error("Statement has no field values to write")]
    EmptyFieldValues,
    #[error("Unsupported language code: {0}")]
    UnsupportedLanguage(String),
}
