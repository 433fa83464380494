//! Error taxonomy for the article pipeline.
//!
//! Loader and renderer errors are per-article: the pipeline wraps them in a
//! [`Failure`], excludes the article and keeps going. [`NotFoundError`] is
//! the one error that reaches callers during normal operation.

use thiserror::Error;

/// A date that does not parse as `DD-MM-YYYY`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date '{value}': expected DD-MM-YYYY")]
pub struct DateParseError {
    pub value: String,
}

/// Missing or malformed required metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("malformed front matter: {0}")]
    FrontMatter(String),

    #[error(transparent)]
    Date(#[from] DateParseError),
}

/// Body content that cannot be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("code fence opened on line {line} is never closed")]
    UnclosedFence { line: usize },

    #[error("body contains a NUL character at byte {offset}")]
    NulCharacter { offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("article not found: {id}")]
pub struct NotFoundError {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArticleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("duplicate article id '{id}' (first defined by {first_source})")]
    DuplicateId { id: String, first_source: String },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("could not read source: {0}")]
    Read(String),

    /// The task processing this article panicked or was cancelled.
    #[error("processing task failed: {0}")]
    Task(String),
}

impl From<DateParseError> for ArticleError {
    fn from(err: DateParseError) -> Self {
        ArticleError::Validation(ValidationError::Date(err))
    }
}

/// An article excluded from the batch, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub source_id: String,
    pub error: ArticleError,
}

impl Failure {
    pub fn new(source_id: impl Into<String>, error: impl Into<ArticleError>) -> Self {
        Self {
            source_id: source_id.into(),
            error: error.into(),
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.source_id, self.error)
    }
}
