//! Error types for compilation and input validation.

/// Structural failure that prevents a document from being compiled.
///
/// Fatal for the document it occurs in. Batch callers treat the first
/// `CompileError` as a failure of the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// Input bytes are not valid UTF-8.
    #[error("document is not valid UTF-8 (invalid byte at offset {offset})")]
    InvalidUtf8 {
        /// Byte offset of the first invalid sequence.
        offset: usize,
    },
    /// A block extension fence was opened but never closed.
    #[error("unterminated `{token}` block opened on line {line}")]
    UnterminatedBlock {
        /// Opening fence token (e.g. `:::repo`).
        token: &'static str,
        /// 1-based line number of the opening fence.
        line: usize,
    },
}

/// Rejected input value.
///
/// Never coerced to a default: callers either surface it or, for repository
/// cards, render it inline in place of the card.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Sort direction other than `asc` or `desc`.
    #[error("invalid sort direction: {0:?} (expected \"asc\" or \"desc\")")]
    SortDirection(String),
    /// Filter pattern that does not compile as a regular expression.
    #[error("invalid filter pattern {pattern:?}: {message}")]
    FilterPattern {
        /// The rejected pattern.
        pattern: String,
        /// Regex compiler message.
        message: String,
    },
    /// Repository card line that is not `owner/repo`.
    #[error("Invalid repository format: {0:?} (expected owner/repo)")]
    RepoFormat(String),
    /// Repository card owner or name with disallowed characters.
    #[error("Invalid repository identifier: {0:?} (allowed: letters, digits, '.', '_', '-')")]
    RepoIdentifier(String),
}
