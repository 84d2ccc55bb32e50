//! Error types for index generation and queries.

use std::path::PathBuf;

use mds_compiler::{CompileError, ValidationError};

/// Failure of a whole index generation or persistence step.
///
/// Nothing is written to the destination when one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// A document failed to compile.
    #[error("failed to compile {}: {source}", path.display())]
    Compile {
        path: PathBuf,
        #[source]
        source: CompileError,
    },
    /// Filesystem failure while reading sources or writing output.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Index serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Two documents map to the same slug.
    #[error("{} and {} both map to slug {slug:?}", first.display(), second.display())]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
    /// Worker pool could not be created.
    #[error("failed to create thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// Rejected input value.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl SiteError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure to read a document's metadata comment.
///
/// Recoverable: the builder logs it and continues without metadata.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// `<!--` without a closing `-->`.
    #[error("invalid metadata format: missing closing -->")]
    Unterminated,
    /// Comment body is not a valid metadata object.
    #[error("failed to parse metadata: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Query failure distinct from I/O.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// No entry with the requested slug.
    #[error("page not found in site index: {0:?}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_error_messages() {
        let err = SiteError::DuplicateSlug {
            slug: "my_page".to_owned(),
            first: PathBuf::from("content/my page.md"),
            second: PathBuf::from("content/my_page.md"),
        };
        assert_eq!(
            err.to_string(),
            r#"content/my page.md and content/my_page.md both map to slug "my_page""#
        );

        let err = SiteError::Compile {
            path: PathBuf::from("content/a.md"),
            source: CompileError::InvalidUtf8 { offset: 4 },
        };
        assert!(err.to_string().starts_with("failed to compile content/a.md: "));
    }

    #[test]
    fn test_validation_is_transparent() {
        let err = SiteError::from(ValidationError::SortDirection("up".to_owned()));
        assert_eq!(
            err.to_string(),
            ValidationError::SortDirection("up".to_owned()).to_string()
        );
    }

    #[test]
    fn test_query_error_message() {
        assert_eq!(
            QueryError::NotFound("blog/x".to_owned()).to_string(),
            r#"page not found in site index: "blog/x""#
        );
    }
}
