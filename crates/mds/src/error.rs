//! CLI error types.

use mds_compiler::{CompileError, ValidationError};
use mds_config::ConfigError;
use mds_site::{QueryError, SiteError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Compile(#[from] CompileError),

    #[error("{0}")]
    Site(#[from] SiteError),

    #[error("{0}")]
    Query(#[from] QueryError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("no base URL given and site.base_url is not configured")]
    MissingBaseUrl,
}
