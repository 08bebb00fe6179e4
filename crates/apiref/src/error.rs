//! CLI error types.

use apiref_config::ConfigError;
use apiref_doc::SourceError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Link(#[from] apiref_core::Error),

    #[error("{0}")]
    Validation(String),
}
