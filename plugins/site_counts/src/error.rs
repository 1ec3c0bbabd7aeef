//! Block registration and rendering errors.

use site_counts_sdk::error::RepositoryError;
use thiserror::Error;

/// Errors surfaced to the host.
#[derive(Debug, Error)]
pub enum BlockError {
    #[error("invalid block metadata: {0:#}")]
    Manifest(#[from] anyhow::Error),

    #[error("block '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("unknown block '{0}'")]
    UnknownBlock(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result type alias using BlockError.
pub type BlockResult<T> = Result<T, BlockError>;
