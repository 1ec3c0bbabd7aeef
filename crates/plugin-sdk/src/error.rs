//! Errors reported by host collaborators.

use thiserror::Error;

use crate::types::ItemId;

/// Failure of a content repository lookup.
///
/// Blocks never substitute content for a failed lookup; they hand this error
/// back to the host unchanged.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("content repository unavailable: {0}")]
    Unavailable(String),
    #[error("invalid query: {message}")]
    InvalidQuery { message: String },
    #[error("item {0} not found")]
    NotFound(ItemId),
}

impl RepositoryError {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        Self::Unavailable(err.to_string())
    }
}
