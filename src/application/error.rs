use thiserror::Error;

use super::repos::RepoError;

/// Failure reported by a cache-tag invalidation backend.
#[derive(Debug, Error)]
pub enum TagError {
    #[error("tag invalidation failed for `{tag}`: {message}")]
    Invalidate { tag: String, message: String },
}

impl TagError {
    pub fn invalidate(tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalidate {
            tag: tag.into(),
            message: message.into(),
        }
    }
}

/// Composite error surfaced by the hook and publish entry points.
///
/// Persistence and tag failures propagate unmodified: a silently failed
/// invalidation is worse than a loud one, so nothing here is swallowed.
#[derive(Debug, Error)]
pub enum InvalidationError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Tag(#[from] TagError),
}
