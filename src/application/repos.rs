//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::ChangeRecord;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Page/limit request for reading the publish queue.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit,
        }
    }

    pub fn offset(self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// Parameters for creating a pending change record.
#[derive(Debug, Clone)]
pub struct NewChangeRecord {
    pub entity_type: String,
    pub entity_id: String,
}

/// Persistence port for the publish queue: one row per entity with a
/// pending (unflushed) change.
///
/// Implementations: Postgres ([`crate::infra::db::PostgresChangeQueue`])
/// and in-memory ([`crate::infra::memory::InMemoryChangeQueue`]).
#[async_trait]
pub trait ChangeQueueRepo: Send + Sync {
    /// Find the pending record for `(entity_type, entity_id)`, if any.
    async fn find_pending(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Option<ChangeRecord>, RepoError>;

    /// Create a new pending record.
    async fn create(&self, record: NewChangeRecord) -> Result<ChangeRecord, RepoError>;

    /// Bump the updated timestamp of an existing pending record.
    async fn touch(&self, id: Uuid, updated_at: OffsetDateTime) -> Result<(), RepoError>;

    /// Read one page of pending records, oldest first.
    async fn list_pending(&self, page: PageRequest) -> Result<Vec<ChangeRecord>, RepoError>;

    /// True when at least one record is pending.
    async fn has_pending(&self) -> Result<bool, RepoError>;

    /// Delete consumed records by id, returning the number removed.
    async fn delete(&self, ids: &[Uuid]) -> Result<u64, RepoError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_offsets() {
        assert_eq!(PageRequest::new(1, 50).offset(), 0);
        assert_eq!(PageRequest::new(3, 50).offset(), 100);
        // Page numbers clamp to 1-based.
        assert_eq!(PageRequest::new(0, 50).offset(), 0);
    }
}
