//! In-process adapters for the queue and tag ports.
//!
//! Suited to single-process deployments and tests; state lives behind
//! tokio `RwLock`s and disappears with the process. Durable deployments
//! use the Postgres adapter instead.

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::application::error::TagError;
use crate::application::invalidation::TagInvalidator;
use crate::application::repos::{ChangeQueueRepo, NewChangeRecord, PageRequest, RepoError};
use crate::domain::entities::ChangeRecord;

/// Volatile [`ChangeQueueRepo`] keeping records in insertion order, which
/// equals created-at order under a single process.
#[derive(Debug, Default)]
pub struct InMemoryChangeQueue {
    records: RwLock<Vec<ChangeRecord>>,
}

impl InMemoryChangeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ChangeQueueRepo for InMemoryChangeQueue {
    async fn find_pending(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Option<ChangeRecord>, RepoError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|record| {
                record.entity_type == entity_type
                    && record.entity_id.as_deref() == Some(entity_id)
            })
            .cloned())
    }

    async fn create(&self, record: NewChangeRecord) -> Result<ChangeRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let created = ChangeRecord {
            id: Uuid::new_v4(),
            entity_type: record.entity_type,
            entity_id: Some(record.entity_id),
            created_at: now,
            updated_at: now,
        };
        self.records.write().await.push(created.clone());
        Ok(created)
    }

    async fn touch(&self, id: Uuid, updated_at: OffsetDateTime) -> Result<(), RepoError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(RepoError::NotFound)?;
        record.updated_at = updated_at;
        Ok(())
    }

    async fn list_pending(&self, page: PageRequest) -> Result<Vec<ChangeRecord>, RepoError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn has_pending(&self) -> Result<bool, RepoError> {
        Ok(!self.records.read().await.is_empty())
    }

    async fn delete(&self, ids: &[Uuid]) -> Result<u64, RepoError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| !ids.contains(&record.id));
        Ok((before - records.len()) as u64)
    }
}

/// [`TagInvalidator`] that records every invalidated tag, in call order.
#[derive(Debug, Default)]
pub struct RecordingInvalidator {
    tags: RwLock<Vec<String>>,
}

impl RecordingInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the tags invalidated so far.
    pub async fn invalidated(&self) -> Vec<String> {
        self.tags.read().await.clone()
    }
}

#[async_trait]
impl TagInvalidator for RecordingInvalidator {
    async fn invalidate(&self, tag: &str) -> Result<(), TagError> {
        self.tags.write().await.push(tag.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_record(entity_type: &str, entity_id: &str) -> NewChangeRecord {
        NewChangeRecord {
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_find_pending() {
        let queue = InMemoryChangeQueue::new();
        queue.create(new_record("posts", "p1")).await.expect("create");

        let found = queue
            .find_pending("posts", "p1")
            .await
            .expect("find")
            .expect("record exists");
        assert_eq!(found.entity_type, "posts");

        assert!(queue.find_pending("posts", "p2").await.expect("find").is_none());
        assert!(queue.has_pending().await.expect("has_pending"));
    }

    #[tokio::test]
    async fn touch_bumps_updated_at() {
        let queue = InMemoryChangeQueue::new();
        let record = queue.create(new_record("posts", "p1")).await.expect("create");

        let later = record.updated_at + time::Duration::seconds(5);
        queue.touch(record.id, later).await.expect("touch");

        let found = queue
            .find_pending("posts", "p1")
            .await
            .expect("find")
            .expect("record exists");
        assert_eq!(found.updated_at, later);
        assert_eq!(queue.len().await, 1);
    }

    #[tokio::test]
    async fn touch_missing_record_is_not_found() {
        let queue = InMemoryChangeQueue::new();
        let err = queue
            .touch(Uuid::new_v4(), OffsetDateTime::now_utc())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    async fn pagination_walks_insertion_order() {
        let queue = InMemoryChangeQueue::new();
        for index in 0..5 {
            queue
                .create(new_record("posts", &format!("p{index}")))
                .await
                .expect("create");
        }

        let first = queue
            .list_pending(PageRequest::new(1, 2))
            .await
            .expect("page 1");
        let third = queue
            .list_pending(PageRequest::new(3, 2))
            .await
            .expect("page 3");

        assert_eq!(first.len(), 2);
        assert_eq!(first[0].entity_id.as_deref(), Some("p0"));
        assert_eq!(third.len(), 1);
        assert_eq!(third[0].entity_id.as_deref(), Some("p4"));
    }

    #[tokio::test]
    async fn delete_removes_only_named_ids() {
        let queue = InMemoryChangeQueue::new();
        let keep = queue.create(new_record("posts", "p1")).await.expect("create");
        let drop = queue.create(new_record("pages", "pg1")).await.expect("create");

        let removed = queue.delete(&[drop.id]).await.expect("delete");
        assert_eq!(removed, 1);
        assert_eq!(queue.len().await, 1);
        assert!(
            queue
                .find_pending("posts", "p1")
                .await
                .expect("find")
                .is_some_and(|record| record.id == keep.id)
        );
    }

    #[tokio::test]
    async fn recording_invalidator_keeps_call_order() {
        let tags = RecordingInvalidator::new();
        tags.invalidate("posts").await.expect("invalidate");
        tags.invalidate("footer").await.expect("invalidate");

        assert_eq!(
            tags.invalidated().await,
            vec!["posts".to_string(), "footer".to_string()]
        );
    }
}
