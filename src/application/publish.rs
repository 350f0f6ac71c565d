//! Deferred-publish flow over the persisted queue.
//!
//! Backs the `check-changes` and `publish-changes` API operations: hydrate
//! a fresh ledger from the queue, invalidate the tag of every entity with
//! pending changes (plus transitive dependants), then delete the consumed
//! records. The flush is idempotent per entity (re-invalidating an
//! already-stale tag is harmless), so a failed run can simply be retried.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use metrics::counter;
use tracing::info;
use uuid::Uuid;

use crate::domain::entities::ChangeRecord;
use crate::graph::dependency::DependencyGraph;

use super::error::InvalidationError;
use super::invalidation::{METRIC_INVALIDATIONS_TOTAL, TagInvalidator};
use super::ledger::CollectionChanges;
use super::repos::{ChangeQueueRepo, PageRequest, RepoError};

pub(crate) const METRIC_PUBLISH_FLUSHES_TOTAL: &str = "rinfresco_publish_flushes_total";

/// Outcome of a successful flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Entity type to the ids whose pending changes were flushed.
    pub published: BTreeMap<String, Vec<String>>,
    /// Distinct cache tags invalidated, dependants included.
    pub invalidated_tags: usize,
}

pub struct PublishService {
    queue: Arc<dyn ChangeQueueRepo>,
    tags: Arc<dyn TagInvalidator>,
    graph: Arc<DependencyGraph>,
    page_size: u32,
}

impl PublishService {
    pub fn new(
        queue: Arc<dyn ChangeQueueRepo>,
        tags: Arc<dyn TagInvalidator>,
        graph: Arc<DependencyGraph>,
        page_size: u32,
    ) -> Self {
        Self {
            queue,
            tags,
            graph,
            page_size: page_size.max(1),
        }
    }

    /// True when at least one change record is pending.
    pub async fn has_pending_changes(&self) -> Result<bool, RepoError> {
        self.queue.has_pending().await
    }

    /// Hydrate a fresh in-memory ledger from the persisted queue.
    pub async fn pending_changes(&self) -> Result<CollectionChanges, RepoError> {
        let records = self.pending_records().await?;
        let mut ledger = CollectionChanges::new();
        ledger.initialize(&records);
        Ok(ledger)
    }

    /// Flush the queue: invalidate every pending entity's tag (and its
    /// dependants' tags), then delete the consumed records.
    pub async fn publish_changes(&self) -> Result<PublishOutcome, InvalidationError> {
        let records = self.pending_records().await?;
        let mut ledger = CollectionChanges::new();
        ledger.initialize(&records);

        let published = ledger.serialize();

        let mut tags: BTreeSet<String> = BTreeSet::new();
        for entity_type in published.keys() {
            tags.insert(entity_type.clone());
            for dependant in self.graph.dependants_closure_for_slug(entity_type) {
                tags.insert(dependant.slug);
            }
        }

        for tag in &tags {
            self.tags.invalidate(tag).await?;
            counter!(METRIC_INVALIDATIONS_TOTAL).increment(1);
        }

        let consumed: Vec<Uuid> = records.iter().map(|record| record.id).collect();
        let removed = if consumed.is_empty() {
            0
        } else {
            self.queue.delete(&consumed).await?
        };

        counter!(METRIC_PUBLISH_FLUSHES_TOTAL).increment(1);
        info!(
            entities = published.len(),
            tags = tags.len(),
            records_removed = removed,
            "publish queue flushed"
        );

        Ok(PublishOutcome {
            published,
            invalidated_tags: tags.len(),
        })
    }

    // Collects every pending record by paging oldest-first. Records created
    // after the first page was read may or may not be included; they stay
    // queued for the next flush either way.
    async fn pending_records(&self) -> Result<Vec<ChangeRecord>, RepoError> {
        let mut records = Vec::new();
        let mut page = 1u32;
        loop {
            let batch = self
                .queue
                .list_pending(PageRequest::new(page, self.page_size))
                .await?;
            let batch_len = batch.len();
            records.extend(batch);
            if batch_len < self.page_size as usize {
                break;
            }
            page += 1;
        }
        Ok(records)
    }
}
