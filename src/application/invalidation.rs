//! Invalidation hook policy.
//!
//! Each host lifecycle hook (collection after-change, collection
//! after-delete, global after-change) is one transition of the policy state
//! machine: decide whether the mutation invalidates cache tags now, which
//! downstream tags are transitively affected, whether to notify the
//! external observer, and whether to record the change in the publish
//! queue for deferred flushing.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use rinfresco_api_types::InvalidationEventPayload;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::domain::reference::{EntityKind, EntityRef};
use crate::domain::schema::SchemaSnapshot;
use crate::domain::types::DocStatus;
use crate::graph::dependency::DependencyGraph;
use crate::graph::tracked::TrackedEntities;

use super::error::{InvalidationError, TagError};
use super::repos::{ChangeQueueRepo, NewChangeRecord, RepoError};

pub(crate) const METRIC_INVALIDATIONS_TOTAL: &str = "rinfresco_tag_invalidations_total";
pub(crate) const METRIC_TRACKED_CHANGES_TOTAL: &str = "rinfresco_tracked_changes_total";

/// Cache-tag invalidation primitive supplied by the host: marks cached
/// responses under the tag stale for subsequent fetches.
#[async_trait]
pub trait TagInvalidator: Send + Sync {
    async fn invalidate(&self, tag: &str) -> Result<(), TagError>;
}

/// Notification delivered to the optional observer on each invalidation of
/// a tracked entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationEvent {
    pub kind: EntityKind,
    pub slug: String,
    pub doc_id: Option<String>,
}

impl From<&InvalidationEvent> for InvalidationEventPayload {
    fn from(event: &InvalidationEvent) -> Self {
        Self {
            entity_kind: event.kind.as_str().to_string(),
            slug: event.slug.clone(),
            doc_id: event.doc_id.clone(),
        }
    }
}

/// Observer callback fired per invalidation of a tracked entity, enabling
/// downstream systems (webhook relays and the like) to react.
pub type InvalidationObserver = Arc<dyn Fn(&InvalidationEvent) + Send + Sync>;

/// Behavior toggles: a deployment chooses immediate tag invalidation,
/// deferred publish-queue tracking, or both (for different cache layers).
#[derive(Debug, Clone, Copy)]
pub struct InvalidationBehavior {
    pub invalidate_on_save: bool,
    pub track_changes: bool,
}

impl Default for InvalidationBehavior {
    fn default() -> Self {
        Self {
            invalidate_on_save: true,
            track_changes: true,
        }
    }
}

/// Hook entry points, constructed once at startup and shared by reference
/// into every hook registration. All dependencies are explicit; there is no
/// ambient plugin context.
pub struct InvalidationService {
    schema: Arc<SchemaSnapshot>,
    graph: Arc<DependencyGraph>,
    tracked: Arc<TrackedEntities>,
    queue: Arc<dyn ChangeQueueRepo>,
    tags: Arc<dyn TagInvalidator>,
    observer: Option<InvalidationObserver>,
    behavior: InvalidationBehavior,
}

impl InvalidationService {
    pub fn new(
        schema: Arc<SchemaSnapshot>,
        graph: Arc<DependencyGraph>,
        tracked: Arc<TrackedEntities>,
        queue: Arc<dyn ChangeQueueRepo>,
        tags: Arc<dyn TagInvalidator>,
        observer: Option<InvalidationObserver>,
        behavior: InvalidationBehavior,
    ) -> Self {
        Self {
            schema,
            graph,
            tracked,
            queue,
            tags,
            observer,
            behavior,
        }
    }

    /// Collection after-change hook (create or update).
    pub async fn collection_changed(
        &self,
        slug: &str,
        doc: &Value,
        previous_doc: Option<&Value>,
    ) -> Result<(), InvalidationError> {
        let doc_id = document_id(doc);

        if self.behavior.track_changes && self.tracked.is_tracked_collection(slug) {
            self.record_change(slug, doc_id.as_deref()).await?;
        }

        let drafts_enabled = self
            .schema
            .collection(slug)
            .is_some_and(|collection| collection.drafts);
        let status = DocStatus::from_document(doc);
        let previous_status = previous_doc.and_then(DocStatus::from_document);

        if !should_invalidate_on_save(drafts_enabled, previous_status, status) {
            debug!(
                collection = %slug,
                status = ?status,
                previous_status = ?previous_status,
                "save kept draft status, skipping invalidation"
            );
            return Ok(());
        }

        if self.behavior.invalidate_on_save {
            self.invalidate_entity(EntityRef::collection(slug), doc_id)
                .await?;
        }
        Ok(())
    }

    /// Collection after-delete hook. Deletion has no draft ambiguity:
    /// always invalidates.
    pub async fn collection_deleted(
        &self,
        slug: &str,
        doc: &Value,
    ) -> Result<(), InvalidationError> {
        let doc_id = document_id(doc);

        if self.behavior.track_changes && self.tracked.is_tracked_collection(slug) {
            self.record_change(slug, doc_id.as_deref()).await?;
        }

        self.invalidate_entity(EntityRef::collection(slug), doc_id)
            .await
    }

    /// Global after-change hook. No-op for globals outside the registered
    /// tracked set.
    pub async fn global_changed(&self, slug: &str, doc: &Value) -> Result<(), InvalidationError> {
        if !self.tracked.is_tracked_global(slug) {
            debug!(global = %slug, "global not registered for tracking, skipping");
            return Ok(());
        }

        let doc_id = document_id(doc);
        if self.behavior.track_changes {
            self.record_change(slug, doc_id.as_deref()).await?;
        }

        self.invalidate_entity(EntityRef::global(slug), doc_id).await
    }

    /// Invalidate the entity's own tag plus every transitively dependant
    /// tag, then notify the observer when the entity is tracked.
    async fn invalidate_entity(
        &self,
        entity: EntityRef,
        doc_id: Option<String>,
    ) -> Result<(), InvalidationError> {
        let mut tags: BTreeSet<String> = BTreeSet::new();
        tags.insert(entity.slug.clone());
        for dependant in self.graph.dependants_closure(&entity) {
            tags.insert(dependant.slug);
        }

        for tag in &tags {
            self.tags.invalidate(tag).await?;
            counter!(METRIC_INVALIDATIONS_TOTAL).increment(1);
        }

        info!(
            entity = %entity,
            doc_id = ?doc_id,
            tag_count = tags.len(),
            "cache tags invalidated"
        );

        let entity_is_tracked = match entity.kind {
            EntityKind::Collection => self.tracked.is_tracked_collection(&entity.slug),
            EntityKind::Global => self.tracked.is_tracked_global(&entity.slug),
        };
        if entity_is_tracked {
            if let Some(observer) = &self.observer {
                observer(&InvalidationEvent {
                    kind: entity.kind,
                    slug: entity.slug,
                    doc_id,
                });
            }
        }

        Ok(())
    }

    /// Upsert the pending change record for `(entity_type, entity_id)`.
    ///
    /// Read-then-write without compare-and-swap: two concurrent mutators of
    /// the same entity may both create a row. The set-based flush makes the
    /// duplicate harmless.
    async fn record_change(
        &self,
        entity_type: &str,
        entity_id: Option<&str>,
    ) -> Result<(), RepoError> {
        let Some(entity_id) = entity_id else {
            debug!(entity_type = %entity_type, "document carries no id, nothing to track");
            return Ok(());
        };

        match self.queue.find_pending(entity_type, entity_id).await? {
            Some(existing) => {
                self.queue
                    .touch(existing.id, OffsetDateTime::now_utc())
                    .await?;
            }
            None => {
                self.queue
                    .create(NewChangeRecord {
                        entity_type: entity_type.to_string(),
                        entity_id: entity_id.to_string(),
                    })
                    .await?;
            }
        }
        counter!(METRIC_TRACKED_CHANGES_TOTAL).increment(1);
        Ok(())
    }
}

/// Draft-aware save policy, evaluated over the `(previous, current)` status
/// pair. Collections without draft support invalidate on every save; with
/// draft support only a save that *results in* a published document
/// invalidates (a republish as much as a first publish). A never-published
/// draft save is a no-op.
pub fn should_invalidate_on_save(
    drafts_enabled: bool,
    previous: Option<DocStatus>,
    current: Option<DocStatus>,
) -> bool {
    if !drafts_enabled {
        return true;
    }
    match (previous, current) {
        (_, Some(DocStatus::Published)) => true,
        (_, Some(DocStatus::Draft) | None) => false,
    }
}

/// Document ids arrive as strings or integers depending on the host's id
/// strategy; anything else reads as absent.
pub(crate) fn document_id(doc: &Value) -> Option<String> {
    match doc.get("id") {
        Some(Value::String(id)) => Some(id.clone()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drafts_disabled_always_invalidates() {
        assert!(should_invalidate_on_save(false, None, None));
        assert!(should_invalidate_on_save(
            false,
            Some(DocStatus::Draft),
            Some(DocStatus::Draft)
        ));
    }

    #[test]
    fn draft_transition_matrix() {
        // (draft, draft) -> no
        assert!(!should_invalidate_on_save(
            true,
            Some(DocStatus::Draft),
            Some(DocStatus::Draft)
        ));
        // (draft, published) -> yes
        assert!(should_invalidate_on_save(
            true,
            Some(DocStatus::Draft),
            Some(DocStatus::Published)
        ));
        // (published, published) -> yes, a re-save still invalidates
        assert!(should_invalidate_on_save(
            true,
            Some(DocStatus::Published),
            Some(DocStatus::Published)
        ));
        // first save straight to published
        assert!(should_invalidate_on_save(
            true,
            None,
            Some(DocStatus::Published)
        ));
        // first save as draft
        assert!(!should_invalidate_on_save(
            true,
            None,
            Some(DocStatus::Draft)
        ));
    }

    #[test]
    fn document_id_reads_strings_and_numbers() {
        assert_eq!(
            document_id(&serde_json::json!({"id": "p1"})),
            Some("p1".to_string())
        );
        assert_eq!(
            document_id(&serde_json::json!({"id": 42})),
            Some("42".to_string())
        );
        assert_eq!(document_id(&serde_json::json!({"id": null})), None);
        assert_eq!(document_id(&serde_json::json!({})), None);
    }
}
