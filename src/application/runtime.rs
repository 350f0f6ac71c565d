//! Engine assembly.
//!
//! Builds the dependency graph and tracked set from the schema snapshot
//! once, then wires the hook and publish services around them. Everything
//! downstream receives its dependencies explicitly: hooks and endpoint
//! handlers hold `Arc` handles, never ambient state.

use std::sync::Arc;

use tracing::info;

use crate::config::InvalidationSettings;
use crate::domain::schema::SchemaSnapshot;
use crate::graph::dependency::DependencyGraph;
use crate::graph::tracked::TrackedEntities;

use super::invalidation::{
    InvalidationBehavior, InvalidationObserver, InvalidationService, TagInvalidator,
};
use super::publish::PublishService;
use super::repos::ChangeQueueRepo;

/// The assembled engine: one instance per process, built at plugin
/// initialization and shared for the process lifetime.
pub struct InvalidationRuntime {
    pub graph: Arc<DependencyGraph>,
    pub tracked: Arc<TrackedEntities>,
    pub invalidation: Arc<InvalidationService>,
    pub publish: Arc<PublishService>,
}

impl InvalidationRuntime {
    pub fn initialize(
        schema: SchemaSnapshot,
        settings: &InvalidationSettings,
        queue: Arc<dyn ChangeQueueRepo>,
        tags: Arc<dyn TagInvalidator>,
        observer: Option<InvalidationObserver>,
    ) -> Self {
        let schema = Arc::new(schema);
        let graph = Arc::new(DependencyGraph::build(&schema));
        let tracked = Arc::new(TrackedEntities::resolve(
            &settings.collections.slugs(),
            &settings.globals,
            &schema,
        ));

        info!(
            tracked_collections = tracked.collections().len(),
            tracked_globals = tracked.globals().len(),
            unresolved = tracked.unresolved().len(),
            "invalidation engine initialized"
        );

        let invalidation = Arc::new(InvalidationService::new(
            Arc::clone(&schema),
            Arc::clone(&graph),
            Arc::clone(&tracked),
            Arc::clone(&queue),
            Arc::clone(&tags),
            observer,
            InvalidationBehavior {
                invalidate_on_save: settings.invalidate_on_save,
                track_changes: settings.track_changes,
            },
        ));
        let publish = Arc::new(PublishService::new(
            queue,
            tags,
            Arc::clone(&graph),
            settings.queue_page_size,
        ));

        Self {
            graph,
            tracked,
            invalidation,
            publish,
        }
    }
}
