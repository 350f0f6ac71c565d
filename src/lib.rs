//! Rinfresco: smart-cache invalidation for headless CMS backends.
//!
//! Given a snapshot of the host schema (collections and globals with their
//! field trees), the engine derives a dependency graph between entities,
//! resolves which entities must be tracked, and decides on every document
//! mutation which cache tags to invalidate, immediately (draft-aware) or
//! deferred through a durable publish queue.
//!
//! ## Wiring
//!
//! ```ignore
//! let schema = SchemaSnapshot::from_json(host_schema_json)?;
//! let queue = Arc::new(PostgresChangeQueue::new(pool));
//! let runtime = InvalidationRuntime::initialize(
//!     schema,
//!     &settings,
//!     queue,
//!     tags,          // host cache-tag primitive
//!     Some(observer) // optional webhook relay
//! );
//!
//! // Register runtime.invalidation with the host lifecycle hooks and
//! // mount the API router:
//! let api = build_router(ApiState { publish: runtime.publish.clone() });
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod graph;
pub mod infra;

pub use application::{
    ChangeQueueRepo, CollectionChanges, InvalidationBehavior, InvalidationError,
    InvalidationEvent, InvalidationObserver, InvalidationRuntime, InvalidationService,
    NewChangeRecord, PageRequest, PublishOutcome, PublishService, RepoError, TagError,
    TagInvalidator,
};
pub use config::{CollectionSelector, InvalidationSettings};
pub use domain::{
    ChangeRecord, CollectionSchema, DocStatus, DomainError, EntityKind, EntityRef, Field,
    GlobalSchema, RelationTarget, SchemaSnapshot,
};
pub use graph::{DependencyGraph, FieldRelation, TrackedEntities, collect_relations};
pub use infra::http::{ApiState, build_router};
