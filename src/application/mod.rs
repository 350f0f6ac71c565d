//! Application services layer: the ledger, the hook policy, and the
//! deferred-publish flow.

pub mod error;
pub mod invalidation;
pub mod ledger;
pub mod publish;
pub mod repos;
pub mod runtime;

pub use error::{InvalidationError, TagError};
pub use invalidation::{
    InvalidationBehavior, InvalidationEvent, InvalidationObserver, InvalidationService,
    TagInvalidator, should_invalidate_on_save,
};
pub use ledger::CollectionChanges;
pub use publish::{PublishOutcome, PublishService};
pub use repos::{ChangeQueueRepo, NewChangeRecord, PageRequest, RepoError};
pub use runtime::InvalidationRuntime;
