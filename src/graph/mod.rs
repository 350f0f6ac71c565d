//! Schema dependency analysis: relation extraction, the entity dependency
//! graph, and the tracked-entity closure.

pub mod dependency;
pub mod relations;
pub mod tracked;

pub use dependency::DependencyGraph;
pub use relations::{FieldRelation, collect_relations};
pub use tracked::TrackedEntities;
