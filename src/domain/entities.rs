//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// One pending change in the publish queue: an entity that was mutated
/// since the last flush.
///
/// `entity_id` is nullable in storage (the observed document id can be
/// cleared concurrently); rows that hydrate without one are skipped by
/// the ledger. At most one pending row per `(entity_type, entity_id)` is
/// the intended steady state; concurrent writers may briefly violate it,
/// which the set-based flush tolerates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRecord {
    pub id: Uuid,
    /// Slug of the mutated collection or global.
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
