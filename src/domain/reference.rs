//! Typed references to schema entities.
//!
//! An [`EntityRef`] names one collection or global in the host schema. Its
//! canonical string form (`"collection|posts"`, `"global|footer"`) is used as
//! the key of the dependency graph and in persisted queue rows.

use std::fmt;
use std::str::FromStr;

use super::error::DomainError;

/// The two entity families a host schema is composed of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Collection,
    Global,
}

impl EntityKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::Global => "global",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable reference to a collection-or-global entity.
///
/// Slugs are assumed not to contain `|` (a schema naming constraint enforced
/// by the host, not here), so stringify→parse→stringify is the identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub slug: String,
}

impl EntityRef {
    pub fn collection(slug: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::Collection,
            slug: slug.into(),
        }
    }

    pub fn global(slug: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::Global,
            slug: slug.into(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.kind, self.slug)
    }
}

impl FromStr for EntityRef {
    type Err = DomainError;

    /// Splits on the first `|`; the left part must be exactly `collection`
    /// or `global`. Anything else is an [`DomainError::InvalidReference`],
    /// never a silent coercion.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((kind, slug)) = s.split_once('|') else {
            return Err(DomainError::invalid_reference(s));
        };

        let kind = match kind {
            "collection" => EntityKind::Collection,
            "global" => EntityKind::Global,
            _ => return Err(DomainError::invalid_reference(s)),
        };

        Ok(Self {
            kind,
            slug: slug.to_string(),
        })
    }
}
