//! Schema snapshot consumed from the host framework.
//!
//! The snapshot is taken once at plugin initialization and treated as
//! immutable for the process lifetime; the dependency graph and tracked set
//! are derived from it.

use serde::Deserialize;

use super::error::DomainError;
use super::fields::Field;

/// One collection in the host schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollectionSchema {
    pub slug: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Whether documents carry a draft/published status.
    #[serde(default)]
    pub drafts: bool,
}

/// One global in the host schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GlobalSchema {
    pub slug: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// Full schema description: every registered collection and global with its
/// field tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SchemaSnapshot {
    #[serde(default)]
    pub collections: Vec<CollectionSchema>,
    #[serde(default)]
    pub globals: Vec<GlobalSchema>,
}

impl SchemaSnapshot {
    pub fn new(collections: Vec<CollectionSchema>, globals: Vec<GlobalSchema>) -> Self {
        Self {
            collections,
            globals,
        }
    }

    /// Parse the host's JSON schema description. An unknown field kind
    /// anywhere in the tree fails loudly here rather than being skipped.
    pub fn from_json(value: serde_json::Value) -> Result<Self, DomainError> {
        serde_json::from_value(value).map_err(|err| DomainError::schema(err.to_string()))
    }

    pub fn collection(&self, slug: &str) -> Option<&CollectionSchema> {
        self.collections.iter().find(|c| c.slug == slug)
    }

    pub fn global(&self, slug: &str) -> Option<&GlobalSchema> {
        self.globals.iter().find(|g| g.slug == slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_slug() {
        let snapshot = SchemaSnapshot::new(
            vec![CollectionSchema {
                slug: "posts".to_string(),
                fields: Vec::new(),
                drafts: true,
            }],
            vec![GlobalSchema {
                slug: "footer".to_string(),
                fields: Vec::new(),
            }],
        );

        assert!(snapshot.collection("posts").is_some());
        assert!(snapshot.collection("missing").is_none());
        assert!(snapshot.global("footer").is_some());
        assert!(snapshot.global("posts").is_none());
    }

    #[test]
    fn from_json_accepts_well_formed_schema() {
        let snapshot = SchemaSnapshot::from_json(serde_json::json!({
            "collections": [
                {
                    "slug": "posts",
                    "drafts": true,
                    "fields": [
                        {"type": "text", "name": "title"},
                        {"type": "relationship", "name": "author", "relation_to": "users"}
                    ]
                }
            ],
            "globals": [
                {"slug": "footer", "fields": []}
            ]
        }))
        .expect("parse");

        assert_eq!(snapshot.collections.len(), 1);
        assert!(snapshot.collections[0].drafts);
        assert_eq!(snapshot.globals.len(), 1);
    }

    #[test]
    fn from_json_rejects_unknown_field_kind() {
        let err = SchemaSnapshot::from_json(serde_json::json!({
            "collections": [
                {"slug": "posts", "fields": [{"type": "teleport", "name": "x"}]}
            ]
        }))
        .unwrap_err();

        assert!(matches!(err, DomainError::Schema { .. }));
    }
}
