//! Field tree definitions for host schemas.
//!
//! The field kinds form a closed tagged union: the relation extractor
//! matches on every variant, so a new kind added here without a
//! classification there fails to compile instead of silently dropping
//! relations. At the ingestion boundary an unknown `type` string is a
//! deserialization error, never a skipped field.

use serde::Deserialize;

/// Target declaration of a reference field.
///
/// A `Many` declaration makes the relation polymorphic: the stored value may
/// point at any of the listed collections.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RelationTarget {
    One(String),
    Many(Vec<String>),
}

/// A named sub-schema inside a `blocks` field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Block {
    pub slug: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// One tab inside a `tabs` field. Anonymous tabs group fields visually
/// without affecting stored paths.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tab {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// A single field definition in a collection or global schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Field {
    /// Reference to one or more target collections.
    Relationship {
        name: String,
        relation_to: RelationTarget,
        #[serde(default)]
        has_many: bool,
    },
    /// Media reference; relates to the upload collection(s) it draws from.
    Upload {
        name: String,
        relation_to: RelationTarget,
        #[serde(default)]
        has_many: bool,
    },
    /// Named grouping; the name joins the stored path.
    Group {
        name: String,
        #[serde(default)]
        fields: Vec<Field>,
    },
    /// Repeating sub-schema; the name joins the stored path.
    Array {
        name: String,
        #[serde(default)]
        fields: Vec<Field>,
    },
    /// Anonymous horizontal layout; structural only.
    Row {
        #[serde(default)]
        fields: Vec<Field>,
    },
    /// Anonymous collapsible layout; structural only.
    Collapsible {
        #[serde(default)]
        fields: Vec<Field>,
    },
    /// One of several named sub-schemas; the field name joins the stored
    /// path, block slugs do not.
    Blocks {
        name: String,
        #[serde(default)]
        blocks: Vec<Block>,
    },
    /// Tabbed grouping; only named tabs join the stored path.
    Tabs {
        #[serde(default)]
        tabs: Vec<Tab>,
    },
    // Leaf kinds: no outgoing relations.
    Text { name: String },
    RichText { name: String },
    Number { name: String },
    Checkbox { name: String },
    Date { name: String },
    Select { name: String },
    Email { name: String },
    Code { name: String },
}
