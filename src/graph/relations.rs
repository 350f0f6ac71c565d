//! Relation extraction over schema field trees.
//!
//! Walks a field tree depth-first and yields every outgoing relation with
//! the dotted path of its named ancestors. Anonymous layout constructs
//! (rows, collapsibles, unnamed tabs) and block slugs never appear in the
//! path; they are structural, not part of the stored document shape.

use crate::domain::fields::{Field, RelationTarget};

/// One concrete outgoing relation discovered in a field tree.
///
/// A polymorphic declaration (a list of target collections) produces one
/// `FieldRelation` per target, each flagged `polymorphic: true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRelation {
    /// Dotted path from the field tree root, named ancestors only.
    pub field: String,
    /// Target collection slug.
    pub collection: String,
    pub has_many: bool,
    pub polymorphic: bool,
}

/// Collect every outgoing relation of a field tree, depth-first in
/// declaration order.
pub fn collect_relations(fields: &[Field]) -> Vec<FieldRelation> {
    let mut out = Vec::new();
    walk(fields, "", &mut out);
    out
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn push_targets(
    out: &mut Vec<FieldRelation>,
    path: String,
    relation_to: &RelationTarget,
    has_many: bool,
) {
    match relation_to {
        RelationTarget::One(target) => out.push(FieldRelation {
            field: path,
            collection: target.clone(),
            has_many,
            polymorphic: false,
        }),
        RelationTarget::Many(targets) => {
            for target in targets {
                out.push(FieldRelation {
                    field: path.clone(),
                    collection: target.clone(),
                    has_many,
                    polymorphic: true,
                });
            }
        }
    }
}

// Every field kind is classified here. The match is exhaustive on purpose:
// a new kind that is not classified fails to compile instead of silently
// under-counting relations.
fn walk(fields: &[Field], prefix: &str, out: &mut Vec<FieldRelation>) {
    for field in fields {
        match field {
            Field::Relationship {
                name,
                relation_to,
                has_many,
            }
            | Field::Upload {
                name,
                relation_to,
                has_many,
            } => push_targets(out, join_path(prefix, name), relation_to, *has_many),
            Field::Group { name, fields } | Field::Array { name, fields } => {
                walk(fields, &join_path(prefix, name), out);
            }
            Field::Row { fields } | Field::Collapsible { fields } => {
                walk(fields, prefix, out);
            }
            Field::Blocks { name, blocks } => {
                // Block slugs are structural; the stored path only carries
                // the parent field's name.
                let path = join_path(prefix, name);
                for block in blocks {
                    walk(&block.fields, &path, out);
                }
            }
            Field::Tabs { tabs } => {
                for tab in tabs {
                    match &tab.name {
                        Some(name) => walk(&tab.fields, &join_path(prefix, name), out),
                        None => walk(&tab.fields, prefix, out),
                    }
                }
            }
            Field::Text { .. }
            | Field::RichText { .. }
            | Field::Number { .. }
            | Field::Checkbox { .. }
            | Field::Date { .. }
            | Field::Select { .. }
            | Field::Email { .. }
            | Field::Code { .. } => {}
        }
    }
}
