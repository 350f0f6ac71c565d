//! Tracked-entity resolution.
//!
//! Computes, from the configured root collections and globals, the full set
//! of collections whose writes must be observed to keep the roots' caches
//! correct. Globals are traversal origins and are registered for the global
//! after-change hook, but only *collection* slugs enter the tracked set:
//! the set answers "which collection writes should trigger invalidation".

use std::collections::HashSet;

use tracing::warn;

use crate::domain::schema::SchemaSnapshot;

use super::relations::collect_relations;

/// Result of the tracked-entity closure.
#[derive(Debug, Default)]
pub struct TrackedEntities {
    collections: HashSet<String>,
    globals: HashSet<String>,
    unresolved: Vec<String>,
}

impl TrackedEntities {
    /// Resolve the closure from the configured roots.
    ///
    /// Unresolvable slugs are recorded and logged as warnings, never fatal:
    /// schema composition order across plugins cannot always guarantee a
    /// root is registered yet, and a misconfigured slug must not take the
    /// whole initialization down.
    pub fn resolve(
        root_collections: &[String],
        root_globals: &[String],
        schema: &SchemaSnapshot,
    ) -> Self {
        let mut tracked = Self::default();

        for slug in root_globals {
            let Some(global) = schema.global(slug) else {
                warn!(slug = %slug, kind = "global", "tracked root not found in schema, skipping");
                tracked.unresolved.push(slug.clone());
                continue;
            };
            tracked.globals.insert(slug.clone());
            for relation in collect_relations(&global.fields) {
                tracked.visit_collection(&relation.collection, schema);
            }
        }

        for slug in root_collections {
            if schema.collection(slug).is_none() {
                warn!(slug = %slug, kind = "collection", "tracked root not found in schema, skipping");
                tracked.unresolved.push(slug.clone());
                continue;
            }
            tracked.visit_collection(slug, schema);
        }

        tracked
    }

    // The visited set doubles as the cycle guard and the dedup mechanism.
    fn visit_collection(&mut self, slug: &str, schema: &SchemaSnapshot) {
        if self.collections.contains(slug) {
            return;
        }
        let Some(collection) = schema.collection(slug) else {
            warn!(slug = %slug, kind = "collection", "relation target not found in schema, skipping");
            self.unresolved.push(slug.to_string());
            return;
        };

        self.collections.insert(slug.to_string());
        for relation in collect_relations(&collection.fields) {
            self.visit_collection(&relation.collection, schema);
        }
    }

    /// Collections whose mutations must be observed.
    pub fn collections(&self) -> &HashSet<String> {
        &self.collections
    }

    /// Registered root globals that resolved in the schema.
    pub fn globals(&self) -> &HashSet<String> {
        &self.globals
    }

    /// Root or relation-target slugs that did not resolve.
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    pub fn is_tracked_collection(&self, slug: &str) -> bool {
        self.collections.contains(slug)
    }

    pub fn is_tracked_global(&self, slug: &str) -> bool {
        self.globals.contains(slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fields::{Field, RelationTarget};
    use crate::domain::schema::{CollectionSchema, GlobalSchema};

    fn collection(slug: &str, fields: Vec<Field>) -> CollectionSchema {
        CollectionSchema {
            slug: slug.to_string(),
            fields,
            drafts: false,
        }
    }

    fn relationship(name: &str, target: &str) -> Field {
        Field::Relationship {
            name: name.to_string(),
            relation_to: RelationTarget::One(target.to_string()),
            has_many: false,
        }
    }

    fn slugs(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn closure_is_transitive_and_deduplicating() {
        let schema = SchemaSnapshot::new(
            vec![
                collection("posts", vec![relationship("author", "users")]),
                collection("pages", vec![relationship("editor", "users")]),
                collection("users", Vec::new()),
            ],
            Vec::new(),
        );

        let tracked = TrackedEntities::resolve(&slugs(&["posts", "pages"]), &[], &schema);

        assert_eq!(
            tracked.collections(),
            &HashSet::from([
                "posts".to_string(),
                "pages".to_string(),
                "users".to_string(),
            ])
        );
        assert!(tracked.unresolved().is_empty());
    }

    #[test]
    fn unknown_root_is_a_warning_not_a_failure() {
        let schema = SchemaSnapshot::default();

        let tracked = TrackedEntities::resolve(&slugs(&["missing"]), &[], &schema);

        assert!(tracked.collections().is_empty());
        assert_eq!(tracked.unresolved(), &["missing".to_string()]);
    }

    #[test]
    fn cycles_terminate() {
        let schema = SchemaSnapshot::new(
            vec![
                collection("a", vec![relationship("to_b", "b")]),
                collection("b", vec![relationship("to_a", "a")]),
            ],
            Vec::new(),
        );

        let tracked = TrackedEntities::resolve(&slugs(&["a"]), &[], &schema);
        assert_eq!(
            tracked.collections(),
            &HashSet::from(["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn globals_seed_traversal_but_stay_out_of_the_collection_set() {
        let schema = SchemaSnapshot::new(
            vec![
                collection("posts", vec![relationship("author", "users")]),
                collection("users", Vec::new()),
            ],
            vec![GlobalSchema {
                slug: "footer".to_string(),
                fields: vec![relationship("highlight", "posts")],
            }],
        );

        let tracked = TrackedEntities::resolve(&[], &slugs(&["footer"]), &schema);

        assert!(tracked.is_tracked_global("footer"));
        assert!(!tracked.collections().contains("footer"));
        assert_eq!(
            tracked.collections(),
            &HashSet::from(["posts".to_string(), "users".to_string()])
        );
    }

    #[test]
    fn dangling_relation_target_is_skipped_with_warning() {
        let schema = SchemaSnapshot::new(
            vec![collection("posts", vec![relationship("author", "ghosts")])],
            Vec::new(),
        );

        let tracked = TrackedEntities::resolve(&slugs(&["posts"]), &[], &schema);

        assert!(tracked.is_tracked_collection("posts"));
        assert!(!tracked.is_tracked_collection("ghosts"));
        assert_eq!(tracked.unresolved(), &["ghosts".to_string()]);
    }
}
