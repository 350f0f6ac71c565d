//! Entity dependency graph.
//!
//! Built once from the full schema snapshot at startup and read-only
//! afterwards, so it is shared across hooks behind an `Arc` without
//! locking. Forward edges go from an entity to the entities it references;
//! the reverse index (dependants) is computed by inversion at build time.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::domain::fields::Field;
use crate::domain::reference::EntityRef;
use crate::domain::schema::SchemaSnapshot;

use super::relations::collect_relations;

/// Directed dependency graph over schema entities.
///
/// Edges store raw extractor output; cycle safety is the traversal
/// consumers' responsibility.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Entity to the entities it references (outgoing edges).
    dependencies: HashMap<EntityRef, HashSet<EntityRef>>,
    /// Entity to the entities that reference it (derived).
    dependants: HashMap<EntityRef, HashSet<EntityRef>>,
}

impl DependencyGraph {
    /// Build the graph by running the relation extractor over every
    /// collection and global. Edge sets are deduplicated target sets.
    pub fn build(schema: &SchemaSnapshot) -> Self {
        let mut dependencies: HashMap<EntityRef, HashSet<EntityRef>> = HashMap::new();

        for collection in &schema.collections {
            let source = EntityRef::collection(&collection.slug);
            let targets = relation_targets(&collection.fields);
            dependencies.entry(source).or_default().extend(targets);
        }

        for global in &schema.globals {
            let source = EntityRef::global(&global.slug);
            let targets = relation_targets(&global.fields);
            dependencies.entry(source).or_default().extend(targets);
        }

        let mut dependants: HashMap<EntityRef, HashSet<EntityRef>> = HashMap::new();
        for (source, targets) in &dependencies {
            for target in targets {
                dependants
                    .entry(target.clone())
                    .or_default()
                    .insert(source.clone());
            }
        }

        let graph = Self {
            dependencies,
            dependants,
        };
        debug!(
            entities = graph.entity_count(),
            edges = graph.edge_count(),
            "dependency graph built"
        );
        graph
    }

    /// Entities the given entity references.
    pub fn dependencies_of(&self, entity: &EntityRef) -> HashSet<EntityRef> {
        self.dependencies.get(entity).cloned().unwrap_or_default()
    }

    /// Entities whose outgoing edges contain the given entity: what must
    /// also be invalidated when its underlying data changes.
    pub fn dependants_of(&self, entity: &EntityRef) -> HashSet<EntityRef> {
        self.dependants.get(entity).cloned().unwrap_or_default()
    }

    /// Transitive dependants of the given entity, origin excluded.
    ///
    /// Breadth-first over the reverse index; the visited set guards
    /// re-traversal so cycles terminate.
    pub fn dependants_closure(&self, entity: &EntityRef) -> HashSet<EntityRef> {
        let mut visited: HashSet<EntityRef> = HashSet::new();
        visited.insert(entity.clone());

        let mut queue: VecDeque<EntityRef> = self.dependants_of(entity).into_iter().collect();
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            for dependant in self.dependants_of(&current) {
                if !visited.contains(&dependant) {
                    queue.push_back(dependant);
                }
            }
        }

        visited.remove(entity);
        visited
    }

    /// Transitive dependants of whichever entities carry the given slug.
    ///
    /// Persisted change records store bare slugs; a slug may name a
    /// collection, a global, or (pathologically) both.
    pub fn dependants_closure_for_slug(&self, slug: &str) -> HashSet<EntityRef> {
        let mut affected = HashSet::new();
        for candidate in [EntityRef::collection(slug), EntityRef::global(slug)] {
            if self.dependencies.contains_key(&candidate) || self.dependants.contains_key(&candidate)
            {
                affected.extend(self.dependants_closure(&candidate));
            }
        }
        affected
    }

    /// Number of entities with at least one edge endpoint.
    pub fn entity_count(&self) -> usize {
        self.dependencies.len()
    }

    pub fn edge_count(&self) -> usize {
        self.dependencies.values().map(HashSet::len).sum()
    }
}

fn relation_targets(fields: &[Field]) -> HashSet<EntityRef> {
    collect_relations(fields)
        .into_iter()
        .map(|relation| EntityRef::collection(relation.collection))
        .collect()
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

    fn sample_schema() -> SchemaSnapshot {
        SchemaSnapshot::new(
            vec![
                collection("posts", vec![relationship("author", "users")]),
                collection("pages", vec![relationship("editor", "users")]),
                collection("users", Vec::new()),
            ],
            vec![GlobalSchema {
                slug: "footer".to_string(),
                fields: vec![relationship("highlight", "posts")],
            }],
        )
    }

    #[test]
    fn forward_edges_follow_extracted_relations() {
        let graph = DependencyGraph::build(&sample_schema());

        let deps = graph.dependencies_of(&EntityRef::collection("posts"));
        assert_eq!(deps, HashSet::from([EntityRef::collection("users")]));

        let global_deps = graph.dependencies_of(&EntityRef::global("footer"));
        assert_eq!(global_deps, HashSet::from([EntityRef::collection("posts")]));
    }

    #[test]
    fn dependants_are_the_inverted_edges() {
        let graph = DependencyGraph::build(&sample_schema());

        let dependants = graph.dependants_of(&EntityRef::collection("users"));
        assert_eq!(
            dependants,
            HashSet::from([
                EntityRef::collection("posts"),
                EntityRef::collection("pages"),
            ])
        );
    }

    #[test]
    fn closure_is_transitive_and_excludes_origin() {
        // users <- posts <- footer(global)
        let graph = DependencyGraph::build(&sample_schema());

        let closure = graph.dependants_closure(&EntityRef::collection("users"));
        assert!(closure.contains(&EntityRef::collection("posts")));
        assert!(closure.contains(&EntityRef::collection("pages")));
        assert!(closure.contains(&EntityRef::global("footer")));
        assert!(!closure.contains(&EntityRef::collection("users")));
    }

    #[test]
    fn closure_terminates_on_cycles() {
        let schema = SchemaSnapshot::new(
            vec![
                collection("a", vec![relationship("to_b", "b")]),
                collection("b", vec![relationship("to_a", "a")]),
            ],
            Vec::new(),
        );
        let graph = DependencyGraph::build(&schema);

        let closure = graph.dependants_closure(&EntityRef::collection("a"));
        assert_eq!(closure, HashSet::from([EntityRef::collection("b")]));
    }

    #[test]
    fn duplicate_relation_targets_deduplicate() {
        let schema = SchemaSnapshot::new(
            vec![collection(
                "posts",
                vec![
                    relationship("author", "users"),
                    relationship("reviewer", "users"),
                ],
            )],
            Vec::new(),
        );
        let graph = DependencyGraph::build(&schema);

        assert_eq!(
            graph.dependencies_of(&EntityRef::collection("posts")),
            HashSet::from([EntityRef::collection("users")])
        );
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn slug_lookup_covers_both_kinds() {
        let graph = DependencyGraph::build(&sample_schema());

        let affected = graph.dependants_closure_for_slug("users");
        assert!(affected.contains(&EntityRef::collection("posts")));

        let none = graph.dependants_closure_for_slug("unknown");
        assert!(none.is_empty());
    }
}
