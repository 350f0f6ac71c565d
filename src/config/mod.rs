//! Engine settings supplied by the host at plugin initialization.

use std::collections::BTreeMap;

use serde::Deserialize;

const DEFAULT_QUEUE_PAGE_SIZE: u32 = 100;

/// Which collections to track: either a plain list of slugs or a slug→bool
/// map (hosts generate the map form when toggling tracking per collection).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CollectionSelector {
    List(Vec<String>),
    Flags(BTreeMap<String, bool>),
}

impl Default for CollectionSelector {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl CollectionSelector {
    /// The selected slugs, in declaration order for the list form and
    /// lexicographic order for the map form.
    pub fn slugs(&self) -> Vec<String> {
        match self {
            Self::List(slugs) => slugs.clone(),
            Self::Flags(flags) => flags
                .iter()
                .filter(|(_, enabled)| **enabled)
                .map(|(slug, _)| slug.clone())
                .collect(),
        }
    }
}

/// Invalidation engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InvalidationSettings {
    /// Root collections to track changes for.
    pub collections: CollectionSelector,
    /// Root globals to track changes for.
    pub globals: Vec<String>,
    /// Invalidate tags immediately on save (draft-aware policy).
    pub invalidate_on_save: bool,
    /// Record changes in the publish queue for deferred flushing.
    pub track_changes: bool,
    /// Page size used when hydrating the ledger from the queue.
    pub queue_page_size: u32,
}

impl Default for InvalidationSettings {
    fn default() -> Self {
        Self {
            collections: CollectionSelector::default(),
            globals: Vec::new(),
            invalidate_on_save: true,
            track_changes: true,
            queue_page_size: DEFAULT_QUEUE_PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let settings = InvalidationSettings::default();
        assert!(settings.invalidate_on_save);
        assert!(settings.track_changes);
        assert_eq!(settings.queue_page_size, 100);
        assert!(settings.collections.slugs().is_empty());
        assert!(settings.globals.is_empty());
    }

    #[test]
    fn deserializes_list_selector() {
        let settings: InvalidationSettings = serde_json::from_str(
            r#"{"collections": ["posts", "pages"], "globals": ["footer"]}"#,
        )
        .expect("deserialize");

        assert_eq!(
            settings.collections.slugs(),
            vec!["posts".to_string(), "pages".to_string()]
        );
        assert_eq!(settings.globals, vec!["footer".to_string()]);
    }

    #[test]
    fn deserializes_flag_map_selector() {
        let settings: InvalidationSettings = serde_json::from_str(
            r#"{"collections": {"posts": true, "drafts-bin": false, "pages": true}}"#,
        )
        .expect("deserialize");

        assert_eq!(
            settings.collections.slugs(),
            vec!["pages".to_string(), "posts".to_string()]
        );
    }

    #[test]
    fn partial_settings_fill_defaults() {
        let settings: InvalidationSettings =
            serde_json::from_str(r#"{"invalidate_on_save": false}"#).expect("deserialize");

        assert!(!settings.invalidate_on_save);
        assert!(settings.track_changes);
        assert_eq!(settings.queue_page_size, 100);
    }
}
