//! Shared request and response types for the Rinfresco invalidation API.
//!
//! These types are the wire contract between the engine's HTTP surface and
//! admin-UI consumers. Field names are serialized in camelCase to match the
//! host CMS conventions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Response body for `GET /check-changes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckChangesResponse {
    /// True when at least one change record is pending in the publish queue.
    pub has_changes: bool,
}

/// Response body for `POST /publish-changes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishChangesResponse {
    pub success: bool,
    /// Entity type to the ids whose tags were invalidated by this flush.
    pub published: BTreeMap<String, Vec<String>>,
}

/// Invalidation notification payload delivered to external observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidationEventPayload {
    /// `"collection"` or `"global"`.
    #[serde(rename = "type")]
    pub entity_kind: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
}

/// Error body returned by the invalidation API on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_changes_uses_camel_case() {
        let body = CheckChangesResponse { has_changes: true };
        let json = serde_json::to_string(&body).expect("serialize");
        assert_eq!(json, r#"{"hasChanges":true}"#);
    }

    #[test]
    fn publish_response_round_trips() {
        let mut published = BTreeMap::new();
        published.insert("posts".to_string(), vec!["p1".to_string()]);
        let body = PublishChangesResponse {
            success: true,
            published,
        };

        let json = serde_json::to_string(&body).expect("serialize");
        let back: PublishChangesResponse = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, body);
    }

    #[test]
    fn event_payload_omits_absent_doc_id() {
        let payload = InvalidationEventPayload {
            entity_kind: "global".to_string(),
            slug: "footer".to_string(),
            doc_id: None,
        };
        let json = serde_json::to_string(&payload).expect("serialize");
        assert_eq!(json, r#"{"type":"global","slug":"footer"}"#);
    }
}
