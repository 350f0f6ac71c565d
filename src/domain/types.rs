//! Shared domain enumerations.

use serde::{Deserialize, Serialize};

/// Draft/published status carried by documents of drafts-enabled
/// collections in their `_status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocStatus {
    Draft,
    Published,
}

impl DocStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    /// Read the status out of a host document. Absent or unrecognized
    /// values read as `None`; drafts-disabled collections never carry one.
    pub fn from_document(doc: &serde_json::Value) -> Option<Self> {
        match doc.get("_status").and_then(serde_json::Value::as_str) {
            Some("draft") => Some(Self::Draft),
            Some("published") => Some(Self::Published),
            _ => None,
        }
    }
}
