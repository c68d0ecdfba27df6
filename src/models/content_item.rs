//! Content item document model.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use ulid::Ulid;

/// A persisted content item version.
///
/// The payload is an opaque JSON tree keyed by part name, e.g.
/// `{"TitlePart": {"Title": "..."}, "BodyPart": {"Body": "..."}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContentItem {
    /// Store-assigned identifier, strictly increasing in creation order.
    /// Zero until the item is first committed.
    #[serde(default)]
    pub document_id: u64,
    /// Logical identifier shared by all versions of the item.
    pub content_item_id: String,
    /// Identifier of this specific revision.
    pub content_item_version_id: String,
    /// Name of the content type definition.
    pub content_type: String,
    /// Part data keyed by part name.
    #[serde(default)]
    pub content: JsonValue,
}

impl ContentItem {
    /// Creates a new, not yet persisted content item with generated ids.
    pub fn new(content_type: impl Into<String>, content: JsonValue) -> Self {
        Self {
            document_id: 0,
            content_item_id: generate_ulid(),
            content_item_version_id: generate_ulid(),
            content_type: content_type.into(),
            content,
        }
    }

    /// Returns true if the store has not assigned a document id yet.
    pub fn is_new(&self) -> bool {
        self.document_id == 0
    }
}

/// Generate a new ULID string.
pub fn generate_ulid() -> String {
    Ulid::new().to_string()
}
