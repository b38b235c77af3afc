//! Content library objects: reusable storytelling blocks tied to a country or city.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use vacance_core::library::{ContentType, LibraryCandidate};
use vacance_core::{ContentObjectId, DocumentId, PublishStatus};

/// A stored content library object.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentObject {
    pub id: ContentObjectId,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub type_name: String,
    pub target_id: DocumentId,
    /// Display name of the target, captured at save time.
    pub target_name: String,
    pub title: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    /// Type-specific fields (see [`ContentType::extra_fields`]).
    pub fields: Map<String, Value>,
    pub keywords: Vec<String>,
    pub status: PublishStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentObject {
    /// The linker's view of this object.
    #[must_use]
    pub fn candidate(&self) -> LibraryCandidate {
        LibraryCandidate {
            id: self.id.clone(),
            title: self.title.clone(),
            tagline: self.tagline.clone(),
        }
    }
}

/// Create/edit form payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContentObjectInput {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub target_id: DocumentId,
    pub title: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub status: PublishStatus,
}

/// Why a content object payload was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentValidationError {
    #[error("title is required")]
    MissingTitle,
    #[error("targetId is required")]
    MissingTarget,
    #[error("fields not allowed for {content_type}: {keys}")]
    UnknownFields { content_type: ContentType, keys: String },
}

impl ContentObjectInput {
    /// Trim text, drop blank optionals, de-duplicate keywords and check the
    /// type-specific field keys.
    ///
    /// # Errors
    ///
    /// Returns the first [`ContentValidationError`] found.
    pub fn normalize(mut self) -> Result<Self, ContentValidationError> {
        self.title = self.title.trim().to_owned();
        if self.title.is_empty() {
            return Err(ContentValidationError::MissingTitle);
        }
        if self.target_id.as_str().trim().is_empty() {
            return Err(ContentValidationError::MissingTarget);
        }

        let allowed = self.content_type.extra_fields();
        let unknown: Vec<&str> = self
            .fields
            .keys()
            .map(String::as_str)
            .filter(|key| !allowed.contains(key))
            .collect();
        if !unknown.is_empty() {
            return Err(ContentValidationError::UnknownFields {
                content_type: self.content_type,
                keys: unknown.join(", "),
            });
        }

        self.tagline = non_blank(self.tagline);
        self.description = non_blank(self.description);
        self.keywords = dedup_keywords(self.keywords);
        Ok(self)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Trim and de-duplicate keywords, keeping first-seen order.
#[must_use]
pub fn dedup_keywords(keywords: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let keyword = keyword.trim();
        if !keyword.is_empty() && !out.iter().any(|k| k == keyword) {
            out.push(keyword.to_owned());
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: Value) -> ContentObjectInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_trims_and_dedups() {
        let normalized = input(json!({
            "type": "country-story",
            "targetId": "FR",
            "title": "  The French Way  ",
            "tagline": "   ",
            "keywords": ["wine", " cheese", "wine", ""],
            "fields": {"culturalFeatures": "Café culture"}
        }))
        .normalize()
        .unwrap();

        assert_eq!(normalized.title, "The French Way");
        assert_eq!(normalized.tagline, None);
        assert_eq!(normalized.keywords, vec!["wine", "cheese"]);
    }

    #[test]
    fn test_fields_of_other_type_rejected() {
        let err = input(json!({
            "type": "city-story",
            "targetId": "paris",
            "title": "Paris",
            "fields": {"exchangeFee": "2%"}
        }))
        .normalize()
        .unwrap_err();
        assert!(matches!(err, ContentValidationError::UnknownFields { .. }));
    }

    #[test]
    fn test_blank_title_rejected() {
        let err = input(json!({"type": "city-story", "targetId": "paris", "title": " "}))
            .normalize()
            .unwrap_err();
        assert_eq!(err, ContentValidationError::MissingTitle);
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        let result = serde_json::from_value::<ContentObjectInput>(json!({
            "type": "city-story",
            "targetId": "paris",
            "title": "Paris",
            "targetName": "spoofed"
        }));
        assert!(result.is_err());
    }
}
