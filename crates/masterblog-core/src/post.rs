//! Blog post domain types.
//!
//! A [`Post`] is the stored entity. Incoming JSON bodies are parsed into a
//! [`PostDraft`] (creation, all required fields present) or a [`PostPatch`]
//! (update, every field optional) before they reach storage.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};

/// A stored blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Numeric identifier, assigned by storage.
    pub id: u64,
    /// Post title.
    pub title: String,
    /// Post body text.
    pub content: String,
    /// Optional category labels.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Optional free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Post {
    /// Build a post from a validated draft and a storage-assigned id.
    #[must_use]
    pub fn new(id: u64, draft: PostDraft) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            categories: draft.categories,
            tags: draft.tags,
        }
    }

    /// Merge a patch into this post. Fields absent from the patch keep
    /// their current value; the id never changes.
    pub fn apply_patch(&mut self, patch: PostPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(categories) = patch.categories {
            self.categories = categories;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
    }
}

/// Intermediate shape for payload parsing. Every field optional so missing
/// ones can be reported together instead of failing on the first.
#[derive(Debug, Default, Deserialize)]
struct RawPost {
    title: Option<String>,
    content: Option<String>,
    categories: Option<Vec<String>>,
    tags: Option<Vec<String>>,
}

/// Validated payload for creating a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PostDraft {
    /// Create a draft with the required fields only.
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            categories: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Set category labels
    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Set free-form tags
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a creation payload from raw JSON.
    ///
    /// A `null` body is treated like an empty object, so it reports every
    /// required field as missing rather than failing to deserialize. Unknown
    /// keys (including a client-supplied `id`) are ignored.
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawPost = if value.is_null() {
            RawPost::default()
        } else {
            serde_json::from_value(value)
                .map_err(|e| CoreError::invalid_payload("post", e.to_string()))?
        };

        let mut missing = Vec::new();
        if raw.title.is_none() {
            missing.push("title");
        }
        if raw.content.is_none() {
            missing.push("content");
        }

        match (raw.title, raw.content) {
            (Some(title), Some(content)) => Ok(Self {
                title,
                content,
                categories: raw.categories.unwrap_or_default(),
                tags: raw.tags.unwrap_or_default(),
            }),
            _ => Err(CoreError::missing_fields(missing)),
        }
    }
}

/// Validated payload for updating a post. Every field is optional; an empty
/// patch is a no-op update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl PostPatch {
    /// Parse an update payload from raw JSON. A `null` body is an empty patch.
    pub fn from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        let raw: RawPost = serde_json::from_value(value)
            .map_err(|e| CoreError::invalid_payload("post", e.to_string()))?;
        Ok(Self {
            title: raw.title,
            content: raw.content,
            categories: raw.categories,
            tags: raw.tags,
        })
    }

    /// Check whether the patch changes anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.categories.is_none()
            && self.tags.is_none()
    }
}
