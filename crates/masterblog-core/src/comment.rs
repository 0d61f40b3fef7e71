//! Comment domain types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};

/// A stored comment, always attached to one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Numeric identifier, assigned by storage.
    pub id: u64,
    /// Id of the post this comment belongs to.
    pub post_id: u64,
    /// Display name of the comment author.
    pub author: String,
    /// Comment body.
    pub text: String,
}

impl Comment {
    /// Build a comment from a validated draft and storage-assigned ids.
    #[must_use]
    pub fn new(id: u64, post_id: u64, draft: CommentDraft) -> Self {
        Self {
            id,
            post_id,
            author: draft.author,
            text: draft.text,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawComment {
    author: Option<String>,
    text: Option<String>,
}

/// Validated payload for creating a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentDraft {
    pub author: String,
    pub text: String,
}

impl CommentDraft {
    #[must_use]
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
        }
    }

    /// Parse a creation payload from raw JSON. Mirrors
    /// [`PostDraft::from_value`](crate::post::PostDraft::from_value): a `null`
    /// body reports every required field as missing, unknown keys are ignored.
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawComment = if value.is_null() {
            RawComment::default()
        } else {
            serde_json::from_value(value)
                .map_err(|e| CoreError::invalid_payload("comment", e.to_string()))?
        };

        let mut missing = Vec::new();
        if raw.author.is_none() {
            missing.push("author");
        }
        if raw.text.is_none() {
            missing.push("text");
        }

        match (raw.author, raw.text) {
            (Some(author), Some(text)) => Ok(Self { author, text }),
            _ => Err(CoreError::missing_fields(missing)),
        }
    }
}
