//! Data model for the capture pipeline.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::defaults::{TITLE_ELLIPSIS, TITLE_MAX_CHARS};

// =============================================================================
// INBOUND
// =============================================================================

/// Per-platform message segments, passed through untouched to storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageChain(pub serde_json::Value);

impl MessageChain {
    /// True for `null`, `[]`, `{}` and the empty string.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            serde_json::Value::Null => true,
            serde_json::Value::Array(items) => items.is_empty(),
            serde_json::Value::Object(map) => map.is_empty(),
            serde_json::Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Text form stored in the `messages.message_chain` column.
    ///
    /// An empty chain is stored as the empty string.
    pub fn to_storage_text(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            self.0.to_string()
        }
    }
}

/// A chat message as delivered by the bot host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub sender_id: String,
    pub sender_name: String,
    /// Plain-text rendering of the message.
    pub text: String,
    #[serde(default)]
    pub chain: MessageChain,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub platform: String,
    /// Set by the host when the sender is the bot administrator.
    #[serde(default)]
    pub is_admin: bool,
}

// =============================================================================
// EXTRACTION
// =============================================================================

/// Readable content pulled out of a fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedArticle {
    pub title: String,
    pub content: String,
    pub url: String,
}

// =============================================================================
// NOTES
// =============================================================================

/// Cut `title` to [`TITLE_MAX_CHARS`] characters, appending an ellipsis when
/// anything was removed.
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() > TITLE_MAX_CHARS {
        let head: String = title.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}{}", head, TITLE_ELLIPSIS)
    } else {
        title.to_string()
    }
}

/// Sender details attached to notes sent to the REST service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteMetadata {
    pub original_sender: Option<String>,
    pub timestamp: Option<i64>,
}

/// A composed note, ready for a single submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    title: String,
    body: String,
    tags: BTreeSet<String>,
    source_url: Option<String>,
    metadata: Option<NoteMetadata>,
}

impl NoteDraft {
    /// Create a draft. The title is truncated to the visible-length limit.
    pub fn new(title: impl AsRef<str>, body: impl Into<String>) -> Self {
        Self {
            title: truncate_title(title.as_ref()),
            body: body.into(),
            tags: BTreeSet::new(),
            source_url: None,
            metadata: None,
        }
    }

    /// Add tags. Names are trimmed and lowercased; blanks and duplicates collapse.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags.extend(
            tags.into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty()),
        );
        self
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn with_metadata(mut self, metadata: NoteMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(&tag.to_lowercase())
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    pub fn metadata(&self) -> Option<&NoteMetadata> {
        self.metadata.as_ref()
    }
}

/// A tag as known to the remote note service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    #[serde(rename = "title")]
    pub name: String,
}

/// Result of a successful note submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishedNote {
    /// Remote id, when the service returns one.
    pub id: Option<String>,
    pub linked_tags: Vec<String>,
    pub failed_tags: Vec<String>,
}

// =============================================================================
// LOCAL AUDIT
// =============================================================================

/// Audit row for a note that reached the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub title: String,
    pub content: String,
    pub url: Option<String>,
    pub message_id: Option<i64>,
}

/// A plain-text capture kept in the local memo table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoRecord {
    pub sender_id: String,
    pub sender_name: String,
    pub content: String,
    pub timestamp: i64,
}

impl From<&IncomingMessage> for MemoRecord {
    fn from(message: &IncomingMessage) -> Self {
        Self {
            sender_id: message.sender_id.clone(),
            sender_name: message.sender_name.clone(),
            content: message.text.clone(),
            timestamp: message.timestamp,
        }
    }
}
