//! Capability traits for the capture pipeline.
//!
//! These traits are the seams between the orchestrator and its
//! collaborators, enabling pluggable strategies and testability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// CONTENT EXTRACTION
// =============================================================================

/// Fetches a page and reduces it to readable text.
///
/// Implementations never fail: any network, status or parse problem yields
/// `None`, which callers treat as "content unavailable".
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Option<ExtractedArticle>;

    /// Strategy name, for logs.
    fn name(&self) -> &str;
}

// =============================================================================
// NOTE PERSISTENCE
// =============================================================================

/// External note service that accepts composed drafts.
#[async_trait]
pub trait NoteSink: Send + Sync {
    /// Submit a draft once. Tag problems are reported in the returned
    /// [`PublishedNote`], not as an error.
    async fn publish(&self, draft: &NoteDraft) -> Result<PublishedNote>;

    /// Backend name, for logs.
    fn name(&self) -> &str;
}

// =============================================================================
// LOCAL LOG
// =============================================================================

/// Append-only local audit store.
#[async_trait]
pub trait MessageLog: Send + Sync {
    /// Record a raw incoming message. Returns the new row id.
    async fn save_message(&self, message: &IncomingMessage) -> Result<i64>;

    /// Record a plain-text capture. Returns the new row id.
    async fn save_memo(&self, memo: &MemoRecord) -> Result<i64>;

    /// Record a note that reached the remote service. Returns the new row id.
    async fn save_note_record(&self, record: &NoteRecord) -> Result<i64>;

    /// Release the underlying storage. Later writes fail.
    async fn close(&self) {}
}

// =============================================================================
// TEXT ORGANIZATION
// =============================================================================

/// Rewrites captured plain text before it becomes a note body.
///
/// This is the hook for an AI organizer; the shipped implementation is
/// [`LineTidy`].
#[async_trait]
pub trait TextOrganizer: Send + Sync {
    async fn organize(&self, text: &str) -> String;
}

/// Trim each line, drop blank lines, join with `\n`.
pub fn normalize_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Formatting-only organizer.
///
/// Input that normalizes to nothing is returned unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineTidy;

#[async_trait]
impl TextOrganizer for LineTidy {
    async fn organize(&self, text: &str) -> String {
        let tidy = normalize_lines(text);
        if tidy.is_empty() {
            text.to_string()
        } else {
            tidy
        }
    }
}
