//! Note composition.
//!
//! Pure functions from message text (plus extracted content) to a
//! [`NoteDraft`]. Tags follow a fixed policy per branch.

use serde::{Deserialize, Serialize};

use capnote_core::defaults::{TAG_ARTICLE, TAG_LINK, TAG_MEMO, TAG_SOURCE};
use capnote_core::{ExtractedArticle, IncomingMessage, NoteDraft, NoteMetadata};
use capnote_extract::{title_from_content, title_from_text};

/// How link captures are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteStyle {
    /// Message text plus page excerpt; a marker replaces missing content.
    /// Plain text becomes a memo note.
    #[default]
    Link,
    /// The extracted article itself; nothing is written when extraction
    /// fails. Plain text is kept as a local memo only.
    Article,
}

/// Draft for a URL on the local network. The page is never fetched.
pub fn compose_internal(message: &str, url: &str) -> NoteDraft {
    let body = format!("Internal link message:\n\n{}\n\nLink: {}", message, url);
    NoteDraft::new(title_from_text(message), body)
        .with_tags([TAG_SOURCE, TAG_LINK])
        .with_source_url(url)
}

/// Link-style draft for an external URL.
///
/// The title comes from the page content, or the host when there is none.
/// Blank content gets the same marker as a failed extraction.
pub fn compose_external(message: &str, url: &str, article: Option<&ExtractedArticle>) -> NoteDraft {
    let mut body = format!("Message:\n{}\n\nSource: {}\n\n", message, url);
    let title = match article.filter(|a| !a.content.trim().is_empty()) {
        Some(article) => {
            body.push_str("\n--- Page content ---\n");
            body.push_str(&article.content);
            title_from_content(&article.content, url)
        }
        None => {
            body.push_str("\n--- Page content unavailable ---");
            title_from_content("", url)
        }
    };

    NoteDraft::new(title, body)
        .with_tags([TAG_SOURCE, TAG_LINK])
        .with_source_url(url)
}

/// Article-style draft: the page's own title and content.
pub fn compose_article(article: &ExtractedArticle) -> NoteDraft {
    NoteDraft::new(&article.title, article.content.clone())
        .with_tags([TAG_SOURCE, TAG_ARTICLE])
        .with_source_url(article.url.clone())
}

/// Memo draft from already-organized text.
pub fn compose_text(body: &str) -> NoteDraft {
    NoteDraft::new(title_from_text(body), body.to_string()).with_tags([TAG_SOURCE, TAG_MEMO])
}

/// Sender details for the note payload.
pub fn sender_metadata(message: &IncomingMessage) -> NoteMetadata {
    NoteMetadata {
        original_sender: Some(message.sender_name.clone()).filter(|name| !name.is_empty()),
        timestamp: Some(message.timestamp),
    }
}
