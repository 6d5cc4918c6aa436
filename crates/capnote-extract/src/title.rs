//! Title derivation.
//!
//! Titles are single lines of at most 50 visible characters, with `...`
//! appended when cut.

use url::Url;

use capnote_core::defaults::{LINK_CONTENT_TITLE, TITLE_SCAN_LINES, UNTITLED_NOTE};
use capnote_core::truncate_title;

/// Title for a note made from plain text: its first non-empty line.
pub fn title_from_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(truncate_title)
        .unwrap_or_else(|| UNTITLED_NOTE.to_string())
}

/// Title for a note made from page content.
///
/// Uses the first non-empty line among the first three; otherwise names the
/// URL's host.
pub fn title_from_content(content: &str, url: &str) -> String {
    content
        .trim()
        .lines()
        .take(TITLE_SCAN_LINES)
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(truncate_title)
        .unwrap_or_else(|| host_title(url))
}

fn host_title(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return LINK_CONTENT_TITLE.to_string();
    };
    match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("content from {}:{}", host, port),
        (Some(host), None) => format!("content from {}", host),
        (None, _) => LINK_CONTENT_TITLE.to_string(),
    }
}
