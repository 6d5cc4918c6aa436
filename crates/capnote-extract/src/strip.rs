//! Lightweight tag-stripping extraction.
//!
//! No DOM: regexes remove script/style blocks, comments and tags, then
//! whitespace runs collapse to single spaces. Lower fidelity than
//! [`crate::html`], with no structure preserved.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use capnote_core::defaults::{TAG_STRIP_CONTENT_LIMIT, UNTITLED_ARTICLE};
use capnote_core::{ContentExtractor, ExtractedArticle};

use crate::fetch::PageFetcher;
use crate::html::truncate_chars;

static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("script pattern is valid"));
static STYLE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("style pattern is valid"));
static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern is valid"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title pattern is valid"));

/// Extractor that fetches a page and strips it to flat text.
pub struct TagStripExtractor {
    fetcher: PageFetcher,
}

impl TagStripExtractor {
    pub fn new(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ContentExtractor for TagStripExtractor {
    async fn extract(&self, url: &str) -> Option<ExtractedArticle> {
        let html = self.fetcher.fetch_html(url).await?;
        let Some(content) = strip_tags(&html) else {
            debug!(
                subsystem = "extract",
                component = "tag_strip",
                url,
                "Page had no text after stripping"
            );
            return None;
        };
        Some(ExtractedArticle {
            title: strip_title(&html),
            content,
            url: url.to_string(),
        })
    }

    fn name(&self) -> &str {
        "tag_strip"
    }
}

/// Strip `html` down to at most 2000 characters of single-spaced text.
///
/// Returns `None` when nothing but markup remains.
///
/// ```
/// use capnote_extract::strip_tags;
///
/// let text = strip_tags("<p>Hello <b>there</b></p><script>x()</script>");
/// assert_eq!(text.as_deref(), Some("Hello there"));
/// ```
pub fn strip_tags(html: &str) -> Option<String> {
    let text = SCRIPT_BLOCK.replace_all(html, "");
    let text = STYLE_BLOCK.replace_all(&text, "");
    let text = COMMENT.replace_all(&text, "");
    let text = TAG.replace_all(&text, "");
    let text = WHITESPACE.replace_all(&text, " ");
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(truncate_chars(text, TAG_STRIP_CONTENT_LIMIT))
    }
}

fn strip_title(html: &str) -> String {
    TITLE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| WHITESPACE.replace_all(m.as_str(), " ").trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED_ARTICLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_removes_blocks_comments_and_tags() {
        let html = "<html><head><title>T</title>\n<STYLE type=\"text/css\">b{}</STYLE></head>\n\
                    <body><!-- hidden\n comment --><script>\nbad()\n</script>\
                    <p>Hello</p>\n\n\t<p>World</p></body></html>";
        assert_eq!(strip_tags(html).as_deref(), Some("T Hello World"));
    }

    #[test]
    fn test_strip_only_markup_is_none() {
        assert!(strip_tags("<div><span></span></div>").is_none());
        assert!(strip_tags("").is_none());
    }

    #[test]
    fn test_strip_capped_at_2000_chars() {
        let html = format!("<p>{}</p>", "a".repeat(3000));
        assert_eq!(strip_tags(&html).unwrap().chars().count(), 2000);
    }

    #[test]
    fn test_strip_title() {
        assert_eq!(strip_title("<title>\n  My  Page </title>"), "My Page");
        assert_eq!(strip_title("<p>no title</p>"), "untitled");
    }
}
