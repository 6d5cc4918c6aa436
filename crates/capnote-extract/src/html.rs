//! Structural HTML content extraction.
//!
//! Parses the page into a DOM, ignores `<script>` and `<style>` subtrees and
//! reads text from the first semantic content container that exists.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

use capnote_core::defaults::{STRUCTURAL_CONTENT_LIMIT, UNTITLED_ARTICLE};
use capnote_core::{normalize_lines, ContentExtractor, ExtractedArticle};

use crate::fetch::PageFetcher;

/// Content containers, in priority order.
pub const CONTENT_SELECTORS: &[&str] = &[
    "article",
    ".content",
    ".article-content",
    ".post-content",
    ".entry-content",
    "main",
    ".main-content",
];

/// Elements whose text never reaches the output.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style"];

/// Extractor that fetches a page and parses it structurally.
pub struct StructuralExtractor {
    fetcher: PageFetcher,
}

impl StructuralExtractor {
    pub fn new(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ContentExtractor for StructuralExtractor {
    async fn extract(&self, url: &str) -> Option<ExtractedArticle> {
        let html = self.fetcher.fetch_html(url).await?;
        let article = extract_article(&html, url);
        debug!(
            subsystem = "extract",
            component = "structural",
            url,
            content_len = article.content.chars().count(),
            "Article extracted"
        );
        Some(article)
    }

    fn name(&self) -> &str {
        "structural"
    }
}

/// Reduce an HTML document to a titled, normalized, length-capped excerpt.
///
/// ```
/// use capnote_extract::extract_article;
///
/// let article = extract_article(
///     "<title>T</title><main><p>one</p>\n\n<p>two</p></main>",
///     "https://example.com",
/// );
/// assert_eq!(article.title, "T");
/// assert_eq!(article.content, "one\ntwo");
/// ```
pub fn extract_article(html: &str, url: &str) -> ExtractedArticle {
    let document = Html::parse_document(html);

    let title = first_match(&document, "title")
        .map(|el| element_text(el).trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED_ARTICLE.to_string());

    let mut raw = CONTENT_SELECTORS
        .iter()
        .find_map(|selector| first_match(&document, selector))
        .map(|el| element_text(el).trim().to_string())
        .unwrap_or_default();

    if raw.is_empty() {
        raw = first_match(&document, "body")
            .map(|el| element_text(el).trim().to_string())
            .unwrap_or_default();
    }

    ExtractedArticle {
        title,
        content: truncate_chars(&normalize_lines(&raw), STRUCTURAL_CONTENT_LIMIT),
        url: url.to_string(),
    }
}

/// Keep at most `limit` characters.
pub(crate) fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// First element matching `selector` that is not itself a skipped element.
fn first_match<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .find(|el| !SKIPPED_ELEMENTS.contains(&el.value().name()))
}

fn element_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    collect_text(element, &mut out);
    out
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if SKIPPED_ELEMENTS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
            }
            _ => {}
        }
    }
}
