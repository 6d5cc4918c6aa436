//! # capnote-extract
//!
//! Everything the pipeline does between "here is some text" and "here is a
//! titled excerpt":
//! - URL extraction from free text
//! - Internal/external link classification
//! - Page fetching with a bounded timeout
//! - Two content extraction strategies behind [`ContentExtractor`]:
//!   a structural HTML parse and a lightweight tag-strip fallback
//! - Title derivation
//!
//! # Example
//!
//! ```rust,no_run
//! use capnote_extract::{ContentExtractor, StructuralExtractor, PageFetcher};
//!
//! #[tokio::main]
//! async fn main() {
//!     let extractor = StructuralExtractor::new(PageFetcher::with_defaults().unwrap());
//!     if let Some(article) = extractor.extract("https://example.com/post").await {
//!         println!("{}: {} chars", article.title, article.content.chars().count());
//!     }
//! }
//! ```

pub mod fetch;
pub mod html;
pub mod links;
pub mod strip;
pub mod title;
pub mod urls;

// Re-export core types
pub use capnote_core::*;

pub use fetch::{FetchConfig, PageFetcher};
pub use html::{extract_article, StructuralExtractor, CONTENT_SELECTORS};
pub use links::is_internal_url;
pub use strip::{strip_tags, TagStripExtractor};
pub use title::{title_from_content, title_from_text};
pub use urls::extract_urls;
