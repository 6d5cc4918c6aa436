//! Centralized default constants for capnote.
//!
//! All crates reference these constants instead of defining their own magic
//! numbers. Organized by pipeline stage.

// =============================================================================
// PAGE FETCH
// =============================================================================

/// Timeout for a single page fetch.
pub const FETCH_TIMEOUT_SECS: u64 = 10;

/// User-Agent sent with page fetches.
pub const FETCH_USER_AGENT: &str = concat!("capnote/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// EXTRACTION
// =============================================================================

/// Character cap for content produced by the structural extractor.
pub const STRUCTURAL_CONTENT_LIMIT: usize = 5000;

/// Character cap for content produced by the tag-strip extractor.
pub const TAG_STRIP_CONTENT_LIMIT: usize = 2000;

/// Title used when a page has no `<title>`.
pub const UNTITLED_ARTICLE: &str = "untitled";

// =============================================================================
// TITLES
// =============================================================================

/// Maximum visible characters in a note title before the ellipsis.
pub const TITLE_MAX_CHARS: usize = 50;

/// Marker appended to truncated titles.
pub const TITLE_ELLIPSIS: &str = "...";

/// Title for a note whose source text is empty.
pub const UNTITLED_NOTE: &str = "untitled note";

/// Title for link content when no host can be parsed.
pub const LINK_CONTENT_TITLE: &str = "link content";

/// Number of leading lines scanned for a content-derived title.
pub const TITLE_SCAN_LINES: usize = 3;

// =============================================================================
// TAGS
// =============================================================================

/// Tag applied to every captured note.
pub const TAG_SOURCE: &str = "wechat";

/// Tag for notes created from URL-bearing messages.
pub const TAG_LINK: &str = "link";

/// Tag for notes created from plain-text messages.
pub const TAG_MEMO: &str = "memo";

/// Tag for article notes sent to the generic REST service.
pub const TAG_ARTICLE: &str = "article";

// =============================================================================
// NOTE SERVICES
// =============================================================================

/// Default base URL of the Joplin-style local note API.
pub const JOPLIN_URL: &str = "http://localhost:41184";

/// Default endpoint of the generic REST note API.
pub const REST_NOTE_URL: &str = "https://api.example.com/notes";

/// Timeout for note service calls.
pub const NOTE_TIMEOUT_SECS: u64 = 15;

/// `metadata.source` value sent to the REST note API.
pub const REST_SOURCE: &str = "wechat_helper";

// =============================================================================
// STORAGE
// =============================================================================

/// Default SQLite database for the message log.
pub const DATABASE_URL: &str = "sqlite://capnote.db?mode=rwc";

// =============================================================================
// ENVIRONMENT VARIABLE NAMES
// =============================================================================

pub const ENV_CONFIG: &str = "CAPNOTE_CONFIG";
pub const ENV_SCOPE: &str = "CAPNOTE_SCOPE";
pub const ENV_EXTRACTOR: &str = "CAPNOTE_EXTRACTOR";
pub const ENV_BACKEND: &str = "CAPNOTE_BACKEND";
pub const ENV_JOPLIN_URL: &str = "CAPNOTE_JOPLIN_URL";
pub const ENV_JOPLIN_TOKEN: &str = "CAPNOTE_JOPLIN_TOKEN";
pub const ENV_REST_URL: &str = "CAPNOTE_REST_URL";
pub const ENV_REST_TOKEN: &str = "CAPNOTE_REST_TOKEN";
pub const ENV_NOTE_TIMEOUT: &str = "CAPNOTE_NOTE_TIMEOUT";
pub const ENV_FETCH_TIMEOUT: &str = "CAPNOTE_FETCH_TIMEOUT";
pub const ENV_DATABASE_URL: &str = "CAPNOTE_DATABASE_URL";
