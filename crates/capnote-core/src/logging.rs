//! Structured logging field name constants for capnote.
//!
//! All crates use these constants for consistent structured logging fields
//! so a capture can be followed from message arrival to note creation.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Note persistence failed, message lost for this run |
//! | WARN  | Degraded stage, fallback applied (fetch failed, tag skipped) |
//! | INFO  | Lifecycle events (startup, shutdown), notes saved |
//! | DEBUG | Decision points (branch taken, extractor chosen) |
//! | TRACE | Per-item detail (each URL match, each tag lookup) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID for one message run through the pipeline.
/// Format: UUIDv7 (time-ordered).
pub const CAPTURE_ID: &str = "capture_id";

/// Subsystem originating the log event.
/// Values: "capture", "extract", "notes", "db"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "pipeline", "fetcher", "structural", "joplin", "rest"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "process", "fetch", "create_note", "find_or_create_tag"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// URL being classified or fetched.
pub const URL: &str = "url";

/// Remote note identifier.
pub const NOTE_ID: &str = "note_id";

/// Remote tag identifier.
pub const TAG_ID: &str = "tag_id";

/// Tag name being resolved.
pub const TAG: &str = "tag";

/// Local message row id.
pub const MESSAGE_ID: &str = "message_id";

/// Pipeline stage reached.
pub const STAGE: &str = "stage";

/// Branch taken for a URL ("internal", "external", "text").
pub const BRANCH: &str = "branch";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// HTTP status code returned by a remote service.
pub const STATUS: &str = "status";

/// Number of URLs found in a message.
pub const URL_COUNT: &str = "url_count";

/// Character length of extracted content.
pub const CONTENT_LEN: &str = "content_len";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
