//! # capnote-capture
//!
//! The capture pipeline and everything needed to run it:
//! - Note composition per branch (internal link, external link, plain text)
//! - The orchestrator that takes one message to a saved note
//! - Admission scopes
//! - TOML / environment configuration
//! - Tracing subscriber setup for the `capnote` binary
//!
//! ## Example
//!
//! ```rust,ignore
//! use capnote_capture::{CaptureConfig, CapturePipeline, IncomingMessage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CaptureConfig::load(None)?;
//!     config.validate()?;
//!     let pipeline = CapturePipeline::from_config(&config).await?;
//!
//!     let report = pipeline.process(&IncomingMessage {
//!         sender_name: "Alice".into(),
//!         text: "check this out https://intra.local/report".into(),
//!         is_admin: true,
//!         ..Default::default()
//!     }).await;
//!     println!("{} note(s) saved", report.saved());
//!
//!     pipeline.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod composer;
pub mod config;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod scope;

// Re-export core types
pub use capnote_core::*;

pub use composer::NoteStyle;
pub use config::{CaptureConfig, ConfigError, ConfigResult, ExtractorKind, NoteBackend, StorageConfig};
pub use pipeline::CapturePipeline;
pub use report::{Branch, CaptureReport, NoteOutcome, Stage};
pub use scope::CaptureScope;
