//! # capnote-core
//!
//! Core types, traits, and abstractions for the capnote capture pipeline.
//!
//! This crate provides the data model shared by every stage of the pipeline
//! (incoming messages, extracted articles, note drafts), the error taxonomy,
//! and the capability traits that concrete extractors, note services and
//! message logs implement.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
