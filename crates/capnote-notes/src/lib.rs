//! # capnote-notes
//!
//! Clients for the external note services capnote writes to:
//! - [`JoplinClient`]: local Joplin-style API with token query auth and
//!   separate tag resources
//! - [`RestNoteClient`]: generic bearer-token endpoint taking one JSON
//!   document per note
//!
//! Both implement [`NoteSink`] so the pipeline can target either.

pub mod joplin;
pub mod rest;

// Re-export core types
pub use capnote_core::*;

pub use joplin::{JoplinClient, JoplinConfig, JoplinNote, NoteUpdate};
pub use rest::{RestConfig, RestNoteClient};
