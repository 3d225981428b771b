//! Versioned document envelope for VeilNote.
//!
//! This module provides:
//! - The `{version, payload}` container persisted as the document file
//! - Version dispatch on load: each tag selects exactly one decrypt path,
//!   with no migration-on-read
//! - The file-level save/load boundary the editor layer consumes
//!
//! # Architecture
//! The envelope sits between the cipher engine and persistence. Saving
//! always produces the current generation; loading reads the tag once and
//! constructs the matching payload variant, never guessing from shape.

pub mod envelope;
pub mod store;

pub use envelope::{Envelope, Payload, CURRENT_VERSION};
pub use store::{load_document, save_document};
