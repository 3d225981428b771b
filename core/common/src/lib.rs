//! Common types shared across VeilNote modules.
//!
//! This module provides the error taxonomy and the secret-string type that
//! every other crate in the workspace builds on.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::KeyMaterial;
