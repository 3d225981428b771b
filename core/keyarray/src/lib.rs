//! Key-array secret management for VeilNote.
//!
//! This module provides:
//! - Generation, persistence, and validation of the key array (the
//!   10-layer grid of random strings that is the root secret)
//! - The fixed registry of ten coordinate-traversal patterns
//! - Derivation of key material from a 10-digit password and a key array
//!
//! # Security Guarantees
//! - Pattern order is a compile-time constant; the digit-to-pattern binding
//!   never changes once documents exist
//! - Derivation is deterministic and borrows the key array read-only

pub mod array;
pub mod password;
pub mod patterns;

pub use array::{KeyArray, Layer, CELL_LENGTH, GRID_SIZE, LAYER_COUNT};
pub use password::{derive_key_material, validate_password, PASSWORD_LENGTH};
pub use patterns::{Coordinate, Pattern, PATTERN_COUNT};
