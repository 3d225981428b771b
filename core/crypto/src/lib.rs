//! Cipher engine for VeilNote documents.
//!
//! Three fixed cipher generations, all XOR-stream constructions over an
//! HMAC-based counter-mode keystream:
//! - **v1 (legacy)**: unauthenticated hash-chain keystream, retained only
//!   for reading old documents
//! - **v2**: PBKDF2 key split plus HMAC-SHA256 authentication over
//!   `nonce ‖ ciphertext`
//! - **v3 (current)**: like v2, but the key material is mixed into every
//!   keystream block by cyclic rotation and its hash is bound into the MAC
//!
//! There is no negotiation and no algorithm agility beyond the document
//! version tag; the constructions are bit-exact interoperability contracts.
//!
//! # Security Guarantees
//! - MAC verification is constant-time and happens before any keystream
//!   work on decrypt; a failed check never yields plaintext bytes
//! - Derived keys are zeroized on drop

pub mod cipher;
pub mod payload;

mod keystream;

pub use cipher::{decrypt, decrypt_legacy, decrypt_v2, encrypt, encrypt_legacy, encrypt_v2};
pub use payload::{EncryptedPayload, LegacyEncryptedPayload};

/// PBKDF2-HMAC-SHA256 iteration count for the v2/v3 key split.
pub const PBKDF2_ITERATIONS: u32 = 200_000;

/// Salt length in bytes, all generations.
pub const SALT_SIZE: usize = 16;

/// Nonce length in bytes, v2/v3.
pub const NONCE_SIZE: usize = 16;

/// HMAC-SHA256 tag length in bytes, v2/v3.
pub const MAC_SIZE: usize = 32;
