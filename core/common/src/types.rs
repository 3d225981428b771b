//! Secret-string handling.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Opaque key material: the sole secret input to every cipher generation.
///
/// For the current generation this is the string produced by the
/// pattern-based derivation over a key array. The legacy read paths accept
/// the raw password through the same type.
///
/// # Security
/// - Memory is zeroized on drop
/// - `Debug` never prints the contents
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial(String);

impl KeyMaterial {
    /// Wrap a secret string.
    pub fn new(material: impl Into<String>) -> Self {
        Self(material.into())
    }

    /// Borrow the secret as a string slice.
    ///
    /// The returned slice should be used immediately and not stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Borrow the secret as raw bytes (UTF-8).
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Length of the secret in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for KeyMaterial {
    fn from(material: String) -> Self {
        Self(material)
    }
}

impl From<&str> for KeyMaterial {
    fn from(material: &str) -> Self {
        Self(material.to_owned())
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyMaterial([REDACTED])")
    }
}
