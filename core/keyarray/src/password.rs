//! Password validation and key-material derivation.

use veilnote_common::{Error, KeyMaterial, Result};

use crate::array::{KeyArray, LAYER_COUNT};
use crate::patterns::{Pattern, PATTERN_COUNT};

/// Required password length: one digit per key-array layer.
pub const PASSWORD_LENGTH: usize = LAYER_COUNT;

/// Check that a password is exactly ten ASCII digits.
///
/// The two failure modes carry distinct messages so the caller can tell a
/// wrong length from a non-digit character.
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() != PASSWORD_LENGTH {
        return Err(Error::Validation(format!(
            "password must be exactly {PASSWORD_LENGTH} digits long"
        )));
    }
    if !password.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::Validation(
            "password must contain digits only".to_owned(),
        ));
    }
    for c in password.chars() {
        // With ten registered patterns every ASCII digit is in range; this
        // stays as a fail-closed guard on the pattern table.
        let digit = c as u8 - b'0';
        if usize::from(digit) >= PATTERN_COUNT {
            return Err(Error::Validation(format!(
                "digit '{c}' is not associated with a pattern"
            )));
        }
    }
    Ok(())
}

/// Derive key material from a 10-digit password and a key array.
///
/// For each password position `i`, the digit value selects a pattern and
/// the position selects layer `i`; the cells the pattern visits are
/// appended in traversal order, and the ten per-layer fragments are
/// concatenated in password order.
///
/// # Postconditions
/// - Deterministic: identical `(password, key_array)` inputs always yield
///   identical key material
///
/// # Errors
/// - `Validation` if the password is not ten ASCII digits
pub fn derive_key_material(password: &str, key_array: &KeyArray) -> Result<KeyMaterial> {
    validate_password(password)?;

    let mut material = String::new();
    for (layer_index, c) in password.chars().enumerate() {
        let digit = c as u8 - b'0';
        let pattern = Pattern::from_digit(digit)?;
        let layer = key_array.layer(layer_index)?;
        for (row, col) in pattern.coordinates(layer.len()) {
            material.push_str(&layer[row][col]);
        }
    }
    Ok(KeyMaterial::new(material))
}
