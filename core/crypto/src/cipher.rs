//! The three cipher generations.
//!
//! `encrypt`/`decrypt` are the current generation (v3). The older
//! generations stay available under explicit names for reading existing
//! documents; the document envelope selects among them by version tag.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::{Digest, Sha256, Sha512};
use subtle::ConstantTimeEq;

use veilnote_common::{Error, KeyMaterial, Result};

use crate::keystream::{keystream_legacy, keystream_v2, keystream_v3, split_keys, xor};
use crate::payload::{EncryptedPayload, LegacyEncryptedPayload};
use crate::{NONCE_SIZE, SALT_SIZE};

type HmacSha256 = Hmac<Sha256>;

fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

fn hmac_sha256(key: &[u8]) -> Result<HmacSha256> {
    HmacSha256::new_from_slice(key)
        .map_err(|_| Error::Crypto("HMAC-SHA256 key setup failed".to_owned()))
}

fn nonempty_material(key_material: &KeyMaterial) -> Result<&[u8]> {
    if key_material.is_empty() {
        return Err(Error::EmptyKeyMaterial);
    }
    Ok(key_material.as_bytes())
}

/// Constant-time tag comparison. Never compare secrets with `==`.
fn verify_mac(expected: &[u8], presented: &[u8]) -> Result<()> {
    if bool::from(expected.ct_eq(presented)) {
        Ok(())
    } else {
        Err(Error::AuthenticationFailure)
    }
}

fn mac_v3(
    mac_key: &[u8],
    salt: &[u8],
    nonce: &[u8],
    ciphertext: &[u8],
    material: &[u8],
) -> Result<Vec<u8>> {
    // The material's hash, not the material itself, is bound into the tag:
    // wrong key material fails verification without any keystream work.
    let material_digest = Sha512::digest(material);
    let mut mac = hmac_sha256(mac_key)?;
    mac.update(salt);
    mac.update(nonce);
    mac.update(ciphertext);
    mac.update(&material_digest);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn mac_v2(mac_key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let mut mac = hmac_sha256(mac_key)?;
    mac.update(nonce);
    mac.update(ciphertext);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Encrypt with the current generation (v3).
///
/// The key material — the pattern-derived string, not the raw password —
/// is both the PBKDF2 input and a per-block keystream ingredient.
///
/// # Errors
/// - `EmptyKeyMaterial` if the material is empty
pub fn encrypt(plaintext: &[u8], key_material: &KeyMaterial) -> Result<EncryptedPayload> {
    let material = nonempty_material(key_material)?;
    let salt = random_bytes::<SALT_SIZE>();
    let nonce = random_bytes::<NONCE_SIZE>();

    let (enc_key, mac_key) = split_keys(material, &salt);
    let stream = keystream_v3(&*enc_key, &salt, &nonce, material, plaintext.len())?;
    let ciphertext = xor(plaintext, &stream);
    let mac = mac_v3(&*mac_key, &salt, &nonce, &ciphertext, material)?;

    Ok(EncryptedPayload {
        salt: salt.to_vec(),
        nonce: nonce.to_vec(),
        ciphertext,
        mac,
    })
}

/// Decrypt a v3 payload.
///
/// # Postconditions
/// - The MAC is verified in constant time before any keystream is derived;
///   on mismatch no plaintext bytes exist to leak
///
/// # Errors
/// - `EmptyKeyMaterial` if the material is empty
/// - `AuthenticationFailure` if any byte of salt, nonce, ciphertext, or
///   mac was altered, or the key material is wrong
pub fn decrypt(payload: &EncryptedPayload, key_material: &KeyMaterial) -> Result<Vec<u8>> {
    let material = nonempty_material(key_material)?;
    let (enc_key, mac_key) = split_keys(material, &payload.salt);

    let expected = mac_v3(
        &*mac_key,
        &payload.salt,
        &payload.nonce,
        &payload.ciphertext,
        material,
    )?;
    verify_mac(&expected, &payload.mac)?;

    let stream = keystream_v3(
        &*enc_key,
        &payload.salt,
        &payload.nonce,
        material,
        payload.ciphertext.len(),
    )?;
    Ok(xor(&payload.ciphertext, &stream))
}

/// Encrypt with the v2 generation.
///
/// Historically the PBKDF2 input here was the raw password; the API takes
/// the same opaque secret type as the other generations. Kept chiefly so
/// v2 reads stay testable against freshly produced payloads.
pub fn encrypt_v2(plaintext: &[u8], key_material: &KeyMaterial) -> Result<EncryptedPayload> {
    let salt = random_bytes::<SALT_SIZE>();
    let nonce = random_bytes::<NONCE_SIZE>();

    let (enc_key, mac_key) = split_keys(key_material.as_bytes(), &salt);
    let stream = keystream_v2(&*enc_key, &nonce, plaintext.len())?;
    let ciphertext = xor(plaintext, &stream);
    let mac = mac_v2(&*mac_key, &nonce, &ciphertext)?;

    Ok(EncryptedPayload {
        salt: salt.to_vec(),
        nonce: nonce.to_vec(),
        ciphertext,
        mac,
    })
}

/// Decrypt a v2 payload, verifying the MAC in constant time first.
///
/// # Errors
/// - `AuthenticationFailure` on any tampering or a wrong secret
pub fn decrypt_v2(payload: &EncryptedPayload, key_material: &KeyMaterial) -> Result<Vec<u8>> {
    let (enc_key, mac_key) = split_keys(key_material.as_bytes(), &payload.salt);

    let expected = mac_v2(&*mac_key, &payload.nonce, &payload.ciphertext)?;
    verify_mac(&expected, &payload.mac)?;

    let stream = keystream_v2(&*enc_key, &payload.nonce, payload.ciphertext.len())?;
    Ok(xor(&payload.ciphertext, &stream))
}

/// Encrypt with the legacy v1 scheme. Unauthenticated; new documents never
/// use this, it exists to produce fixtures for the backward-compatible
/// read path.
pub fn encrypt_legacy(plaintext: &[u8], key_material: &KeyMaterial) -> LegacyEncryptedPayload {
    let salt = random_bytes::<SALT_SIZE>();
    let stream = keystream_legacy(key_material.as_bytes(), &salt, plaintext.len());
    LegacyEncryptedPayload {
        salt: salt.to_vec(),
        ciphertext: xor(plaintext, &stream),
    }
}

/// Decrypt a legacy v1 payload.
///
/// No integrity check exists in this generation: corrupted input or a
/// wrong secret decrypts to garbage silently.
pub fn decrypt_legacy(payload: &LegacyEncryptedPayload, key_material: &KeyMaterial) -> Vec<u8> {
    let stream = keystream_legacy(
        key_material.as_bytes(),
        &payload.salt,
        payload.ciphertext.len(),
    );
    xor(&payload.ciphertext, &stream)
}
