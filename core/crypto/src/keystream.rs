//! Keystream generation and key splitting.
//!
//! Every generation expands a counter sequence into 64-byte hash blocks,
//! concatenates them, and truncates to the requested length. Counters are
//! 8-byte big-endian unsigned integers starting at 0, one per block.

use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256, Sha512};
use zeroize::Zeroizing;

use veilnote_common::{Error, Result};

use crate::PBKDF2_ITERATIONS;

/// Length of each split key half (enc_key, mac_key).
pub(crate) const KEY_LENGTH: usize = 32;

type HmacSha512 = Hmac<Sha512>;

/// Split a secret string into independent encryption and MAC keys.
///
/// PBKDF2-HMAC-SHA256 over the secret bytes, 200 000 iterations, 64-byte
/// output: the first half keys the keystream, the second half keys the
/// authentication tag. Both halves are zeroized on drop.
pub(crate) fn split_keys(
    material: &[u8],
    salt: &[u8],
) -> (Zeroizing<[u8; KEY_LENGTH]>, Zeroizing<[u8; KEY_LENGTH]>) {
    let mut derived = Zeroizing::new([0u8; KEY_LENGTH * 2]);
    pbkdf2_hmac::<Sha256>(material, salt, PBKDF2_ITERATIONS, &mut *derived);

    let mut enc_key = Zeroizing::new([0u8; KEY_LENGTH]);
    let mut mac_key = Zeroizing::new([0u8; KEY_LENGTH]);
    enc_key.copy_from_slice(&derived[..KEY_LENGTH]);
    mac_key.copy_from_slice(&derived[KEY_LENGTH..]);
    (enc_key, mac_key)
}

fn hmac_sha512(key: &[u8]) -> Result<HmacSha512> {
    HmacSha512::new_from_slice(key)
        .map_err(|_| Error::Crypto("HMAC-SHA512 key setup failed".to_owned()))
}

/// v2 keystream: HMAC-SHA512(enc_key, nonce ‖ counter).
pub(crate) fn keystream_v2(key: &[u8], nonce: &[u8], length: usize) -> Result<Vec<u8>> {
    let mut stream = Vec::with_capacity(length + Sha512::output_size());
    let mut counter: u64 = 0;
    while stream.len() < length {
        let mut mac = hmac_sha512(key)?;
        mac.update(nonce);
        mac.update(&counter.to_be_bytes());
        stream.extend_from_slice(&mac.finalize().into_bytes());
        counter += 1;
    }
    stream.truncate(length);
    Ok(stream)
}

/// v3 keystream: HMAC-SHA512(enc_key, salt ‖ nonce ‖ counter ‖ rotated
/// material), where the material bytes are cyclically rotated left by
/// `counter mod len` so every offset is reached as the counter advances.
pub(crate) fn keystream_v3(
    key: &[u8],
    salt: &[u8],
    nonce: &[u8],
    material: &[u8],
    length: usize,
) -> Result<Vec<u8>> {
    if material.is_empty() {
        return Err(Error::EmptyKeyMaterial);
    }

    let mut stream = Vec::with_capacity(length + Sha512::output_size());
    let mut counter: u64 = 0;
    while stream.len() < length {
        let rotation = (counter % material.len() as u64) as usize;
        let mut mac = hmac_sha512(key)?;
        mac.update(salt);
        mac.update(nonce);
        mac.update(&counter.to_be_bytes());
        // Feeding the two halves in swapped order is the rotation; no
        // temporary buffer needed.
        mac.update(&material[rotation..]);
        mac.update(&material[..rotation]);
        stream.extend_from_slice(&mac.finalize().into_bytes());
        counter += 1;
    }
    stream.truncate(length);
    Ok(stream)
}

/// v1 keystream: SHA-512(seed ‖ counter) with seed = SHA-256(secret ‖
/// salt). Structurally similar to v3's chain but deliberately weaker; kept
/// as its own path because its security properties differ.
pub(crate) fn keystream_legacy(secret: &[u8], salt: &[u8], length: usize) -> Vec<u8> {
    let seed = Sha256::new().chain_update(secret).chain_update(salt).finalize();

    let mut stream = Vec::with_capacity(length + Sha512::output_size());
    let mut counter: u64 = 0;
    while stream.len() < length {
        let block = Sha512::new()
            .chain_update(seed)
            .chain_update(counter.to_be_bytes())
            .finalize();
        stream.extend_from_slice(&block);
        counter += 1;
    }
    stream.truncate(length);
    stream
}

/// Byte-for-byte XOR. The keystream is always generated at exactly the
/// data length, so the zip never under-runs.
pub(crate) fn xor(data: &[u8], keystream: &[u8]) -> Vec<u8> {
    debug_assert_eq!(data.len(), keystream.len());
    data.iter().zip(keystream).map(|(d, k)| d ^ k).collect()
}
