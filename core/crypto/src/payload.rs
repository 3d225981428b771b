//! Encrypted payload shapes.
//!
//! Binary fields serialize as standard base64 strings inside the document
//! JSON.

use serde::{Deserialize, Serialize};

/// Payload for the authenticated generations (versions 2 and 3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    /// PBKDF2 salt, 16 bytes.
    #[serde(with = "b64")]
    pub salt: Vec<u8>,
    /// Keystream nonce, 16 bytes, independent of the salt.
    #[serde(with = "b64")]
    pub nonce: Vec<u8>,
    /// XOR-stream ciphertext, same length as the plaintext.
    #[serde(with = "b64")]
    pub ciphertext: Vec<u8>,
    /// HMAC-SHA256 authentication tag, 32 bytes.
    #[serde(with = "b64")]
    pub mac: Vec<u8>,
}

/// Payload produced by the original unauthenticated cipher (version 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyEncryptedPayload {
    /// Seed salt, 16 bytes.
    #[serde(with = "b64")]
    pub salt: Vec<u8>,
    /// XOR-stream ciphertext. No MAC: corruption decrypts to garbage
    /// silently.
    #[serde(with = "b64")]
    pub ciphertext: Vec<u8>,
}

mod b64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_serializes_fields_as_base64() {
        let payload = EncryptedPayload {
            salt: vec![0u8; 16],
            nonce: vec![1u8; 16],
            ciphertext: b"bytes".to_vec(),
            mac: vec![2u8; 32],
        };
        let json = serde_json::to_string(&payload).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["salt"], "AAAAAAAAAAAAAAAAAAAAAA==");
        assert_eq!(value["ciphertext"], "Ynl0ZXM=");

        let back: EncryptedPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn test_legacy_payload_round_trip() {
        let payload = LegacyEncryptedPayload {
            salt: (0u8..16).collect(),
            ciphertext: vec![9u8; 40],
        };
        let json = serde_json::to_string(&payload).unwrap();
        let back: LegacyEncryptedPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn test_rejects_invalid_base64() {
        let json = r#"{"salt": "not base64!!", "ciphertext": "AA=="}"#;
        assert!(serde_json::from_str::<LegacyEncryptedPayload>(json).is_err());
    }
}
