//! The versioned `{version, payload}` container.

use serde::Deserialize;
use serde_json::Value;

use veilnote_common::{Error, KeyMaterial, Result};
use veilnote_crypto::{
    decrypt, decrypt_legacy, decrypt_v2, encrypt, EncryptedPayload, LegacyEncryptedPayload,
};

/// Version written by every save.
pub const CURRENT_VERSION: u64 = 3;

/// Payload shape, discriminated by the envelope's version tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Version 1: salt and ciphertext only, no MAC.
    Legacy(LegacyEncryptedPayload),
    /// Versions 2 and 3: salt, nonce, ciphertext, MAC.
    Modern(EncryptedPayload),
}

/// A versioned encrypted document.
///
/// The version is permanently bound to the payload shape it wraps; the
/// three read paths are terminal and mutually exclusive. Callers wanting
/// the current format for an old document must explicitly re-save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    version: u64,
    payload: Payload,
}

/// On-disk form before version dispatch. A missing version field means
/// version 1: the oldest files predate the tag, and that compatibility is
/// deliberate even though it selects the unauthenticated scheme.
#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(default = "oldest_version")]
    version: u64,
    payload: Value,
}

fn oldest_version() -> u64 {
    1
}

fn parse_payload<T: serde::de::DeserializeOwned>(value: Value, version: u64) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        Error::Structural(format!("payload does not match version {version}: {e}"))
    })
}

impl Envelope {
    /// Encrypt `text` under the current generation and wrap it.
    pub fn seal(text: &str, key_material: &KeyMaterial) -> Result<Self> {
        let payload = encrypt(text.as_bytes(), key_material)?;
        Ok(Self {
            version: CURRENT_VERSION,
            payload: Payload::Modern(payload),
        })
    }

    /// Decrypt the wrapped payload along the path its version tag selects.
    ///
    /// # Errors
    /// - `AuthenticationFailure` for tampered v2/v3 payloads
    /// - `Structural` if the decrypted bytes are not valid UTF-8
    pub fn open(&self, key_material: &KeyMaterial) -> Result<String> {
        let plaintext = match (&self.payload, self.version) {
            (Payload::Legacy(payload), 1) => decrypt_legacy(payload, key_material),
            (Payload::Modern(payload), 2) => decrypt_v2(payload, key_material)?,
            (Payload::Modern(payload), 3) => decrypt(payload, key_material)?,
            // Unreachable for envelopes built by this crate; fail closed.
            _ => return Err(Error::UnsupportedVersion(self.version)),
        };
        String::from_utf8(plaintext)
            .map_err(|_| Error::Structural("decrypted document is not valid UTF-8".to_owned()))
    }

    /// The version tag.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The wrapped payload.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Parse a document file's JSON text.
    ///
    /// The version tag is read once and decides the payload shape; any tag
    /// outside {1, 2, 3} is rejected before the payload is even examined.
    ///
    /// # Errors
    /// - `UnsupportedVersion` for an unknown tag
    /// - `Structural` for malformed JSON or a payload that does not match
    ///   its version's shape
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawEnvelope = serde_json::from_str(text)
            .map_err(|e| Error::Structural(format!("invalid document: {e}")))?;
        let payload = match raw.version {
            1 => Payload::Legacy(parse_payload(raw.payload, raw.version)?),
            2 | 3 => Payload::Modern(parse_payload(raw.payload, raw.version)?),
            version => return Err(Error::UnsupportedVersion(version)),
        };
        Ok(Self {
            version: raw.version,
            payload,
        })
    }

    /// Serialize to the document file's JSON text.
    pub fn to_json(&self) -> Result<String> {
        let payload = match &self.payload {
            Payload::Legacy(payload) => serde_json::to_value(payload)?,
            Payload::Modern(payload) => serde_json::to_value(payload)?,
        };
        let document = serde_json::json!({
            "version": self.version,
            "payload": payload,
        });
        Ok(document.to_string())
    }

    /// Wrap an existing payload under a given tag. Test and migration
    /// helper; rejects tag/shape mismatches.
    pub fn from_parts(version: u64, payload: Payload) -> Result<Self> {
        match (version, &payload) {
            (1, Payload::Legacy(_)) | (2, Payload::Modern(_)) | (3, Payload::Modern(_)) => {
                Ok(Self { version, payload })
            }
            (1..=3, _) => Err(Error::Structural(format!(
                "payload shape does not match version {version}"
            ))),
            _ => Err(Error::UnsupportedVersion(version)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veilnote_crypto::{encrypt_legacy, encrypt_v2};

    fn km(text: &str) -> KeyMaterial {
        KeyMaterial::new(text)
    }

    #[test]
    fn test_seal_writes_current_version() {
        let envelope = Envelope::seal("hello", &km("material")).unwrap();
        assert_eq!(envelope.version(), 3);
        assert!(matches!(envelope.payload(), Payload::Modern(_)));
        assert_eq!(envelope.open(&km("material")).unwrap(), "hello");
    }

    #[test]
    fn test_json_round_trip() {
        let envelope = Envelope::seal("body text", &km("material")).unwrap();
        let text = envelope.to_json().unwrap();
        let reloaded = Envelope::from_json(&text).unwrap();
        assert_eq!(reloaded, envelope);
        assert_eq!(reloaded.open(&km("material")).unwrap(), "body text");
    }

    #[test]
    fn test_version_2_dispatches_to_v2() {
        let payload = encrypt_v2("older text".as_bytes(), &km("0123456789")).unwrap();
        let envelope = Envelope::from_parts(2, Payload::Modern(payload)).unwrap();
        let text = envelope.to_json().unwrap();

        let reloaded = Envelope::from_json(&text).unwrap();
        assert_eq!(reloaded.version(), 2);
        assert_eq!(reloaded.open(&km("0123456789")).unwrap(), "older text");
    }

    #[test]
    fn test_missing_version_defaults_to_legacy() {
        let payload = encrypt_legacy("oldest text".as_bytes(), &km("0123456789"));
        let payload_json = serde_json::to_string(&payload).unwrap();
        let text = format!(r#"{{"payload": {payload_json}}}"#);

        let envelope = Envelope::from_json(&text).unwrap();
        assert_eq!(envelope.version(), 1);
        assert_eq!(envelope.open(&km("0123456789")).unwrap(), "oldest text");
    }

    #[test]
    fn test_unsupported_version_rejected_before_payload() {
        let text = r#"{"version": 4, "payload": {"anything": "goes"}}"#;
        let err = Envelope::from_json(text).unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion(4)));

        let err = Envelope::from_json(r#"{"version": 0, "payload": {}}"#).unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion(0)));
    }

    #[test]
    fn test_payload_shape_must_match_version() {
        // Version 2 with a legacy-shaped payload: the nonce and mac fields
        // are missing, so construction fails.
        let payload = encrypt_legacy(b"text", &km("0123456789"));
        let payload_json = serde_json::to_string(&payload).unwrap();
        let text = format!(r#"{{"version": 2, "payload": {payload_json}}}"#);
        assert!(Envelope::from_json(&text).is_err());

        let modern = encrypt_v2(b"text", &km("0123456789")).unwrap();
        assert!(Envelope::from_parts(1, Payload::Modern(modern)).is_err());
    }

    #[test]
    fn test_missing_payload_field_is_an_error() {
        assert!(Envelope::from_json(r#"{"version": 3}"#).is_err());
    }

    #[test]
    fn test_tampered_mac_in_json_fails_authentication() {
        let envelope = Envelope::seal("hello", &km("k")).unwrap();
        let text = envelope.to_json().unwrap();

        let mut value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let mut mac = value["payload"]["mac"].as_str().unwrap().to_owned();
        // Alter the leading base64 character, which changes the decoded
        // tag while keeping the text decodable.
        let replacement = if mac.starts_with('A') { "B" } else { "A" };
        mac.replace_range(0..1, replacement);
        value["payload"]["mac"] = serde_json::Value::String(mac);

        let reloaded = Envelope::from_json(&value.to_string()).unwrap();
        let err = reloaded.open(&km("k")).unwrap_err();
        assert!(matches!(err, Error::AuthenticationFailure));
    }

    #[test]
    fn test_open_with_wrong_material() {
        let envelope = Envelope::seal("hello", &km("right")).unwrap();
        assert!(matches!(
            envelope.open(&km("wrong")).unwrap_err(),
            Error::AuthenticationFailure
        ));
    }
}
