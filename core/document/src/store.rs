//! File-level save/load boundary.
//!
//! Together with the derivation call in `veilnote-keyarray`, these two
//! functions are the entire interface the editor layer consumes.

use std::fs;
use std::path::Path;

use veilnote_common::{KeyMaterial, Result};

use crate::envelope::Envelope;

/// Encrypt `text` under the current generation and write the envelope to
/// `path`, creating parent directories as needed.
pub fn save_document(path: impl AsRef<Path>, text: &str, key_material: &KeyMaterial) -> Result<()> {
    let envelope = Envelope::seal(text, key_material)?;
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, envelope.to_json()?)?;
    Ok(())
}

/// Read the envelope at `path` and decrypt it along the path its version
/// tag selects.
pub fn load_document(path: impl AsRef<Path>, key_material: &KeyMaterial) -> Result<String> {
    let text = fs::read_to_string(path)?;
    let envelope = Envelope::from_json(&text)?;
    envelope.open(key_material)
}
