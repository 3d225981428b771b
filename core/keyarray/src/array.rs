//! Key-array generation, persistence, and access.
//!
//! The key array is the long-term secret: 10 layers, each a 77×77 grid of
//! 2-character alphanumeric strings. The persisted form is a bare JSON
//! array of layers with no header or version field; the format is fixed
//! and unversioned by design.

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use veilnote_common::{Error, Result};

/// Number of layers in a key array. One layer per password position.
pub const LAYER_COUNT: usize = 10;

/// Side length of each square layer.
pub const GRID_SIZE: usize = 77;

/// Length of each cell string.
pub const CELL_LENGTH: usize = 2;

/// Alphabet cells are drawn from (62 symbols).
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// One square grid of cell strings.
pub type Layer = Vec<Vec<String>>;

/// The 10×77×77 grid of short random strings; the actual long-term secret.
///
/// Immutable once constructed. Derivation borrows it read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyArray {
    layers: Vec<Layer>,
}

impl KeyArray {
    /// Generate a fresh key array from the process-wide secure random
    /// source.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Generate a key array from a seeded generator.
    ///
    /// Identical seeds reproduce identical arrays. Intended for
    /// deterministic tests only; never share a seeded generator across
    /// concurrent callers, and never use this for a real secret.
    pub fn generate_seeded(seed: u64) -> Self {
        Self::generate_with(&mut StdRng::seed_from_u64(seed))
    }

    fn generate_with<R: Rng>(rng: &mut R) -> Self {
        let layers = (0..LAYER_COUNT)
            .map(|_| {
                (0..GRID_SIZE)
                    .map(|_| {
                        (0..GRID_SIZE)
                            .map(|_| {
                                (0..CELL_LENGTH)
                                    .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
                                    .collect()
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect();
        Self { layers }
    }

    /// Construct from already-parsed layers, validating the shape.
    ///
    /// # Errors
    /// - `Structural` if the layer count is not [`LAYER_COUNT`] or any
    ///   layer is not a [`GRID_SIZE`]×[`GRID_SIZE`] grid
    ///
    /// Cell length and alphabet are not re-validated here.
    pub fn from_layers(layers: Vec<Layer>) -> Result<Self> {
        if layers.len() != LAYER_COUNT {
            return Err(Error::Structural(format!(
                "invalid key array: expected {LAYER_COUNT} layers, found {}",
                layers.len()
            )));
        }
        for (index, layer) in layers.iter().enumerate() {
            if layer.len() != GRID_SIZE || layer.iter().any(|row| row.len() != GRID_SIZE) {
                return Err(Error::Structural(format!(
                    "invalid key array: layer {index} is not a {GRID_SIZE}x{GRID_SIZE} grid"
                )));
            }
        }
        Ok(Self { layers })
    }

    /// Parse a key array from its JSON text form.
    pub fn from_json(text: &str) -> Result<Self> {
        let layers: Vec<Layer> = serde_json::from_str(text).map_err(|_| {
            Error::Structural("invalid key array: expected a list of string grids".to_owned())
        })?;
        Self::from_layers(layers)
    }

    /// Serialize to the JSON text form. Lossless: `from_json(to_json())`
    /// yields an equal array, cell for cell.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.layers)?)
    }

    /// Load a key array from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Write the key array to a file, creating parent directories as
    /// needed.
    pub fn dump(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Bounds-checked layer accessor.
    ///
    /// # Errors
    /// - `LayerIndex` if `index >= LAYER_COUNT`
    pub fn layer(&self, index: usize) -> Result<&Layer> {
        self.layers.get(index).ok_or(Error::LayerIndex {
            index,
            count: LAYER_COUNT,
        })
    }

    /// Render one layer as space-separated rows, for inspection.
    pub fn layer_text(&self, index: usize) -> Result<String> {
        let layer = self.layer(index)?;
        Ok(layer
            .iter()
            .map(|row| row.join(" "))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_shape() {
        let array = KeyArray::generate();
        for index in 0..LAYER_COUNT {
            let layer = array.layer(index).unwrap();
            assert_eq!(layer.len(), GRID_SIZE);
            for row in layer {
                assert_eq!(row.len(), GRID_SIZE);
                for cell in row {
                    assert_eq!(cell.len(), CELL_LENGTH);
                    assert!(cell.bytes().all(|b| b.is_ascii_alphanumeric()));
                }
            }
        }
    }

    #[test]
    fn test_generate_seeded_is_reproducible() {
        let a = KeyArray::generate_seeded(42);
        let b = KeyArray::generate_seeded(42);
        assert_eq!(a, b);

        let c = KeyArray::generate_seeded(43);
        assert_ne!(a, c);
    }

    #[test]
    fn test_json_round_trip() {
        let array = KeyArray::generate_seeded(7);
        let text = array.to_json().unwrap();
        let reloaded = KeyArray::from_json(&text).unwrap();
        assert_eq!(array, reloaded);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("secret.vnk");

        let array = KeyArray::generate_seeded(1);
        array.dump(&path).unwrap();
        let reloaded = KeyArray::load(&path).unwrap();
        assert_eq!(array, reloaded);
    }

    #[test]
    fn test_load_rejects_wrong_layer_count() {
        let layers: Vec<Layer> = vec![vec![vec!["aa".to_owned(); GRID_SIZE]; GRID_SIZE]; 3];
        let text = serde_json::to_string(&layers).unwrap();
        let err = KeyArray::from_json(&text).unwrap_err();
        assert!(matches!(err, Error::Structural(_)));
    }

    #[test]
    fn test_load_rejects_wrong_grid_size() {
        let layers: Vec<Layer> = vec![vec![vec!["aa".to_owned(); 5]; 5]; LAYER_COUNT];
        let text = serde_json::to_string(&layers).unwrap();
        let err = KeyArray::from_json(&text).unwrap_err();
        assert!(matches!(err, Error::Structural(_)));
    }

    #[test]
    fn test_load_rejects_non_grid_json() {
        for text in ["{}", "\"hello\"", "[1, 2, 3]", "not json at all"] {
            let err = KeyArray::from_json(text).unwrap_err();
            assert!(matches!(err, Error::Structural(_)), "accepted: {text}");
        }
    }

    #[test]
    fn test_layer_out_of_range() {
        let array = KeyArray::generate_seeded(2);
        assert!(array.layer(LAYER_COUNT - 1).is_ok());
        let err = array.layer(LAYER_COUNT).unwrap_err();
        assert!(matches!(err, Error::LayerIndex { index: 10, .. }));
    }

    #[test]
    fn test_layer_text_rendering() {
        let array = KeyArray::generate_seeded(3);
        let text = array.layer_text(0).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), GRID_SIZE);
        assert_eq!(rows[0].split(' ').count(), GRID_SIZE);
    }
}
