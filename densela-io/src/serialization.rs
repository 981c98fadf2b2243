//! Binary and JSON persistence of vectors and matrices.
//!
//! Binary format: magic bytes (DNLA) + version (u32) + bincode payload.
//! Optional pretty JSON for human inspection.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use densela_linalg::{Matrix, Vector};

use crate::traits::ArrayCodec;

/// The array held by a stored file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    Vector(Vector),
    Matrix(Matrix),
}

impl Payload {
    fn kind(&self) -> &'static str {
        match self {
            Payload::Vector(_) => "vector",
            Payload::Matrix(_) => "matrix",
        }
    }
}

/// Envelope written to `.dnla` files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredArray {
    pub magic: [u8; 4],
    pub version: u32,
    pub payload: Payload,
}

impl StoredArray {
    pub const MAGIC: [u8; 4] = *b"DNLA";
    pub const VERSION: u32 = 1;

    pub fn new(payload: Payload) -> Self {
        Self {
            magic: Self::MAGIC,
            version: Self::VERSION,
            payload,
        }
    }
}

/// Save an array to a binary file (.dnla).
pub fn save_array(payload: &Payload, path: &Path) -> Result<()> {
    let encoded = bincode::serialize(&StoredArray::new(payload.clone()))?;
    std::fs::write(path, &encoded)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(kind = payload.kind(), bytes = encoded.len(), "Saved binary array");
    Ok(())
}

/// Load an array from a binary file (.dnla).
pub fn load_array(path: &Path) -> Result<Payload> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if data.len() < 4 || data[..4] != StoredArray::MAGIC {
        bail!(
            "Invalid array file {}: expected magic bytes {:?}",
            path.display(),
            StoredArray::MAGIC
        );
    }
    let stored: StoredArray = bincode::deserialize(&data)
        .with_context(|| format!("Corrupt array file: {}", path.display()))?;

    if stored.version != StoredArray::VERSION {
        bail!(
            "Unsupported array file version {} (expected {})",
            stored.version,
            StoredArray::VERSION
        );
    }
    Ok(stored.payload)
}

/// Save an array as pretty JSON.
pub fn save_array_json(payload: &Payload, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(payload)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Load an array from JSON.
pub fn load_array_json(path: &Path) -> Result<Payload> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let payload = serde_json::from_str(&json)
        .with_context(|| format!("Invalid JSON array file: {}", path.display()))?;
    Ok(payload)
}

fn expect_matrix(payload: Payload, path: &Path) -> Result<Matrix> {
    match payload {
        Payload::Matrix(m) => Ok(m),
        Payload::Vector(_) => bail!("{} holds a vector, not a matrix", path.display()),
    }
}

/// Vectors are read from either payload kind; a matrix must have a
/// single row or column.
fn expect_vector(payload: Payload, path: &Path) -> Result<Vector> {
    match payload {
        Payload::Vector(v) => Ok(v),
        Payload::Matrix(m) if m.cols() == 1 => Ok(m.get_column(0)?),
        Payload::Matrix(m) if m.rows() == 1 => Ok(m.get_row(0)?),
        Payload::Matrix(m) => bail!(
            "{} holds a {}x{} matrix, not a vector",
            path.display(),
            m.rows(),
            m.cols()
        ),
    }
}

/// The `.dnla` binary format.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCodec;

impl ArrayCodec for BinaryCodec {
    fn read_matrix(&self, path: &Path) -> Result<Matrix> {
        expect_matrix(load_array(path)?, path)
    }

    fn read_vector(&self, path: &Path) -> Result<Vector> {
        expect_vector(load_array(path)?, path)
    }

    fn write_matrix(&self, m: &Matrix, path: &Path) -> Result<()> {
        save_array(&Payload::Matrix(m.clone()), path)
    }

    fn write_vector(&self, v: &Vector, path: &Path) -> Result<()> {
        save_array(&Payload::Vector(v.clone()), path)
    }
}

/// Pretty JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl ArrayCodec for JsonCodec {
    fn read_matrix(&self, path: &Path) -> Result<Matrix> {
        expect_matrix(load_array_json(path)?, path)
    }

    fn read_vector(&self, path: &Path) -> Result<Vector> {
        expect_vector(load_array_json(path)?, path)
    }

    fn write_matrix(&self, m: &Matrix, path: &Path) -> Result<()> {
        save_array_json(&Payload::Matrix(m.clone()), path)
    }

    fn write_vector(&self, v: &Vector, path: &Path) -> Result<()> {
        save_array_json(&Payload::Vector(v.clone()), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matrix() -> Matrix {
        Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap()
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.dnla");
        let payload = Payload::Matrix(sample_matrix());

        save_array(&payload, &path).unwrap();
        let loaded = load_array(&path).unwrap();
        assert_eq!(loaded, payload);

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"DNLA");
    }

    #[test]
    fn test_bad_magic_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.dnla");
        std::fs::write(&path, b"NOPE0000").unwrap();
        let err = load_array(&path).unwrap_err();
        assert!(err.to_string().contains("magic"), "{}", err);
    }

    #[test]
    fn test_wrong_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.dnla");
        let mut stored = StoredArray::new(Payload::Vector(Vector::from_slice(&[1.0]).unwrap()));
        stored.version = 99;
        std::fs::write(&path, bincode::serialize(&stored).unwrap()).unwrap();
        let err = load_array(&path).unwrap_err();
        assert!(err.to_string().contains("version 99"), "{}", err);
    }

    #[test]
    fn test_json_roundtrip_and_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.json");
        let v = Vector::from_slice(&[1.5, -2.0]).unwrap();
        JsonCodec.write_vector(&v, &path).unwrap();
        assert_eq!(JsonCodec.read_vector(&path).unwrap(), v);

        std::fs::write(&path, r#"{"Matrix":{"rows":2,"cols":2,"data":[1.0]}}"#).unwrap();
        assert!(JsonCodec.read_matrix(&path).is_err());
    }

    #[test]
    fn test_vector_from_single_column_matrix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("col.dnla");
        let col = Matrix::from_rows(&[vec![1.0], vec![2.0]]).unwrap();
        BinaryCodec.write_matrix(&col, &path).unwrap();
        assert_eq!(BinaryCodec.read_vector(&path).unwrap().as_slice(), &[1.0, 2.0]);

        BinaryCodec.write_matrix(&sample_matrix(), &path).unwrap();
        assert!(BinaryCodec.read_vector(&path).is_err());
        assert!(BinaryCodec.read_matrix(&path).is_ok());
    }
}
