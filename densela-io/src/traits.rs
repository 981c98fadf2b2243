//! Core trait for array file formats.

use std::path::Path;

use anyhow::{bail, Result};

use densela_linalg::{Matrix, Vector};

use crate::serialization::{BinaryCodec, JsonCodec};
use crate::text::TextCodec;

/// A file format that can hold a single matrix or vector.
pub trait ArrayCodec {
    fn read_matrix(&self, path: &Path) -> Result<Matrix>;

    fn read_vector(&self, path: &Path) -> Result<Vector>;

    fn write_matrix(&self, m: &Matrix, path: &Path) -> Result<()>;

    fn write_vector(&self, v: &Vector, path: &Path) -> Result<()>;
}

/// Pick a codec from the file extension.
///
/// `.txt`, `.tsv`, `.csv` and extension-less paths are text; `.dnla` is
/// the binary envelope; `.json` is JSON. `precision` only affects text
/// output.
pub fn codec_for_path(path: &Path, precision: usize) -> Result<Box<dyn ArrayCodec>> {
    match path.extension().and_then(|e| e.to_str()) {
        None | Some("txt") | Some("tsv") | Some("csv") | Some("dat") => {
            Ok(Box::new(TextCodec::for_path(path, precision)))
        }
        Some("dnla") => Ok(Box::new(BinaryCodec)),
        Some("json") => Ok(Box::new(JsonCodec)),
        Some(other) => bail!(
            "Unrecognized file extension '.{}' for {}",
            other,
            path.display()
        ),
    }
}

/// Read a matrix from any supported format.
pub fn read_matrix(path: &Path) -> Result<Matrix> {
    codec_for_path(path, 6)?.read_matrix(path)
}

/// Read a vector from any supported format.
pub fn read_vector(path: &Path) -> Result<Vector> {
    codec_for_path(path, 6)?.read_vector(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_selection() {
        assert!(codec_for_path(Path::new("a.csv"), 6).is_ok());
        assert!(codec_for_path(Path::new("a"), 6).is_ok());
        assert!(codec_for_path(Path::new("a.dnla"), 6).is_ok());
        assert!(codec_for_path(Path::new("a.json"), 6).is_ok());
        let err = codec_for_path(Path::new("a.xlsx"), 6).err().unwrap();
        assert!(err.to_string().contains(".xlsx"), "{}", err);
    }

    #[test]
    fn test_read_any_format() {
        let dir = tempfile::tempdir().unwrap();
        let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        for name in ["m.tsv", "m.dnla", "m.json"] {
            let path = dir.path().join(name);
            codec_for_path(&path, 6).unwrap().write_matrix(&m, &path).unwrap();
            assert_eq!(read_matrix(&path).unwrap(), m, "format {}", name);
        }
    }
}
