//! densela-io: file formats for densela vectors and matrices
//!
//! Provides a unified ArrayCodec trait and implementations for
//! delimited text, the magic-tagged bincode format, and JSON.

pub mod serialization;
pub mod text;
pub mod traits;

pub use serialization::{BinaryCodec, JsonCodec, Payload, StoredArray};
pub use text::{Delimiter, TextCodec};
pub use traits::{codec_for_path, read_matrix, read_vector, ArrayCodec};
