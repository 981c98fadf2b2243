//! densela-linalg: dense vectors and matrices with LU and QR engines
//!
//! Owned, row-major `Vector` and `Matrix` types with bounds-checked
//! mutation, element-wise arithmetic and sample statistics, plus the
//! pivoted LU and Householder QR factorizations used for determinants,
//! inverses, linear solves and least-squares fitting.

pub mod buffer;
pub mod diagnostics;
pub mod error;
pub mod kernel;
pub mod lu;
pub mod matrix;
pub mod operand;
pub mod qr;
pub mod vector;

pub use buffer::RingBuffer;
pub use diagnostics::{kernel_diagnostics_enabled, set_kernel_diagnostics, KernelDiagnostics};
pub use error::{ErrorKind, LinalgError, Result};
pub use lu::LuDecomp;
pub use matrix::{Matrix, ProductRhs};
pub use operand::Operand;
pub use qr::QrDecomp;
pub use vector::Vector;
