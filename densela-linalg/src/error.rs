//! Error taxonomy for the numeric core.
//!
//! Every fallible operation returns [`LinalgError`]. Hosts that need a
//! stable, named classification (exception class, exit code) go through
//! [`LinalgError::kind`].

use thiserror::Error;

use crate::kernel::KernelError;

pub type Result<T> = std::result::Result<T, LinalgError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    #[error("could not allocate storage for {requested} elements")]
    Allocation { requested: usize },

    #[error("{0}")]
    Argument(String),

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("index {index} out of range for extent {extent}")]
    IndexOutOfRange { index: usize, extent: usize },

    #[error("{0}")]
    Shape(String),

    #[error("{value} is outside the interval [{lo}, {hi}]")]
    OutOfRange { value: f64, lo: f64, hi: f64 },

    #[error("Singular matrix encountered")]
    SingularMatrix,

    #[error("numeric kernel failure: {0}")]
    Computation(String),
}

/// Named error kinds, one per failure class a host must distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Allocation,
    Argument,
    Dimension,
    Index,
    Shape,
    Range,
    SingularMatrix,
    Computation,
}

impl ErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Allocation => "AllocationError",
            ErrorKind::Argument => "ArgumentError",
            ErrorKind::Dimension => "DimensionError",
            ErrorKind::Index => "IndexError",
            ErrorKind::Shape => "ShapeError",
            ErrorKind::Range => "RangeError",
            ErrorKind::SingularMatrix => "SingularMatrixError",
            ErrorKind::Computation => "ComputationError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl LinalgError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LinalgError::Allocation { .. } => ErrorKind::Allocation,
            LinalgError::Argument(_) => ErrorKind::Argument,
            LinalgError::DimensionMismatch { .. } => ErrorKind::Dimension,
            LinalgError::IndexOutOfRange { .. } => ErrorKind::Index,
            LinalgError::Shape(_) => ErrorKind::Shape,
            LinalgError::OutOfRange { .. } => ErrorKind::Range,
            LinalgError::SingularMatrix => ErrorKind::SingularMatrix,
            LinalgError::Computation(_) => ErrorKind::Computation,
        }
    }

    pub(crate) fn argument(msg: impl Into<String>) -> Self {
        LinalgError::Argument(msg.into())
    }

    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        LinalgError::Shape(msg.into())
    }

    /// Bounds check shared by every indexed accessor.
    pub(crate) fn check_index(index: usize, extent: usize) -> Result<()> {
        if index >= extent {
            return Err(LinalgError::IndexOutOfRange { index, extent });
        }
        Ok(())
    }

    pub(crate) fn check_len(expected: usize, got: usize) -> Result<()> {
        if expected != got {
            return Err(LinalgError::DimensionMismatch { expected, got });
        }
        Ok(())
    }
}

/// Kernel status codes are never exposed directly. Singular pivots and
/// allocation failures keep their own kind; everything else the kernel
/// rejects becomes a computation failure.
impl From<KernelError> for LinalgError {
    fn from(err: KernelError) -> Self {
        crate::diagnostics::forward(&err);
        match err {
            KernelError::Singular { .. } => LinalgError::SingularMatrix,
            KernelError::NoMemory { requested } => LinalgError::Allocation { requested },
            other => LinalgError::Computation(other.to_string()),
        }
    }
}
