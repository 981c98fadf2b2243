//! Householder QR decomposition: A = Q * R.

use tracing::debug;

use crate::error::{LinalgError, Result};
use crate::kernel;
use crate::matrix::Matrix;
use crate::vector::Vector;

/// QR factorization of a `rows x cols` matrix of any shape.
///
/// The packed buffer holds R on and above the diagonal and the Householder
/// vectors below it; `tau` holds one coefficient per reflector.
#[derive(Debug, Clone)]
pub struct QrDecomp {
    rows: usize,
    cols: usize,
    minsize: usize,
    packed: Vec<f64>,
    tau: Vec<f64>,
    residuals: Option<Vector>,
}

impl QrDecomp {
    /// Factorize a copy of `a`.
    pub fn new(a: &Matrix) -> Result<Self> {
        let (rows, cols) = a.shape();
        let minsize = rows.min(cols);
        let mut packed = kernel::alloc_zeroed(rows * cols)?;
        packed.copy_from_slice(a.as_slice());
        let mut tau = kernel::alloc_zeroed(minsize)?;
        kernel::qr_decomp(&mut packed, rows, cols, &mut tau)?;
        debug!(rows, cols, "QR factorization complete");

        Ok(Self {
            rows,
            cols,
            minsize,
            packed,
            tau,
            residuals: None,
        })
    }

    /// Copy of the packed factorization, shaped like the input.
    pub fn matrix(&self) -> Matrix {
        Matrix::from_parts(self.rows, self.cols, self.packed.clone())
    }

    /// Copy of the reflector coefficients (length `minsize`).
    pub fn tau(&self) -> Vector {
        Vector::from_vec_unchecked(self.tau.clone())
    }

    /// `A x - b` from the last [`lssolve`](Self::lssolve); `None` after
    /// construction or a plain [`solve`](Self::solve).
    pub fn residuals(&self) -> Option<&Vector> {
        self.residuals.as_ref()
    }

    /// Rows of the factorized matrix.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Columns of the factorized matrix.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Alias of [`rows`](Self::rows).
    pub fn size1(&self) -> usize {
        self.rows
    }

    /// Alias of [`cols`](Self::cols).
    pub fn size2(&self) -> usize {
        self.cols
    }

    /// `min(rows, cols)`, the number of reflectors.
    pub fn minsize(&self) -> usize {
        self.minsize
    }

    fn check_rhs(&self, b: &Vector) -> Result<()> {
        if b.len() != self.rows {
            return Err(LinalgError::argument(format!(
                "right-hand side must have length {}, got {}",
                self.rows,
                b.len()
            )));
        }
        Ok(())
    }

    /// Solve the square system `A x = b`. Clears any stored residuals.
    pub fn solve(&mut self, b: &Vector) -> Result<Vector> {
        if self.rows != self.cols {
            return Err(LinalgError::shape("matrix must be square"));
        }
        self.check_rhs(b)?;
        self.residuals = None;
        let x = kernel::qr_solve(&self.packed, self.rows, &self.tau, b.as_slice())?;
        debug!(size = self.rows, "QR solve complete");
        Ok(Vector::from_vec_unchecked(x))
    }

    /// Least-squares solution of the over-determined system `A x ~ b`.
    /// The residual vector becomes available through
    /// [`residuals`](Self::residuals).
    pub fn lssolve(&mut self, b: &Vector) -> Result<Vector> {
        if self.rows <= self.cols {
            return Err(LinalgError::shape("matrix must have more rows than columns"));
        }
        self.check_rhs(b)?;
        let (x, residual) =
            kernel::qr_lssolve(&self.packed, self.rows, self.cols, &self.tau, b.as_slice())?;
        self.residuals = Some(Vector::from_vec_unchecked(residual));
        debug!(rows = self.rows, cols = self.cols, "QR least-squares solve complete");
        Ok(Vector::from_vec_unchecked(x))
    }

    /// Expand into the full orthogonal Q (`rows x rows`) and the
    /// upper-trapezoidal R (`rows x cols`).
    pub fn unpack(&self) -> Result<(Matrix, Matrix)> {
        let (q, r) = kernel::qr_unpack(&self.packed, self.rows, self.cols, &self.tau)?;
        Ok((
            Matrix::from_parts(self.rows, self.rows, q),
            Matrix::from_parts(self.rows, self.cols, r),
        ))
    }
}
