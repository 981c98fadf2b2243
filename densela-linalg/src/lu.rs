//! LU decomposition with partial pivoting: P * A = L * U.

use tracing::debug;

use crate::error::{LinalgError, Result};
use crate::kernel;
use crate::matrix::Matrix;
use crate::vector::Vector;

/// Factorization of a square matrix, computed once at construction.
///
/// L (unit lower) and U are packed into a single `size x size` buffer.
/// Row `i` of `P * A` is row `permutation[i]` of the input matrix.
#[derive(Debug, Clone)]
pub struct LuDecomp {
    size: usize,
    packed: Vec<f64>,
    permutation: Vec<usize>,
    sign: i8,
}

impl LuDecomp {
    /// Factorize a copy of `a`. The input is left untouched.
    ///
    /// Zero pivots are not rejected here; they surface as
    /// [`LinalgError::SingularMatrix`] from [`solve`](Self::solve) and
    /// [`invert`](Self::invert). Small but nonzero pivots are solved through.
    pub fn new(a: &Matrix) -> Result<Self> {
        if !a.is_square() {
            return Err(LinalgError::argument(format!(
                "Argument must be a square Matrix, got {}x{}",
                a.rows(),
                a.cols()
            )));
        }
        let size = a.rows();
        let mut packed = kernel::alloc_zeroed(size * size)?;
        packed.copy_from_slice(a.as_slice());
        let mut permutation = vec![0; size];
        let sign = kernel::lu_decomp(&mut packed, size, &mut permutation)?;
        debug!(size, sign, "LU factorization complete");

        Ok(Self {
            size,
            packed,
            permutation,
            sign,
        })
    }

    /// Order of the factorized matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// +1 or -1, the parity of the row permutation.
    pub fn sign(&self) -> i8 {
        self.sign
    }

    /// Row order of `P * A`.
    pub fn permutation(&self) -> Vec<usize> {
        self.permutation.clone()
    }

    /// Copy of the packed L\U buffer.
    pub fn matrix(&self) -> Matrix {
        Matrix::from_parts(self.size, self.size, self.packed.clone())
    }

    /// `sign * prod(diag(U))`.
    pub fn determinant(&self) -> f64 {
        kernel::lu_det(&self.packed, self.size, self.sign)
    }

    /// Inverse of the input matrix.
    pub fn invert(&self) -> Result<Matrix> {
        let inv = kernel::lu_invert(&self.packed, self.size, &self.permutation)?;
        Ok(Matrix::from_parts(self.size, self.size, inv))
    }

    /// Solve `A x = b`.
    pub fn solve(&self, b: &Vector) -> Result<Vector> {
        if b.len() != self.size {
            return Err(LinalgError::argument(format!(
                "right-hand side must have length {}, got {}",
                self.size,
                b.len()
            )));
        }
        let x = kernel::lu_solve(&self.packed, self.size, &self.permutation, b.as_slice())?;
        debug!(size = self.size, "LU solve complete");
        Ok(Vector::from_vec_unchecked(x))
    }

    /// Split the packed buffer into L (unit diagonal) and U.
    pub fn unpack(&self) -> (Matrix, Matrix) {
        let n = self.size;
        let mut l = vec![0.0; n * n];
        let mut u = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                let v = self.packed[i * n + j];
                if j < i {
                    l[i * n + j] = v;
                } else {
                    u[i * n + j] = v;
                }
            }
            l[i * n + i] = 1.0;
        }
        (Matrix::from_parts(n, n, l), Matrix::from_parts(n, n, u))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn m(rows: &[&[f64]]) -> Matrix {
        let rows: Vec<Vec<f64>> = rows.iter().map(|r| r.to_vec()).collect();
        Matrix::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_solve_2x2() {
        let a = m(&[&[4.0, 3.0], &[6.0, 3.0]]);
        let lu = LuDecomp::new(&a).unwrap();
        let b = Vector::from_slice(&[1.0, 1.0]).unwrap();
        let x = lu.solve(&b).unwrap();
        assert!(x[0].abs() < 1e-12, "x[0] = {}", x[0]);
        assert!((x[1] - 1.0 / 3.0).abs() < 1e-12, "x[1] = {}", x[1]);
        assert!((lu.determinant() + 6.0).abs() < 1e-12);
        assert_eq!(lu.sign(), -1);
        assert_eq!(lu.permutation(), vec![1, 0]);
        assert_eq!(lu.size(), 2);
    }

    #[test]
    fn test_input_untouched() {
        let a = m(&[&[4.0, 3.0], &[6.0, 3.0]]);
        let copy = a.clone();
        let _lu = LuDecomp::new(&a).unwrap();
        assert_eq!(a, copy);
    }

    #[test]
    fn test_rejects_non_square() {
        let a = Matrix::new(2, 3).unwrap();
        let err = LuDecomp::new(&a).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);
    }

    #[test]
    fn test_solve_wrong_length() {
        let lu = LuDecomp::new(&Matrix::identity(3).unwrap()).unwrap();
        let b = Vector::from_slice(&[1.0, 2.0]).unwrap();
        assert_eq!(lu.solve(&b).unwrap_err().kind(), ErrorKind::Argument);
    }

    #[test]
    fn test_singular() {
        let a = m(&[&[1.0, 2.0], &[2.0, 4.0]]);
        let lu = LuDecomp::new(&a).unwrap();
        assert!(lu.determinant().abs() < 1e-12);
        let b = Vector::from_slice(&[1.0, 1.0]).unwrap();
        assert_eq!(lu.solve(&b).unwrap_err(), LinalgError::SingularMatrix);
        assert_eq!(lu.invert().unwrap_err(), LinalgError::SingularMatrix);
    }

    #[test]
    fn test_badly_scaled_is_not_singular() {
        let a = m(&[&[1e17, 0.0], &[0.0, 1.0]]);
        let lu = LuDecomp::new(&a).unwrap();
        assert_eq!(lu.determinant(), 1e17);
        let x = lu.solve(&Vector::from_slice(&[1e17, 2.0]).unwrap()).unwrap();
        assert_eq!(x.as_slice(), &[1.0, 2.0]);
        let inv = lu.invert().unwrap();
        assert_eq!(inv.get(0, 0).unwrap(), 1e-17);
        assert_eq!(inv.get(1, 1).unwrap(), 1.0);
    }

    #[test]
    fn test_zero_matrix_is_singular() {
        let lu = LuDecomp::new(&Matrix::new(3, 3).unwrap()).unwrap();
        assert_eq!(lu.determinant(), 0.0);
        assert_eq!(lu.invert().unwrap_err().kind(), ErrorKind::SingularMatrix);
    }

    #[test]
    fn test_invert_3x3() {
        let a = m(&[&[2.0, -1.0, 0.0], &[-1.0, 2.0, -1.0], &[0.0, -1.0, 2.0]]);
        let inv = LuDecomp::new(&a).unwrap().invert().unwrap();
        let prod = a.matmul(&inv).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(
                    (prod.get(i, j).unwrap() - expected).abs() < 1e-12,
                    "A * inv(A) at ({}, {}) = {}",
                    i,
                    j,
                    prod.get(i, j).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_unpack_reconstructs_permuted_input() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 10.0]]);
        let lu = LuDecomp::new(&a).unwrap();
        let (l, u) = lu.unpack();
        let lu_prod = l.matmul(&u).unwrap();
        let perm = lu.permutation();
        for i in 0..3 {
            assert_eq!(l.get(i, i).unwrap(), 1.0);
            for j in 0..3 {
                if j > i {
                    assert_eq!(l.get(i, j).unwrap(), 0.0);
                }
                if j < i {
                    assert_eq!(u.get(i, j).unwrap(), 0.0);
                }
                let pa = a.get(perm[i], j).unwrap();
                assert!((lu_prod.get(i, j).unwrap() - pa).abs() < 1e-12);
            }
        }
        assert!((lu.determinant() - (-3.0)).abs() < 1e-10);
    }

    #[test]
    fn test_one_by_one() {
        let a = Matrix::from_rows(&[vec![5.0]]).unwrap();
        let lu = LuDecomp::new(&a).unwrap();
        assert_eq!(lu.determinant(), 5.0);
        let x = lu.solve(&Vector::from_slice(&[10.0]).unwrap()).unwrap();
        assert!((x[0] - 2.0).abs() < 1e-15);
        assert!((lu.invert().unwrap().get(0, 0).unwrap() - 0.2).abs() < 1e-15);
    }
}
