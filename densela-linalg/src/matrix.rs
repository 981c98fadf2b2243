#![allow(clippy::needless_range_loop)]
//! Dense row-major matrix of doubles.
//!
//! The matrix-matrix product is delegated to faer; everything else runs on
//! the owned row-major buffer through the crate kernel.

use std::fmt;
use std::ops::Index;

use faer::Mat;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{LinalgError, Result};
use crate::kernel;
use crate::lu::LuDecomp;
use crate::operand::Operand;
use crate::qr::QrDecomp;
use crate::vector::Vector;

/// A dense `rows x cols` matrix, both dimensions positive and fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MatrixRepr", into = "MatrixRepr")]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
struct MatrixRepr {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl TryFrom<MatrixRepr> for Matrix {
    type Error = LinalgError;

    fn try_from(repr: MatrixRepr) -> Result<Self> {
        let len = Matrix::checked_len(repr.rows, repr.cols)?;
        LinalgError::check_len(len, repr.data.len())?;
        Ok(Matrix::from_parts(repr.rows, repr.cols, repr.data))
    }
}

impl From<Matrix> for MatrixRepr {
    fn from(m: Matrix) -> Self {
        MatrixRepr {
            rows: m.rows,
            cols: m.cols,
            data: m.data,
        }
    }
}

/// Right-hand sides accepted by [`Matrix::matrix_product`].
pub trait ProductRhs {
    type Output;

    fn left_multiply(&self, lhs: &Matrix) -> Result<Self::Output>;
}

impl ProductRhs for Matrix {
    type Output = Matrix;

    fn left_multiply(&self, lhs: &Matrix) -> Result<Matrix> {
        lhs.matmul(self)
    }
}

impl ProductRhs for Vector {
    type Output = Vector;

    fn left_multiply(&self, lhs: &Matrix) -> Result<Vector> {
        lhs.matvec(self)
    }
}

impl Matrix {
    fn check_shape(rows: usize, cols: usize) -> Result<()> {
        if rows == 0 || cols == 0 {
            return Err(LinalgError::argument(format!(
                "matrix dimensions must be positive, got {}x{}",
                rows, cols
            )));
        }
        Ok(())
    }

    /// Element count for a valid shape; overflow is an allocation failure.
    fn checked_len(rows: usize, cols: usize) -> Result<usize> {
        Self::check_shape(rows, cols)?;
        rows.checked_mul(cols)
            .ok_or(LinalgError::Allocation { requested: usize::MAX })
    }

    /// Create a zero-filled matrix.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let len = Self::checked_len(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            data: kernel::alloc_zeroed(len)?,
        })
    }

    /// Create a matrix from a flat slice in row-major order.
    pub fn from_row_major(rows: usize, cols: usize, data: &[f64]) -> Result<Self> {
        let mut m = Self::new(rows, cols)?;
        LinalgError::check_len(rows * cols, data.len())?;
        m.data.copy_from_slice(data);
        Ok(m)
    }

    /// Create a matrix from a list of equally long rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let ncols = rows.first().map_or(0, |r| r.len());
        let mut m = Self::new(rows.len(), ncols)?;
        for (i, row) in rows.iter().enumerate() {
            LinalgError::check_len(ncols, row.len())?;
            m.data[i * ncols..(i + 1) * ncols].copy_from_slice(row);
        }
        Ok(m)
    }

    /// Create an `n x n` identity matrix.
    pub fn identity(n: usize) -> Result<Self> {
        let mut m = Self::new(n, n)?;
        m.fill_identity();
        Ok(m)
    }

    pub(crate) fn from_parts(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        debug_assert!(rows > 0 && cols > 0 && data.len() == rows * cols);
        Self { rows, cols, data }
    }

    /// Copy into a faer matrix.
    pub fn to_faer(&self) -> Mat<f64> {
        Mat::from_fn(self.rows, self.cols, |i, j| self.data[i * self.cols + j])
    }

    /// Copy out of a faer matrix.
    pub fn from_faer(mat: &Mat<f64>) -> Result<Self> {
        let mut m = Self::new(mat.nrows(), mat.ncols())?;
        for i in 0..m.rows {
            for j in 0..m.cols {
                m.data[i * m.cols + j] = mat.read(i, j);
            }
        }
        Ok(m)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Whether `rows == cols`.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Borrow the row-major buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutably borrow the row-major buffer.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Elements in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.data.iter()
    }

    /// Copy out as a list of rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.cols).map(|r| r.to_vec()).collect()
    }

    fn check_cell(&self, i: usize, j: usize) -> Result<()> {
        LinalgError::check_index(i, self.rows)?;
        LinalgError::check_index(j, self.cols)
    }

    /// Get element at (row, col).
    pub fn get(&self, i: usize, j: usize) -> Result<f64> {
        self.check_cell(i, j)?;
        Ok(self.data[i * self.cols + j])
    }

    /// Set element at (row, col).
    pub fn set(&mut self, i: usize, j: usize, value: f64) -> Result<()> {
        self.check_cell(i, j)?;
        self.data[i * self.cols + j] = value;
        Ok(())
    }

    /// Copy of row `i`.
    pub fn get_row(&self, i: usize) -> Result<Vector> {
        LinalgError::check_index(i, self.rows)?;
        Ok(Vector::from_vec_unchecked(
            self.data[i * self.cols..(i + 1) * self.cols].to_vec(),
        ))
    }

    /// Copy of column `j`.
    pub fn get_column(&self, j: usize) -> Result<Vector> {
        LinalgError::check_index(j, self.cols)?;
        let col = (0..self.rows).map(|i| self.data[i * self.cols + j]).collect();
        Ok(Vector::from_vec_unchecked(col))
    }

    /// Overwrite row `i`.
    pub fn set_row(&mut self, i: usize, row: &Vector) -> Result<&mut Self> {
        LinalgError::check_index(i, self.rows)?;
        LinalgError::check_len(self.cols, row.len())?;
        self.data[i * self.cols..(i + 1) * self.cols].copy_from_slice(row.as_slice());
        Ok(self)
    }

    /// Overwrite column `j`.
    pub fn set_column(&mut self, j: usize, col: &Vector) -> Result<&mut Self> {
        LinalgError::check_index(j, self.cols)?;
        LinalgError::check_len(self.rows, col.len())?;
        for (i, &v) in col.iter().enumerate() {
            self.data[i * self.cols + j] = v;
        }
        Ok(self)
    }

    /// Rows as vector copies, with their index.
    pub fn row_iter(&self) -> impl Iterator<Item = (usize, Vector)> + '_ {
        self.data
            .chunks(self.cols)
            .map(|r| Vector::from_vec_unchecked(r.to_vec()))
            .enumerate()
    }

    /// Columns as vector copies, with their index.
    pub fn column_iter(&self) -> impl Iterator<Item = (usize, Vector)> + '_ {
        (0..self.cols).map(move |j| {
            let col = (0..self.rows).map(|i| self.data[i * self.cols + j]).collect();
            (j, Vector::from_vec_unchecked(col))
        })
    }

    /// Set every element to `value`.
    pub fn fill_all(&mut self, value: f64) -> &mut Self {
        self.data.fill(value);
        self
    }

    /// Set every element to zero.
    pub fn fill_zero(&mut self) -> &mut Self {
        self.fill_all(0.0)
    }

    /// Ones on the leading diagonal (`min(rows, cols)` entries), zeros elsewhere.
    pub fn fill_identity(&mut self) -> &mut Self {
        self.data.fill(0.0);
        for i in 0..self.rows.min(self.cols) {
            self.data[i * self.cols + i] = 1.0;
        }
        self
    }

    /// Uniform samples on `[0, 1)`.
    pub fn fill_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &mut Self {
        for v in self.data.iter_mut() {
            *v = rng.gen::<f64>();
        }
        self
    }

    /// Apply `f` to every element.
    pub fn map_in_place(&mut self, f: impl Fn(f64) -> f64) -> &mut Self {
        for v in self.data.iter_mut() {
            *v = f(*v);
        }
        self
    }

    /// Independent deep copy.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    fn check_same_shape(&self, other: &Matrix) -> Result<()> {
        LinalgError::check_len(self.rows, other.rows)?;
        LinalgError::check_len(self.cols, other.cols)
    }

    /// Exact element-wise comparison of two matrices of identical shape.
    pub fn equals(&self, other: &Matrix) -> Result<bool> {
        self.check_same_shape(other)?;
        Ok(self.data == other.data)
    }

    fn zip_with(&mut self, other: &Matrix, f: impl Fn(f64, f64) -> f64) -> Result<&mut Self> {
        self.check_same_shape(other)?;
        for (a, &b) in self.data.iter_mut().zip(other.data.iter()) {
            *a = f(*a, b);
        }
        Ok(self)
    }

    /// Element-wise sum with a matrix, or add a constant to every element.
    pub fn add<'a>(&mut self, rhs: impl Into<Operand<'a, Matrix>>) -> Result<&mut Self> {
        match rhs.into() {
            Operand::Scalar(offset) => Ok(self.add_scalar(offset)),
            Operand::Array(other) => self.zip_with(other, |a, b| a + b),
        }
    }

    /// Element-wise difference.
    pub fn subtract(&mut self, other: &Matrix) -> Result<&mut Self> {
        self.zip_with(other, |a, b| a - b)
    }

    /// Element-wise product with a matrix, or uniform scaling by a scalar.
    pub fn multiply_elementwise<'a>(
        &mut self,
        rhs: impl Into<Operand<'a, Matrix>>,
    ) -> Result<&mut Self> {
        match rhs.into() {
            Operand::Scalar(factor) => Ok(self.scale(factor)),
            Operand::Array(other) => self.zip_with(other, |a, b| a * b),
        }
    }

    /// Element-wise quotient.
    pub fn divide_elementwise(&mut self, other: &Matrix) -> Result<&mut Self> {
        self.zip_with(other, |a, b| a / b)
    }

    /// Multiply every element by `factor`.
    pub fn scale(&mut self, factor: f64) -> &mut Self {
        self.data.iter_mut().for_each(|v| *v *= factor);
        self
    }

    /// Add `offset` to every element.
    pub fn add_scalar(&mut self, offset: f64) -> &mut Self {
        self.data.iter_mut().for_each(|v| *v += offset);
        self
    }

    /// New matrix holding `self + rhs`.
    pub fn added<'a>(&self, rhs: impl Into<Operand<'a, Matrix>>) -> Result<Matrix> {
        let mut out = self.duplicate();
        out.add(rhs)?;
        Ok(out)
    }

    /// New matrix holding `self - other`.
    pub fn subtracted(&self, other: &Matrix) -> Result<Matrix> {
        let mut out = self.duplicate();
        out.subtract(other)?;
        Ok(out)
    }

    /// New matrix holding `self * rhs`, element-wise.
    pub fn multiplied<'a>(&self, rhs: impl Into<Operand<'a, Matrix>>) -> Result<Matrix> {
        let mut out = self.duplicate();
        out.multiply_elementwise(rhs)?;
        Ok(out)
    }

    /// New matrix holding `self / other`, element-wise.
    pub fn divided(&self, other: &Matrix) -> Result<Matrix> {
        let mut out = self.duplicate();
        out.divide_elementwise(other)?;
        Ok(out)
    }

    /// Transpose a square matrix in place.
    pub fn transpose_in_place(&mut self) -> Result<&mut Self> {
        if !self.is_square() {
            return Err(LinalgError::shape(format!(
                "in-place transpose requires a square matrix, got {}x{}",
                self.rows, self.cols
            )));
        }
        kernel::transpose_in_place(&mut self.data, self.rows, self.cols)?;
        Ok(self)
    }

    /// New `cols x rows` matrix.
    pub fn transpose(&self) -> Result<Matrix> {
        let data = kernel::transpose_copy(&self.data, self.rows, self.cols)?;
        Ok(Matrix::from_parts(self.cols, self.rows, data))
    }

    /// Swap two rows. Invalid indices are a kernel failure.
    pub fn swap_rows(&mut self, i: usize, j: usize) -> Result<&mut Self> {
        kernel::swap_rows(&mut self.data, self.rows, self.cols, i, j)?;
        Ok(self)
    }

    /// Swap two columns. Invalid indices are a kernel failure.
    pub fn swap_columns(&mut self, i: usize, j: usize) -> Result<&mut Self> {
        kernel::swap_columns(&mut self.data, self.rows, self.cols, i, j)?;
        Ok(self)
    }

    /// Matrix-matrix product: self * other.
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix> {
        LinalgError::check_len(self.cols, other.rows)?;
        let result = &self.to_faer() * &other.to_faer();
        Matrix::from_faer(&result)
    }

    /// Matrix-vector product: self * v.
    pub fn matvec(&self, v: &Vector) -> Result<Vector> {
        LinalgError::check_len(self.cols, v.len())?;
        let y = kernel::gemv(&self.data, self.rows, self.cols, v.as_slice())?;
        Ok(Vector::from_vec_unchecked(y))
    }

    /// Product with either a matrix or a vector; the output type follows
    /// the right-hand side.
    pub fn matrix_product<R: ProductRhs + ?Sized>(&self, rhs: &R) -> Result<R::Output> {
        rhs.left_multiply(self)
    }

    /// Largest element.
    pub fn max(&self) -> f64 {
        self.data[kernel::max_index(&self.data)]
    }

    /// Smallest element.
    pub fn min(&self) -> f64 {
        self.data[kernel::min_index(&self.data)]
    }

    /// `(row, col)` of the largest element, first in row-major order.
    pub fn max_index(&self) -> (usize, usize) {
        let k = kernel::max_index(&self.data);
        (k / self.cols, k % self.cols)
    }

    /// `(row, col)` of the smallest element, first in row-major order.
    pub fn min_index(&self) -> (usize, usize) {
        let k = kernel::min_index(&self.data);
        (k / self.cols, k % self.cols)
    }

    /// LU-factorize a copy of this matrix.
    pub fn lu(&self) -> Result<LuDecomp> {
        LuDecomp::new(self)
    }

    /// Determinant via LU.
    pub fn det(&self) -> Result<f64> {
        Ok(self.lu()?.determinant())
    }

    /// Inverse via LU.
    pub fn inv(&self) -> Result<Matrix> {
        self.lu()?.invert()
    }

    /// QR-factorize a copy of this matrix.
    pub fn qr(&self) -> Result<QrDecomp> {
        QrDecomp::new(self)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        assert!(i < self.rows && j < self.cols, "index ({}, {}) out of range", i, j);
        &self.data[i * self.cols + j]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(6);
        for i in 0..self.rows {
            for j in 0..self.cols {
                if j > 0 {
                    write!(f, "\t")?;
                }
                write!(f, "{:.*}", precision, self.data[i * self.cols + j])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
