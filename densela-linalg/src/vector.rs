//! Dense vector of doubles.
//!
//! A `Vector` exclusively owns a contiguous, non-empty buffer whose length
//! is fixed at construction. Arithmetic mutates the receiver in place and
//! returns it for chaining; every check runs before the first write, so a
//! failed call leaves the vector untouched.

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{LinalgError, Result};
use crate::kernel;
use crate::matrix::Matrix;
use crate::operand::Operand;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    /// Create a zero-filled vector of `len` elements.
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(LinalgError::argument("vector length must be positive"));
        }
        Ok(Self {
            data: kernel::alloc_zeroed(len)?,
        })
    }

    /// Create a vector holding a copy of `values`.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        let mut v = Self::new(values.len())?;
        v.data.copy_from_slice(values);
        Ok(v)
    }

    pub(crate) fn from_vec_unchecked(data: Vec<f64>) -> Self {
        debug_assert!(!data.is_empty());
        Self { data }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false for a constructed vector.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the elements.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutably borrow the elements.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Iterate over the elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.data.iter()
    }

    /// Copy the elements into a `Vec`.
    pub fn to_vec(&self) -> Vec<f64> {
        self.data.clone()
    }

    /// Consuming snapshot of the current values, e.g. for export to a host array.
    pub fn to_sequence(&self) -> std::vec::IntoIter<f64> {
        self.data.clone().into_iter()
    }

    /// Get element `i`.
    pub fn get(&self, i: usize) -> Result<f64> {
        LinalgError::check_index(i, self.len())?;
        Ok(self.data[i])
    }

    /// Set element `i`.
    pub fn set(&mut self, i: usize, value: f64) -> Result<()> {
        LinalgError::check_index(i, self.len())?;
        self.data[i] = value;
        Ok(())
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

    /// Unit basis vector: 1 at `i`, 0 elsewhere.
    pub fn fill_basis(&mut self, i: usize) -> Result<&mut Self> {
        LinalgError::check_index(i, self.len())?;
        self.data.fill(0.0);
        self.data[i] = 1.0;
        Ok(self)
    }

    /// Independent deep copy.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Exact element-wise comparison. Vectors of different length are not
    /// comparable.
    pub fn equals(&self, other: &Vector) -> Result<bool> {
        LinalgError::check_len(self.len(), other.len())?;
        Ok(self.data == other.data)
    }

    fn zip_with(&mut self, other: &Vector, f: impl Fn(f64, f64) -> f64) -> Result<&mut Self> {
        LinalgError::check_len(self.len(), other.len())?;
        for (a, &b) in self.data.iter_mut().zip(other.data.iter()) {
            *a = f(*a, b);
        }
        Ok(self)
    }

    /// Element-wise sum with a vector, or add a constant to every element.
    pub fn add<'a>(&mut self, rhs: impl Into<Operand<'a, Vector>>) -> Result<&mut Self> {
        match rhs.into() {
            Operand::Scalar(offset) => Ok(self.add_scalar(offset)),
            Operand::Array(other) => self.zip_with(other, |a, b| a + b),
        }
    }

    /// Element-wise difference.
    pub fn subtract(&mut self, other: &Vector) -> Result<&mut Self> {
        self.zip_with(other, |a, b| a - b)
    }

    /// Element-wise product with a vector, or uniform scaling by a scalar.
    pub fn multiply_elementwise<'a>(
        &mut self,
        rhs: impl Into<Operand<'a, Vector>>,
    ) -> Result<&mut Self> {
        match rhs.into() {
            Operand::Scalar(factor) => Ok(self.scale(factor)),
            Operand::Array(other) => self.zip_with(other, |a, b| a * b),
        }
    }

    /// Element-wise quotient.
    pub fn divide_elementwise(&mut self, other: &Vector) -> Result<&mut Self> {
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

    // Non-mutating forms: duplicate, then apply.

    /// New vector holding `self + rhs`.
    pub fn added<'a>(&self, rhs: impl Into<Operand<'a, Vector>>) -> Result<Vector> {
        let mut out = self.duplicate();
        out.add(rhs)?;
        Ok(out)
    }

    /// New vector holding `self - other`.
    pub fn subtracted(&self, other: &Vector) -> Result<Vector> {
        let mut out = self.duplicate();
        out.subtract(other)?;
        Ok(out)
    }

    /// New vector holding `self * rhs`, element-wise.
    pub fn multiplied<'a>(&self, rhs: impl Into<Operand<'a, Vector>>) -> Result<Vector> {
        let mut out = self.duplicate();
        out.multiply_elementwise(rhs)?;
        Ok(out)
    }

    /// New vector holding `self / other`, element-wise.
    pub fn divided(&self, other: &Vector) -> Result<Vector> {
        let mut out = self.duplicate();
        out.divide_elementwise(other)?;
        Ok(out)
    }

    /// Inner product with a vector of the same length.
    pub fn dot_product(&self, other: &Vector) -> Result<f64> {
        LinalgError::check_len(self.len(), other.len())?;
        Ok(kernel::dot(&self.data, &other.data)?)
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        kernel::nrm2(&self.data)
    }

    /// Sum of absolute values.
    pub fn sum(&self) -> f64 {
        kernel::asum(&self.data)
    }

    /// Arithmetic mean.
    pub fn mean(&self) -> f64 {
        statrs::statistics::Statistics::mean(self.data.iter())
    }

    /// Sample variance. With `mean` supplied, deviations are taken about it
    /// instead of the recomputed mean.
    pub fn variance(&self, mean: Option<f64>) -> f64 {
        match mean {
            Some(m) => kernel::variance_m(&self.data, m),
            None => statrs::statistics::Statistics::variance(self.data.iter()),
        }
    }

    /// Square root of [`variance`](Self::variance).
    pub fn standard_deviation(&self, mean: Option<f64>) -> f64 {
        match mean {
            Some(m) => kernel::variance_m(&self.data, m).sqrt(),
            None => statrs::statistics::Statistics::std_dev(self.data.iter()),
        }
    }

    /// Mean absolute deviation about `mean`, or about the computed mean.
    pub fn mean_absolute_deviation(&self, mean: Option<f64>) -> f64 {
        let m = mean.unwrap_or_else(|| self.mean());
        kernel::absdev_m(&self.data, m)
    }

    /// Quantile `p` in `[0, 1]` by linear interpolation; the median when `p`
    /// is omitted. The receiver is not reordered.
    pub fn quantile(&self, p: impl Into<Option<f64>>) -> Result<f64> {
        let p = p.into().unwrap_or(0.5);
        if !(0.0..=1.0).contains(&p) {
            return Err(LinalgError::OutOfRange { value: p, lo: 0.0, hi: 1.0 });
        }
        let mut sorted = self.data.clone();
        sorted.sort_by(f64::total_cmp);
        Ok(kernel::quantile_sorted(&sorted, p))
    }

    /// The 0.5 quantile.
    pub fn median(&self) -> f64 {
        let mut sorted = self.data.clone();
        sorted.sort_by(f64::total_cmp);
        kernel::quantile_sorted(&sorted, 0.5)
    }

    /// Largest element.
    pub fn max(&self) -> f64 {
        self.data[self.max_index()]
    }

    /// Smallest element.
    pub fn min(&self) -> f64 {
        self.data[self.min_index()]
    }

    /// Index of the first largest element.
    pub fn max_index(&self) -> usize {
        kernel::max_index(&self.data)
    }

    /// Index of the first smallest element.
    pub fn min_index(&self) -> usize {
        kernel::min_index(&self.data)
    }

    /// Exchange elements `i` and `j`.
    pub fn swap_elements(&mut self, i: usize, j: usize) -> Result<&mut Self> {
        LinalgError::check_index(i, self.len())?;
        LinalgError::check_index(j, self.len())?;
        kernel::swap_elements(&mut self.data, i, j)?;
        Ok(self)
    }

    /// Reverse the element order.
    pub fn reverse_in_place(&mut self) -> &mut Self {
        self.data.reverse();
        self
    }

    /// `len x 1` column matrix.
    pub fn to_matrix(&self) -> Matrix {
        Matrix::from_parts(self.len(), 1, self.data.clone())
    }

    /// `1 x len` row matrix.
    pub fn transpose(&self) -> Matrix {
        Matrix::from_parts(1, self.len(), self.data.clone())
    }
}

impl TryFrom<Vec<f64>> for Vector {
    type Error = LinalgError;

    fn try_from(data: Vec<f64>) -> Result<Self> {
        if data.is_empty() {
            return Err(LinalgError::argument("vector length must be positive"));
        }
        Ok(Self { data })
    }
}

impl From<Vector> for Vec<f64> {
    fn from(v: Vector) -> Self {
        v.data
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.data[i]
    }
}

impl<'a> IntoIterator for &'a Vector {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(6);
        for v in &self.data {
            writeln!(f, "{:.*}", precision, v)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn v(values: &[f64]) -> Vector {
        Vector::from_slice(values).unwrap()
    }

    #[test]
    fn test_new_zero_filled() {
        let x = Vector::new(4).unwrap();
        assert_eq!(x.len(), 4);
        assert!(x.iter().all(|&e| e == 0.0));
    }

    #[test]
    fn test_new_rejects_zero_length() {
        let err = Vector::new(0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);
        assert!(Vector::try_from(Vec::new()).is_err());
    }

    #[test]
    fn test_get_set_bounds() {
        let mut x = Vector::new(3).unwrap();
        x.set(1, 2.5).unwrap();
        assert_eq!(x.get(1).unwrap(), 2.5);
        assert_eq!(x[1], 2.5);
        assert_eq!(
            x.get(3),
            Err(LinalgError::IndexOutOfRange { index: 3, extent: 3 })
        );
        assert_eq!(x.set(5, 1.0).unwrap_err().kind(), ErrorKind::Index);
    }

    #[test]
    fn test_fills() {
        let mut x = Vector::new(3).unwrap();
        x.fill_all(7.0);
        assert_eq!(x.as_slice(), &[7.0, 7.0, 7.0]);
        x.fill_basis(2).unwrap();
        assert_eq!(x.as_slice(), &[0.0, 0.0, 1.0]);
        assert_eq!(x.fill_basis(3).unwrap_err().kind(), ErrorKind::Index);
        // Failed basis fill leaves the vector alone.
        assert_eq!(x.as_slice(), &[0.0, 0.0, 1.0]);
        x.fill_zero();
        assert_eq!(x.as_slice(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_equals() {
        let a = v(&[1.0, 2.0, 3.0]);
        assert!(a.equals(&a.duplicate()).unwrap());
        assert!(!a.equals(&v(&[1.0, 2.0, 3.5])).unwrap());
        assert_eq!(
            a.equals(&v(&[1.0, 2.0])),
            Err(LinalgError::DimensionMismatch { expected: 3, got: 2 })
        );
    }

    #[test]
    fn test_arithmetic_in_place() {
        let mut a = v(&[1.0, 2.0, 3.0]);
        let b = v(&[3.0, 2.0, 1.0]);
        a.add(&b).unwrap();
        assert_eq!(a.as_slice(), &[4.0, 4.0, 4.0]);
        a.subtract(&b).unwrap();
        assert_eq!(a.as_slice(), &[1.0, 2.0, 3.0]);
        a.multiply_elementwise(&b).unwrap();
        assert_eq!(a.as_slice(), &[3.0, 4.0, 3.0]);
        a.divide_elementwise(&b).unwrap();
        assert_eq!(a.as_slice(), &[1.0, 2.0, 3.0]);
        a.add(1.0).unwrap().multiply_elementwise(2.0).unwrap();
        assert_eq!(a.as_slice(), &[4.0, 6.0, 8.0]);
        a.scale(0.5).add_scalar(-1.0);
        assert_eq!(a.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_arithmetic_mismatch_leaves_receiver() {
        let mut a = v(&[1.0, 2.0, 3.0]);
        let short = v(&[1.0, 1.0]);
        assert_eq!(a.add(&short).unwrap_err().kind(), ErrorKind::Dimension);
        assert_eq!(a.subtract(&short).unwrap_err().kind(), ErrorKind::Dimension);
        assert_eq!(a.divide_elementwise(&short).unwrap_err().kind(), ErrorKind::Dimension);
        assert_eq!(a.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_non_mutating_forms() {
        let a = v(&[1.0, 2.0, 3.0]);
        let b = v(&[3.0, 2.0, 1.0]);
        assert_eq!(a.multiplied(&b).unwrap().as_slice(), &[3.0, 4.0, 3.0]);
        assert_eq!(a.added(10.0).unwrap().as_slice(), &[11.0, 12.0, 13.0]);
        assert_eq!(a.subtracted(&b).unwrap().as_slice(), &[-2.0, 0.0, 2.0]);
        assert_eq!(a.divided(&b).unwrap()[0], 1.0 / 3.0);
        assert_eq!(a.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_dot_product() {
        let a = v(&[1.0, 2.0, 3.0]);
        let b = v(&[3.0, 2.0, 1.0]);
        assert_eq!(a.dot_product(&b).unwrap(), 10.0);
        assert_eq!(a.dot_product(&v(&[1.0])).unwrap_err().kind(), ErrorKind::Dimension);
    }

    #[test]
    fn test_statistics() {
        let a = v(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((a.mean() - 5.0).abs() < 1e-12);
        // Sample variance: 32 / 7
        assert!((a.variance(None) - 32.0 / 7.0).abs() < 1e-12);
        assert!((a.variance(Some(5.0)) - 32.0 / 7.0).abs() < 1e-12);
        assert!((a.standard_deviation(None) - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        // About a different mean the deviations grow.
        assert!((a.variance(Some(4.0)) - 40.0 / 7.0).abs() < 1e-12);
        assert!((a.mean_absolute_deviation(None) - 1.5).abs() < 1e-12);
        assert!((a.mean_absolute_deviation(Some(4.0)) - 1.5).abs() < 1e-12);

        let b = v(&[1.0, -2.0, 2.0]);
        assert_eq!(b.sum(), 5.0);
        assert!((b.norm() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_quantile() {
        let a = v(&[3.0, 1.0, 4.0, 1.0, 5.0]);
        assert_eq!(a.quantile(0.0).unwrap(), 1.0);
        assert_eq!(a.quantile(1.0).unwrap(), 5.0);
        assert_eq!(a.quantile(None).unwrap(), 3.0);
        assert_eq!(a.median(), 3.0);
        assert_eq!(
            a.quantile(-0.1),
            Err(LinalgError::OutOfRange { value: -0.1, lo: 0.0, hi: 1.0 })
        );
        assert_eq!(a.quantile(1.1).unwrap_err().kind(), ErrorKind::Range);
        // Receiver order is preserved.
        assert_eq!(a.as_slice(), &[3.0, 1.0, 4.0, 1.0, 5.0]);
    }

    #[test]
    fn test_extrema() {
        let a = v(&[3.0, -1.0, 4.0, -1.0, 4.0]);
        assert_eq!(a.max(), 4.0);
        assert_eq!(a.min(), -1.0);
        assert_eq!(a.max_index(), 2);
        assert_eq!(a.min_index(), 1);
    }

    #[test]
    fn test_swap_and_reverse() {
        let mut a = v(&[1.0, 2.0, 3.0]);
        a.swap_elements(0, 2).unwrap();
        assert_eq!(a.as_slice(), &[3.0, 2.0, 1.0]);
        assert_eq!(a.swap_elements(0, 3).unwrap_err().kind(), ErrorKind::Index);
        a.reverse_in_place();
        assert_eq!(a.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_to_sequence_is_snapshot() {
        let mut a = v(&[1.0, 2.0, 3.0]);
        let seq = a.to_sequence();
        a.fill_zero();
        assert_eq!(seq.collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_matrix_views() {
        let a = v(&[1.0, 2.0, 3.0]);
        let col = a.to_matrix();
        assert_eq!(col.shape(), (3, 1));
        let row = a.transpose();
        assert_eq!(row.shape(), (1, 3));
        assert_eq!(row.get(0, 2).unwrap(), 3.0);
    }

    #[test]
    fn test_serde_validates() {
        let a = v(&[1.0, 2.0]);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, "[1.0,2.0]");
        let back: Vector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
        assert!(serde_json::from_str::<Vector>("[]").is_err());
    }
}
