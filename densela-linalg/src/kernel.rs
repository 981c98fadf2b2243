#![allow(clippy::needless_range_loop)]
//! Low-level numeric kernel.
//!
//! Routines here operate on raw row-major slices and report failures as
//! status-like [`KernelError`] codes. They perform only the checks a
//! BLAS/LAPACK-style kernel would; the public `Vector`, `Matrix`, and
//! decomposition types validate their arguments first and translate any
//! kernel status into a [`LinalgError`](crate::LinalgError).
//!
//! Packed storage follows the conventional layouts: LU keeps the unit
//! lower factor strictly below the diagonal and U on and above it; QR keeps
//! R on and above the diagonal and the Householder vectors (with an implicit
//! leading 1) below it, with one scale coefficient per reflector in `tau`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    #[error("vector lengths are not conformant: expected {expected}, got {got}")]
    BadLength { expected: usize, got: usize },

    #[error("index {index} is outside [0, {extent})")]
    InvalidIndex { index: usize, extent: usize },

    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("matrix is singular (negligible pivot at position {pivot})")]
    Singular { pivot: usize },

    #[error("failed to allocate {requested} elements")]
    NoMemory { requested: usize },
}

impl KernelError {
    /// Short status code, as a numeric library would report it.
    pub fn code(&self) -> &'static str {
        match self {
            KernelError::BadLength { .. } => "EBADLEN",
            KernelError::InvalidIndex { .. } => "EINVAL",
            KernelError::NotSquare { .. } => "ENOTSQR",
            KernelError::Singular { .. } => "ESING",
            KernelError::NoMemory { .. } => "ENOMEM",
        }
    }
}

pub type KernelResult<T> = std::result::Result<T, KernelError>;

/// Zero-filled buffer, reporting allocation failure instead of aborting.
pub fn alloc_zeroed(len: usize) -> KernelResult<Vec<f64>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| KernelError::NoMemory { requested: len })?;
    buf.resize(len, 0.0);
    Ok(buf)
}

fn check_len(expected: usize, got: usize) -> KernelResult<()> {
    if expected != got {
        return Err(KernelError::BadLength { expected, got });
    }
    Ok(())
}

fn check_index(index: usize, extent: usize) -> KernelResult<()> {
    if index >= extent {
        return Err(KernelError::InvalidIndex { index, extent });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Level 1
// ---------------------------------------------------------------------------

pub fn dot(x: &[f64], y: &[f64]) -> KernelResult<f64> {
    check_len(x.len(), y.len())?;
    Ok(x.iter().zip(y.iter()).map(|(a, b)| a * b).sum())
}

/// Sum of absolute values.
pub fn asum(x: &[f64]) -> f64 {
    x.iter().map(|v| v.abs()).sum()
}

/// Euclidean norm, accumulated with rescaling so large entries do not overflow.
pub fn nrm2(x: &[f64]) -> f64 {
    let mut scale = 0.0_f64;
    let mut ssq = 1.0_f64;
    for &v in x {
        if v != 0.0 {
            let a = v.abs();
            if scale < a {
                ssq = 1.0 + ssq * (scale / a) * (scale / a);
                scale = a;
            } else {
                ssq += (a / scale) * (a / scale);
            }
        }
    }
    scale * ssq.sqrt()
}

pub fn swap_elements(x: &mut [f64], i: usize, j: usize) -> KernelResult<()> {
    check_index(i, x.len())?;
    check_index(j, x.len())?;
    x.swap(i, j);
    Ok(())
}

/// Index of the largest element; the first NaN wins if one is present.
pub fn max_index(x: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in x.iter().enumerate() {
        if v.is_nan() {
            return i;
        }
        if v > x[best] {
            best = i;
        }
    }
    best
}

/// Index of the smallest element; the first NaN wins if one is present.
pub fn min_index(x: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in x.iter().enumerate() {
        if v.is_nan() {
            return i;
        }
        if v < x[best] {
            best = i;
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Level 2 and matrix data movement
// ---------------------------------------------------------------------------

/// y = A * x for a row-major `rows x cols` matrix.
pub fn gemv(a: &[f64], rows: usize, cols: usize, x: &[f64]) -> KernelResult<Vec<f64>> {
    check_len(cols, x.len())?;
    let mut y = alloc_zeroed(rows)?;
    for i in 0..rows {
        let row = &a[i * cols..(i + 1) * cols];
        y[i] = row.iter().zip(x.iter()).map(|(aij, xj)| aij * xj).sum();
    }
    Ok(y)
}

pub fn swap_rows(a: &mut [f64], rows: usize, cols: usize, i: usize, j: usize) -> KernelResult<()> {
    check_index(i, rows)?;
    check_index(j, rows)?;
    if i != j {
        for k in 0..cols {
            a.swap(i * cols + k, j * cols + k);
        }
    }
    Ok(())
}

pub fn swap_columns(
    a: &mut [f64],
    rows: usize,
    cols: usize,
    i: usize,
    j: usize,
) -> KernelResult<()> {
    check_index(i, cols)?;
    check_index(j, cols)?;
    if i != j {
        for r in 0..rows {
            a.swap(r * cols + i, r * cols + j);
        }
    }
    Ok(())
}

pub fn transpose_in_place(a: &mut [f64], rows: usize, cols: usize) -> KernelResult<()> {
    if rows != cols {
        return Err(KernelError::NotSquare { rows, cols });
    }
    let n = rows;
    for i in 0..n {
        for j in (i + 1)..n {
            a.swap(i * n + j, j * n + i);
        }
    }
    Ok(())
}

pub fn transpose_copy(a: &[f64], rows: usize, cols: usize) -> KernelResult<Vec<f64>> {
    let mut t = alloc_zeroed(rows * cols)?;
    for i in 0..rows {
        for j in 0..cols {
            t[j * rows + i] = a[i * cols + j];
        }
    }
    Ok(t)
}

/// An exact zero or non-finite pivot; the only failure an LU solve reports.
fn zero_pivot(pivot: f64) -> bool {
    pivot == 0.0 || !pivot.is_finite()
}

/// Whether diagonal `i` of an upper-triangular factor is negligible next to
/// the largest entry above it in the same column.
fn negligible_in_column(r: &[f64], cols: usize, n: usize, i: usize) -> bool {
    let pivot = r[i * cols + i];
    if zero_pivot(pivot) {
        return true;
    }
    let scale = (0..=i).fold(0.0_f64, |acc, k| acc.max(r[k * cols + i].abs()));
    pivot.abs() <= n as f64 * f64::EPSILON * scale
}

// ---------------------------------------------------------------------------
// LU with partial pivoting
// ---------------------------------------------------------------------------

/// Factorize the `n x n` matrix in place. `perm` receives the row order of
/// `P * A` (row `i` of the factorized matrix is row `perm[i]` of the input).
/// Returns the permutation sign.
///
/// A zero pivot column is skipped rather than reported; singularity is
/// detected by the solve and invert routines.
pub fn lu_decomp(a: &mut [f64], n: usize, perm: &mut [usize]) -> KernelResult<i8> {
    check_len(n * n, a.len())?;
    check_len(n, perm.len())?;
    for (i, p) in perm.iter_mut().enumerate() {
        *p = i;
    }
    let mut sign = 1_i8;

    for j in 0..n.saturating_sub(1) {
        let mut max = a[j * n + j].abs();
        let mut pivot_row = j;
        for i in (j + 1)..n {
            let v = a[i * n + j].abs();
            if v > max {
                max = v;
                pivot_row = i;
            }
        }

        if pivot_row != j {
            swap_rows(a, n, n, j, pivot_row)?;
            perm.swap(j, pivot_row);
            sign = -sign;
        }

        let ajj = a[j * n + j];
        if ajj != 0.0 {
            for i in (j + 1)..n {
                let lij = a[i * n + j] / ajj;
                a[i * n + j] = lij;
                for k in (j + 1)..n {
                    a[i * n + k] -= lij * a[j * n + k];
                }
            }
        }
    }

    Ok(sign)
}

pub fn lu_det(lu: &[f64], n: usize, sign: i8) -> f64 {
    (0..n).fold(f64::from(sign), |acc, i| acc * lu[i * n + i])
}

fn lu_check_singular(lu: &[f64], n: usize) -> KernelResult<()> {
    for i in 0..n {
        if zero_pivot(lu[i * n + i]) {
            return Err(KernelError::Singular { pivot: i });
        }
    }
    Ok(())
}

fn lu_substitute(lu: &[f64], n: usize, x: &mut [f64]) {
    // L y = P b (unit diagonal)
    for i in 0..n {
        let mut s = x[i];
        for j in 0..i {
            s -= lu[i * n + j] * x[j];
        }
        x[i] = s;
    }
    // U x = y
    for i in (0..n).rev() {
        let mut s = x[i];
        for j in (i + 1)..n {
            s -= lu[i * n + j] * x[j];
        }
        x[i] = s / lu[i * n + i];
    }
}

pub fn lu_solve(lu: &[f64], n: usize, perm: &[usize], b: &[f64]) -> KernelResult<Vec<f64>> {
    check_len(n, b.len())?;
    check_len(n, perm.len())?;
    lu_check_singular(lu, n)?;

    let mut x = alloc_zeroed(n)?;
    for i in 0..n {
        x[i] = b[perm[i]];
    }
    lu_substitute(lu, n, &mut x);
    Ok(x)
}

/// Inverse, solved column by column against the identity.
pub fn lu_invert(lu: &[f64], n: usize, perm: &[usize]) -> KernelResult<Vec<f64>> {
    check_len(n, perm.len())?;
    lu_check_singular(lu, n)?;

    let mut inv = alloc_zeroed(n * n)?;
    let mut col = alloc_zeroed(n)?;
    for j in 0..n {
        for i in 0..n {
            col[i] = if perm[i] == j { 1.0 } else { 0.0 };
        }
        lu_substitute(lu, n, &mut col);
        for i in 0..n {
            inv[i * n + j] = col[i];
        }
    }
    Ok(inv)
}

// ---------------------------------------------------------------------------
// Householder QR
// ---------------------------------------------------------------------------

/// Build the reflector for column `col`, rows `col..rows`, in place.
/// Returns its scale coefficient (0 when the column is already reduced).
fn householder_transform(a: &mut [f64], rows: usize, cols: usize, col: usize) -> f64 {
    let k = col;
    if rows - k == 1 {
        return 0.0;
    }

    let alpha = a[k * cols + k];
    let tail: Vec<f64> = ((k + 1)..rows).map(|r| a[r * cols + k]).collect();
    let xnorm = nrm2(&tail);
    if xnorm == 0.0 {
        return 0.0;
    }

    let beta = -alpha.signum() * alpha.hypot(xnorm);
    let tau = (beta - alpha) / beta;
    let s = alpha - beta;
    for r in (k + 1)..rows {
        a[r * cols + k] /= s;
    }
    a[k * cols + k] = beta;
    tau
}

/// Apply reflector `k` (stored in column `k` of `h`) from the left to the
/// trailing block of `target` (rows `k..`, columns `first_col..`).
#[allow(clippy::too_many_arguments)]
fn householder_apply(
    tau: f64,
    h: &[f64],
    h_cols: usize,
    k: usize,
    target: &mut [f64],
    rows: usize,
    cols: usize,
    first_col: usize,
) {
    if tau == 0.0 {
        return;
    }
    for j in first_col..cols {
        let mut w = target[k * cols + j];
        for r in (k + 1)..rows {
            w += h[r * h_cols + k] * target[r * cols + j];
        }
        target[k * cols + j] -= tau * w;
        for r in (k + 1)..rows {
            target[r * cols + j] -= tau * h[r * h_cols + k] * w;
        }
    }
}

/// Apply reflector `k` to columns `k+1..` of the matrix that stores it.
/// The reflector occupies column `k` below the diagonal, which this never
/// writes.
fn householder_apply_trailing(tau: f64, a: &mut [f64], rows: usize, cols: usize, k: usize) {
    if tau == 0.0 {
        return;
    }
    for j in (k + 1)..cols {
        let mut w = a[k * cols + j];
        for r in (k + 1)..rows {
            w += a[r * cols + k] * a[r * cols + j];
        }
        a[k * cols + j] -= tau * w;
        for r in (k + 1)..rows {
            a[r * cols + j] -= tau * a[r * cols + k] * w;
        }
    }
}

/// Apply reflector `k` to a vector.
fn householder_apply_vec(tau: f64, h: &[f64], h_cols: usize, rows: usize, k: usize, v: &mut [f64]) {
    if tau == 0.0 {
        return;
    }
    let mut w = v[k];
    for r in (k + 1)..rows {
        w += h[r * h_cols + k] * v[r];
    }
    v[k] -= tau * w;
    for r in (k + 1)..rows {
        v[r] -= tau * h[r * h_cols + k] * w;
    }
}

/// Factorize the `rows x cols` matrix in place; `tau` has `min(rows, cols)`
/// entries.
pub fn qr_decomp(a: &mut [f64], rows: usize, cols: usize, tau: &mut [f64]) -> KernelResult<()> {
    check_len(rows * cols, a.len())?;
    check_len(rows.min(cols), tau.len())?;

    for k in 0..rows.min(cols) {
        let t = householder_transform(a, rows, cols, k);
        tau[k] = t;
        householder_apply_trailing(t, a, rows, cols, k);
    }
    Ok(())
}

/// v <- Q^T v
pub fn qr_qtvec(qr: &[f64], rows: usize, cols: usize, tau: &[f64], v: &mut [f64]) -> KernelResult<()> {
    check_len(rows, v.len())?;
    for k in 0..rows.min(cols) {
        householder_apply_vec(tau[k], qr, cols, rows, k, v);
    }
    Ok(())
}

/// v <- Q v
pub fn qr_qvec(qr: &[f64], rows: usize, cols: usize, tau: &[f64], v: &mut [f64]) -> KernelResult<()> {
    check_len(rows, v.len())?;
    for k in (0..rows.min(cols)).rev() {
        householder_apply_vec(tau[k], qr, cols, rows, k, v);
    }
    Ok(())
}

/// Back substitution against the leading `n x n` block of R.
fn qr_rsolve(qr: &[f64], rows: usize, cols: usize, n: usize, x: &mut [f64]) -> KernelResult<()> {
    debug_assert!(n <= rows.min(cols));
    for i in 0..n {
        if negligible_in_column(qr, cols, n, i) {
            return Err(KernelError::Singular { pivot: i });
        }
    }
    for i in (0..n).rev() {
        let mut s = x[i];
        for j in (i + 1)..n {
            s -= qr[i * cols + j] * x[j];
        }
        x[i] = s / qr[i * cols + i];
    }
    Ok(())
}

/// Solve the square system A x = b.
pub fn qr_solve(qr: &[f64], n: usize, tau: &[f64], b: &[f64]) -> KernelResult<Vec<f64>> {
    check_len(n * n, qr.len())?;
    check_len(n, b.len())?;
    let mut x = b.to_vec();
    qr_qtvec(qr, n, n, tau, &mut x)?;
    qr_rsolve(qr, n, n, n, &mut x)?;
    Ok(x)
}

/// Least-squares solution of an over-determined system. Returns the
/// solution (length `cols`) and the residual `A x - b` (length `rows`).
pub fn qr_lssolve(
    qr: &[f64],
    rows: usize,
    cols: usize,
    tau: &[f64],
    b: &[f64],
) -> KernelResult<(Vec<f64>, Vec<f64>)> {
    if rows <= cols {
        return Err(KernelError::BadLength { expected: cols + 1, got: rows });
    }
    check_len(rows, b.len())?;

    let mut qtb = b.to_vec();
    qr_qtvec(qr, rows, cols, tau, &mut qtb)?;

    let mut x = qtb[..cols].to_vec();
    qr_rsolve(qr, rows, cols, cols, &mut x)?;

    // b - A x = Q [0; (Q^T b)[cols..]]
    let mut residual = qtb;
    for r in residual.iter_mut().take(cols) {
        *r = 0.0;
    }
    qr_qvec(qr, rows, cols, tau, &mut residual)?;
    for r in residual.iter_mut() {
        *r = -*r;
    }
    Ok((x, residual))
}

/// Expand the packed factorization into Q (`rows x rows`) and R
/// (`rows x cols`).
pub fn qr_unpack(
    qr: &[f64],
    rows: usize,
    cols: usize,
    tau: &[f64],
) -> KernelResult<(Vec<f64>, Vec<f64>)> {
    let mut q = alloc_zeroed(rows * rows)?;
    for i in 0..rows {
        q[i * rows + i] = 1.0;
    }
    for k in (0..rows.min(cols)).rev() {
        householder_apply(tau[k], qr, cols, k, &mut q, rows, rows, k);
    }

    let mut r = alloc_zeroed(rows * cols)?;
    for i in 0..rows {
        for j in i..cols {
            r[i * cols + j] = qr[i * cols + j];
        }
    }
    Ok((q, r))
}

// ---------------------------------------------------------------------------
// Statistics with a caller-supplied mean
// ---------------------------------------------------------------------------

/// Sample variance about `mean` (n - 1 denominator).
pub fn variance_m(x: &[f64], mean: f64) -> f64 {
    let ss: f64 = x.iter().map(|v| (v - mean) * (v - mean)).sum();
    ss / (x.len() as f64 - 1.0)
}

/// Mean absolute deviation about `mean`.
pub fn absdev_m(x: &[f64], mean: f64) -> f64 {
    x.iter().map(|v| (v - mean).abs()).sum::<f64>() / x.len() as f64
}

/// Quantile of ascending-sorted data by linear interpolation between the
/// two nearest ranks.
pub fn quantile_sorted(sorted: &[f64], f: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    let index = f * (n - 1) as f64;
    let lhs = index.floor() as usize;
    let delta = index - lhs as f64;
    if lhs >= n - 1 {
        sorted[n - 1]
    } else {
        (1.0 - delta) * sorted[lhs] + delta * sorted[lhs + 1]
    }
}
