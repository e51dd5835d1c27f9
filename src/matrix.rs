//! Dense row-major matrix of `f64`.
//!
//! `Matrix` wraps an [`ndarray::Array2`] and adds the checked operations the
//! models rely on: shape-validated arithmetic, bounds-checked row access,
//! cofactor determinant and Gauss-Jordan inverse. Fallible operations return
//! [`MlError`]; the `std::ops` operator impls panic on shape mismatch the same
//! way ndarray's own operators do.
//!
//! # Examples
//!
//! ```rust
//! use tabular_ml::Matrix;
//!
//! let a = Matrix::from_rows(&[vec![4.0, 7.0], vec![2.0, 6.0]]).unwrap();
//! let inv = a.inverse().unwrap();
//! let product = inv.matmul(&a).unwrap();
//! assert!(product.approx_eq(&Matrix::identity(2), 1e-9));
//! assert!((a.determinant().unwrap() - 10.0).abs() < 1e-12);
//! ```

use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, MulAssign, Sub, SubAssign};

use log::debug;
use ndarray::{Array2, ArrayView1, ArrayViewMut1, Axis, s};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::Rng;

use crate::Vector;
use crate::error::{MlError, Result};

/// Pivots with a smaller magnitude than this are treated as zero by
/// [`Matrix::inverse`].
pub const SINGULARITY_TOLERANCE: f64 = 1e-10;

#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    data: Array2<f64>,
}

impl Matrix {
    /// Creates a `rows x cols` matrix filled with zeros.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::zeros((rows, cols)),
        }
    }

    /// Builds a matrix from nested rows.
    ///
    /// An empty slice yields a 0x0 matrix. Rows of differing lengths are
    /// rejected with [`MlError::InvalidArgument`].
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Ok(Self::new(0, 0));
        };
        let cols = first.len();

        let mut flat = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(MlError::InvalidArgument(format!(
                    "inconsistent row sizes: row 0 has {cols} values, row {i} has {}",
                    row.len()
                )));
            }
            flat.extend_from_slice(row);
        }

        Self::from_shape_vec(rows.len(), cols, flat)
    }

    /// Builds a matrix from a flat row-major buffer.
    pub fn from_shape_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        let expected = element_count(rows, cols);
        if data.len() != expected {
            return Err(MlError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        let len = data.len();
        let data = Array2::from_shape_vec((rows, cols), data)
            .map_err(|_| MlError::SizeMismatch { expected, actual: len })?;
        Ok(Self { data })
    }

    pub fn identity(n: usize) -> Self {
        Self {
            data: Array2::eye(n),
        }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::new(rows, cols)
    }

    pub fn ones(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::ones((rows, cols)),
        }
    }

    /// Creates a matrix with entries drawn uniformly from `[low, high)`.
    ///
    /// # Panics
    ///
    /// Panics if `low >= high`.
    pub fn random_uniform<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        low: f64,
        high: f64,
        rng: &mut R,
    ) -> Self {
        Self {
            data: Array2::random_using((rows, cols), Uniform::new(low, high), rng),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        self.check_row(row)?;
        self.check_col(col)?;
        Ok(self.data[[row, col]])
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        self.check_row(row)?;
        self.check_col(col)?;
        self.data[[row, col]] = value;
        Ok(())
    }

    /// Borrows row `index`.
    pub fn row(&self, index: usize) -> Result<ArrayView1<'_, f64>> {
        self.check_row(index)?;
        Ok(self.data.row(index))
    }

    pub fn row_mut(&mut self, index: usize) -> Result<ArrayViewMut1<'_, f64>> {
        self.check_row(index)?;
        Ok(self.data.row_mut(index))
    }

    /// Copies column `index` into a new vector.
    pub fn column(&self, index: usize) -> Result<Vector> {
        self.check_col(index)?;
        Ok(self.data.column(index).to_owned())
    }

    /// Iterates over rows in order. Row access here needs no bounds check.
    pub fn row_iter(&self) -> impl Iterator<Item = ArrayView1<'_, f64>> {
        self.data.axis_iter(Axis(0))
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn into_array(self) -> Array2<f64> {
        self.data
    }

    /// Element-wise sum.
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.check_same_shape("add", other)?;
        Ok(Self {
            data: &self.data + &other.data,
        })
    }

    /// Element-wise difference.
    pub fn sub(&self, other: &Matrix) -> Result<Matrix> {
        self.check_same_shape("sub", other)?;
        Ok(Self {
            data: &self.data - &other.data,
        })
    }

    /// Matrix product `self * other`.
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols() != other.rows() {
            return Err(MlError::shape(
                "matmul",
                (self.cols(), other.cols()),
                other.shape(),
            ));
        }
        Ok(Self {
            data: self.data.dot(&other.data),
        })
    }

    /// Matrix-vector product.
    pub fn matvec(&self, v: &Vector) -> Result<Vector> {
        if self.cols() != v.len() {
            return Err(MlError::shape("matvec", (self.cols(), 1), (v.len(), 1)));
        }
        Ok(self.data.dot(v))
    }

    pub fn scale(&self, scalar: f64) -> Matrix {
        Self {
            data: &self.data * scalar,
        }
    }

    /// Returns a new matrix with rows and columns swapped.
    pub fn transpose(&self) -> Matrix {
        Self {
            data: self.data.t().as_standard_layout().into_owned(),
        }
    }

    /// Determinant by Laplace expansion along the first row.
    ///
    /// Factorial time: only meant for the small systems the regressions build.
    pub fn determinant(&self) -> Result<f64> {
        if !self.is_square() {
            return Err(MlError::NotSquare {
                op: "determinant",
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        Ok(cofactor_expansion(&self.data))
    }

    /// Inverse by Gauss-Jordan elimination on `[A | I]`.
    ///
    /// No row pivoting is performed: a pivot below [`SINGULARITY_TOLERANCE`]
    /// fails with [`MlError::Singular`] even when a row swap would succeed.
    pub fn inverse(&self) -> Result<Matrix> {
        if !self.is_square() {
            return Err(MlError::NotSquare {
                op: "inverse",
                rows: self.rows(),
                cols: self.cols(),
            });
        }

        let n = self.rows();
        let mut augmented = Array2::<f64>::zeros((n, 2 * n));
        augmented.slice_mut(s![.., ..n]).assign(&self.data);
        augmented.slice_mut(s![.., n..]).assign(&Array2::<f64>::eye(n));

        for i in 0..n {
            let pivot = augmented[[i, i]];
            if pivot.abs() < SINGULARITY_TOLERANCE {
                debug!("inverse: pivot {pivot:e} at row {i} below tolerance, matrix is singular");
                return Err(MlError::Singular { row: i, pivot });
            }

            let pivot_row = augmented.row(i).to_owned() / pivot;
            augmented.row_mut(i).assign(&pivot_row);

            for k in 0..n {
                if k == i {
                    continue;
                }
                let factor = augmented[[k, i]];
                if factor != 0.0 {
                    augmented.row_mut(k).scaled_add(-factor, &pivot_row);
                }
            }
        }

        Ok(Self {
            data: augmented.slice(s![.., n..]).to_owned(),
        })
    }

    /// Changes the shape in place, keeping row-major element order.
    pub fn reshape(&mut self, rows: usize, cols: usize) -> Result<()> {
        let len = self.data.len();
        let requested = element_count(rows, cols);
        if requested != len {
            return Err(MlError::SizeMismatch {
                expected: len,
                actual: requested,
            });
        }
        let flat: Vec<f64> = self.data.iter().copied().collect();
        *self = Self::from_shape_vec(rows, cols, flat)?;
        Ok(())
    }

    /// Returns a copy with a leading column of ones.
    pub fn with_intercept(&self) -> Matrix {
        let mut data = Array2::ones((self.rows(), self.cols() + 1));
        data.slice_mut(s![.., 1..]).assign(&self.data);
        Self { data }
    }

    /// True when shapes match and every pair of cells differs by at most `tolerance`.
    pub fn approx_eq(&self, other: &Matrix, tolerance: f64) -> bool {
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| (a - b).abs() <= tolerance)
    }

    fn check_row(&self, index: usize) -> Result<()> {
        if index >= self.rows() {
            return Err(MlError::IndexOutOfRange {
                axis: "rows",
                index,
                len: self.rows(),
            });
        }
        Ok(())
    }

    fn check_col(&self, index: usize) -> Result<()> {
        if index >= self.cols() {
            return Err(MlError::IndexOutOfRange {
                axis: "columns",
                index,
                len: self.cols(),
            });
        }
        Ok(())
    }

    fn check_same_shape(&self, op: &'static str, other: &Matrix) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(MlError::shape(op, self.shape(), other.shape()));
        }
        Ok(())
    }
}

/// `rows * cols`, saturating at `usize::MAX` so an overflowing shape never
/// matches a real buffer length.
fn element_count(rows: usize, cols: usize) -> usize {
    rows.checked_mul(cols).unwrap_or(usize::MAX)
}

fn cofactor_expansion(a: &Array2<f64>) -> f64 {
    let n = a.nrows();
    match n {
        0 => 1.0,
        1 => a[[0, 0]],
        2 => a[[0, 0]] * a[[1, 1]] - a[[0, 1]] * a[[1, 0]],
        _ => {
            let lower = a.slice(s![1.., ..]);
            let mut det = 0.0;
            for j in 0..n {
                let keep: Vec<usize> = (0..n).filter(|&c| c != j).collect();
                let minor = lower.select(Axis(1), &keep);
                let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
                det += sign * a[[0, j]] * cofactor_expansion(&minor);
            }
            det
        }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl From<Array2<f64>> for Matrix {
    fn from(data: Array2<f64>) -> Self {
        Self { data }
    }
}

impl From<Matrix> for Array2<f64> {
    fn from(matrix: Matrix) -> Self {
        matrix.data
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[[row, col]]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[[row, col]]
    }
}

/// # Panics
///
/// Panics if the shapes differ; use [`Matrix::add`] for a checked sum.
impl Add for &Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Matrix {
        match Matrix::add(self, rhs) {
            Ok(m) => m,
            Err(e) => panic!("{e}"),
        }
    }
}

/// # Panics
///
/// Panics if the shapes differ; use [`Matrix::sub`] for a checked difference.
impl Sub for &Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Matrix {
        match Matrix::sub(self, rhs) {
            Ok(m) => m,
            Err(e) => panic!("{e}"),
        }
    }
}

/// # Panics
///
/// Panics if the inner dimensions differ; use [`Matrix::matmul`] for a checked product.
impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Matrix {
        match self.matmul(rhs) {
            Ok(m) => m,
            Err(e) => panic!("{e}"),
        }
    }
}

impl Mul<f64> for &Matrix {
    type Output = Matrix;

    fn mul(self, scalar: f64) -> Matrix {
        self.scale(scalar)
    }
}

impl AddAssign<&Matrix> for Matrix {
    fn add_assign(&mut self, rhs: &Matrix) {
        if let Err(e) = self.check_same_shape("add_assign", rhs) {
            panic!("{e}");
        }
        self.data += &rhs.data;
    }
}

impl SubAssign<&Matrix> for Matrix {
    fn sub_assign(&mut self, rhs: &Matrix) {
        if let Err(e) = self.check_same_shape("sub_assign", rhs) {
            panic!("{e}");
        }
        self.data -= &rhs.data;
    }
}

impl MulAssign<f64> for Matrix {
    fn mul_assign(&mut self, scalar: f64) {
        self.data *= scalar;
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.data.axis_iter(Axis(0)) {
            let cells: Vec<String> = row.iter().map(|v| format!("{v:8.4}")).collect();
            writeln!(f, "[{}]", cells.join(", "))?;
        }
        Ok(())
    }
}
