//! Descriptive statistics over samples and matrix columns.
//!
//! `ddof` is the delta degrees of freedom: variances divide by `n - ddof`,
//! so 0 gives the population variance and 1 the sample variance.

use ndarray::Axis;

use crate::Matrix;
use crate::error::{MlError, Result};

pub fn mean(data: &[f64]) -> Result<f64> {
    if data.is_empty() {
        return Err(MlError::InvalidArgument(
            "cannot take the mean of an empty sample".to_string(),
        ));
    }
    Ok(data.iter().sum::<f64>() / data.len() as f64)
}

pub fn variance(data: &[f64], ddof: usize) -> Result<f64> {
    let m = mean(data)?;
    if data.len() <= ddof {
        return Err(MlError::InvalidArgument(format!(
            "{} samples are not enough for ddof = {}",
            data.len(),
            ddof
        )));
    }
    let sum: f64 = data.iter().map(|v| (v - m) * (v - m)).sum();
    Ok(sum / (data.len() - ddof) as f64)
}

pub fn std_dev(data: &[f64], ddof: usize) -> Result<f64> {
    Ok(variance(data, ddof)?.sqrt())
}

/// Sample covariance (ddof = 1) between every pair of columns.
pub fn covariance_matrix(matrix: &Matrix) -> Result<Matrix> {
    let n = matrix.rows();
    if n < 2 {
        return Err(MlError::InvalidArgument(format!(
            "covariance needs at least 2 samples, got {}",
            n
        )));
    }
    let data = matrix.as_array();
    let means = data
        .mean_axis(Axis(0))
        .ok_or_else(|| MlError::InvalidArgument("matrix has no rows".to_string()))?;
    let centered = data - &means;
    Ok(Matrix::from(centered.t().dot(&centered) / (n - 1) as f64))
}

/// Pearson correlation between every pair of columns.
///
/// A constant column has no defined correlation and fails with
/// [`MlError::InvalidArgument`].
pub fn correlation_matrix(matrix: &Matrix) -> Result<Matrix> {
    let mut cov = covariance_matrix(matrix)?;
    let std: Vec<f64> = (0..cov.rows()).map(|i| cov[(i, i)].sqrt()).collect();
    if let Some(col) = std.iter().position(|&s| s == 0.0) {
        return Err(MlError::InvalidArgument(format!(
            "column {} is constant, correlation is undefined",
            col
        )));
    }

    for i in 0..cov.rows() {
        for j in 0..cov.cols() {
            cov[(i, j)] /= std[i] * std[j];
        }
    }
    Ok(cov)
}
