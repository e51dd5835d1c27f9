use log::debug;

use crate::error::{MlError, Result};
use crate::model::{Model, check_samples, check_width};
use crate::{Matrix, Vector};

/// Ordinary least squares solved in closed form, θ = (XᵗX)⁻¹Xᵗy.
#[derive(Clone, Debug)]
pub struct LinearRegression {
    coefficients: Option<Vector>,
    n_features: usize,
    fit_intercept: bool,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            n_features: 0,
            fit_intercept: true,
        }
    }

    pub fn with_intercept(fit_intercept: bool) -> Self {
        Self {
            fit_intercept,
            ..Self::new()
        }
    }

    /// Learned coefficients, intercept first when one is fitted.
    pub fn coefficients(&self) -> Option<&Vector> {
        self.coefficients.as_ref()
    }

    pub fn intercept(&self) -> Option<f64> {
        match (&self.coefficients, self.fit_intercept) {
            (Some(coeffs), true) => coeffs.first().copied(),
            (Some(_), false) => Some(0.0),
            (None, _) => None,
        }
    }

    /// R² of the predictions on `features` against `targets`.
    pub fn score(&self, features: &Matrix, targets: &Vector) -> Result<f64> {
        let predictions = self.predict(features)?;
        crate::metrics::r2_score(targets, &predictions)
    }

    fn design_matrix(&self, features: &Matrix) -> Matrix {
        if self.fit_intercept {
            features.with_intercept()
        } else {
            features.clone()
        }
    }

    fn solve_normal_equation(x: &Matrix, y: &Vector) -> Result<Vector> {
        let y = Matrix::from_shape_vec(y.len(), 1, y.to_vec())?;
        let xt = x.transpose();
        let xtx_inv = xt.matmul(x)?.inverse()?;
        let xty = xt.matmul(&y)?;
        xtx_inv.matmul(&xty)?.column(0)
    }
}

impl Model for LinearRegression {
    /// # Errors
    ///
    /// [`MlError::ShapeMismatch`] on a sample-count mismatch and
    /// [`MlError::Singular`] when XᵗX cannot be inverted (collinear or
    /// rank-deficient features). No state changes on failure.
    fn train(&mut self, features: &Matrix, targets: &Vector) -> Result<()> {
        check_samples("LinearRegression::train", features, targets)?;
        debug!(
            "LinearRegression: solving normal equations for {} samples x {} features",
            features.rows(),
            features.cols()
        );

        let x = self.design_matrix(features);
        let coeffs = Self::solve_normal_equation(&x, targets)?;

        self.coefficients = Some(coeffs);
        self.n_features = features.cols();
        Ok(())
    }

    fn predict(&self, features: &Matrix) -> Result<Vector> {
        let coeffs = self
            .coefficients
            .as_ref()
            .ok_or(MlError::NotFitted("LinearRegression"))?;
        check_width(features, self.n_features)?;

        self.design_matrix(features).matvec(coeffs)
    }

    fn parameters(&self) -> Vector {
        self.coefficients.clone().unwrap_or_else(|| Vector::zeros(0))
    }
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn m(rows: &[Vec<f64>]) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_linear_regression_simple() {
        let x = m(&[vec![1.0], vec![2.0], vec![3.0], vec![4.0]]);
        let y = array![2.0, 4.0, 6.0, 8.0];

        let mut model = LinearRegression::new();
        model.train(&x, &y).unwrap();

        let predictions = model.predict(&x).unwrap();
        for (pred, actual) in predictions.iter().zip(y.iter()) {
            assert_abs_diff_eq!(pred, actual, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_recovers_plane_coefficients() {
        // y = 2*x1 + 3*x2 + 1
        let rows = vec![
            vec![1.0, 1.0],
            vec![2.0, 1.0],
            vec![3.0, 2.0],
            vec![4.0, 3.0],
            vec![5.0, 5.0],
            vec![0.0, 2.0],
        ];
        let y: Vector = rows.iter().map(|r| 2.0 * r[0] + 3.0 * r[1] + 1.0).collect();

        let mut model = LinearRegression::new();
        model.train(&m(&rows), &y).unwrap();

        let params = model.parameters();
        assert_eq!(params.len(), 3);
        assert_abs_diff_eq!(params[0], 1.0, epsilon = 1e-8);
        assert_abs_diff_eq!(params[1], 2.0, epsilon = 1e-8);
        assert_abs_diff_eq!(params[2], 3.0, epsilon = 1e-8);
        assert_abs_diff_eq!(model.intercept().unwrap(), 1.0, epsilon = 1e-8);
        assert_abs_diff_eq!(model.score(&m(&rows), &y).unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_linear_regression_without_intercept() {
        let x = m(&[vec![1.0], vec![2.0], vec![3.0], vec![4.0]]);
        let y = array![2.0, 4.0, 6.0, 8.0];

        let mut model = LinearRegression::with_intercept(false);
        model.train(&x, &y).unwrap();

        let coeffs = model.coefficients().unwrap();
        assert_eq!(coeffs.len(), 1);
        assert_abs_diff_eq!(coeffs[0], 2.0, epsilon = 1e-10);
        assert_eq!(model.intercept().unwrap(), 0.0);
    }

    #[test]
    fn test_collinear_features_are_singular() {
        // Second column is exactly twice the first.
        let x = m(&[
            vec![1.0, 2.0],
            vec![2.0, 4.0],
            vec![3.0, 6.0],
            vec![4.0, 8.0],
        ]);
        let y = array![1.0, 2.0, 3.0, 4.0];

        let mut model = LinearRegression::new();
        assert!(matches!(model.train(&x, &y), Err(MlError::Singular { .. })));
        assert!(model.coefficients().is_none());
    }

    #[test]
    fn test_failed_retrain_keeps_previous_fit() {
        let mut model = LinearRegression::new();
        model
            .train(&m(&[vec![1.0], vec![2.0], vec![3.0]]), &array![1.0, 2.0, 3.0])
            .unwrap();
        let before = model.parameters();

        let constant = m(&[vec![1.0], vec![1.0], vec![1.0]]);
        assert!(model.train(&constant, &array![1.0, 2.0, 3.0]).is_err());
        assert_eq!(model.parameters(), before);
    }

    #[test]
    fn test_predict_without_fit() {
        let x = m(&[vec![1.0], vec![2.0]]);
        let model = LinearRegression::new();

        assert!(matches!(model.predict(&x), Err(MlError::NotFitted(_))));
        assert_eq!(model.parameters().len(), 0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let x = m(&[vec![1.0], vec![2.0]]);
        let y = array![1.0, 2.0, 3.0];

        let mut model = LinearRegression::new();
        assert!(matches!(model.train(&x, &y), Err(MlError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_predict_width_mismatch() {
        let mut model = LinearRegression::new();
        model
            .train(&m(&[vec![1.0], vec![2.0], vec![3.0]]), &array![2.0, 4.0, 6.0])
            .unwrap();
        let wide = m(&[vec![1.0, 2.0]]);
        assert!(matches!(model.predict(&wide), Err(MlError::ShapeMismatch { .. })));
    }
}
