use log::{debug, trace};

use crate::error::{MlError, Result};
use crate::model::{Model, check_samples, check_width};
use crate::{Matrix, Vector};

/// Predictions are kept this far from 0 and 1 inside the log-loss.
const PROBABILITY_EPSILON: f64 = 1e-15;

/// Binary logistic regression fitted by batch gradient descent.
///
/// `predict` returns probabilities; threshold them with
/// [`LogisticRegression::predict_labels`] when class labels are needed.
#[derive(Clone, Debug)]
pub struct LogisticRegression {
    coefficients: Option<Vector>,
    n_features: usize,
    iterations_run: usize,
    final_cost: Option<f64>,
    fit_intercept: bool,
    learning_rate: f64,
    max_iterations: usize,
    tolerance: f64,
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            n_features: 0,
            iterations_run: 0,
            final_cost: None,
            fit_intercept: true,
            learning_rate: 0.01,
            max_iterations: 1000,
            tolerance: 1e-4,
        }
    }

    /// # Panics
    ///
    /// Panics if `learning_rate` is not strictly positive.
    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        if learning_rate <= 0.0 {
            panic!("learning_rate must be > 0, got {}", learning_rate);
        }
        self.learning_rate = learning_rate;
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Training stops once the mean log-loss drops below `tolerance`.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance` is negative.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        if tolerance < 0.0 {
            panic!("tolerance must be >= 0, got {}", tolerance);
        }
        self.tolerance = tolerance;
        self
    }

    pub fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Learned coefficients, intercept first when one is fitted.
    pub fn coefficients(&self) -> Option<&Vector> {
        self.coefficients.as_ref()
    }

    /// Gradient steps taken by the last successful training run.
    pub fn iterations_run(&self) -> usize {
        self.iterations_run
    }

    /// Mean log-loss after the last successful training run.
    pub fn final_cost(&self) -> Option<f64> {
        self.final_cost
    }

    /// Class labels (`1.0` / `0.0`) by thresholding the probabilities.
    pub fn predict_labels(&self, features: &Matrix, threshold: f64) -> Result<Vector> {
        let probabilities = self.predict(features)?;
        Ok(probabilities.mapv(|p| if p >= threshold { 1.0 } else { 0.0 }))
    }

    /// Fraction of rows whose 0.5-thresholded label equals the target.
    pub fn score(&self, features: &Matrix, targets: &Vector) -> Result<f64> {
        let labels = self.predict_labels(features, 0.5)?;
        crate::metrics::accuracy(targets, &labels)
    }

    /// Saturates to exactly 0.0 or 1.0 for large |z|; `exp` overflowing to
    /// infinity still yields 0.0, never NaN.
    fn sigmoid(z: f64) -> f64 {
        1.0 / (1.0 + (-z).exp())
    }

    fn design_matrix(&self, features: &Matrix) -> Matrix {
        if self.fit_intercept {
            features.with_intercept()
        } else {
            features.clone()
        }
    }

    fn probabilities(x: &Matrix, weights: &Vector) -> Result<Vector> {
        Ok(x.matvec(weights)?.mapv(Self::sigmoid))
    }

    fn log_loss(y_true: &Vector, y_pred: &Vector) -> f64 {
        let loss = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(&y, &p)| {
                let p = p.clamp(PROBABILITY_EPSILON, 1.0 - PROBABILITY_EPSILON);
                -y * p.ln() - (1.0 - y) * (1.0 - p).ln()
            })
            .sum::<f64>();

        loss / y_true.len() as f64
    }

    /// Runs gradient descent and returns `(weights, iterations, final_cost)`.
    fn gradient_descent(&self, x: &Matrix, y: &Vector) -> Result<(Vector, usize, f64)> {
        let n_samples = x.rows() as f64;
        let xt = x.transpose();
        let mut weights = Vector::zeros(x.cols());
        let mut cost = Self::log_loss(y, &Self::probabilities(x, &weights)?);

        for iteration in 0..self.max_iterations {
            let predictions = Self::probabilities(x, &weights)?;
            let error = &predictions - y;
            let gradient = xt.matvec(&error)?;
            weights.scaled_add(-self.learning_rate / n_samples, &gradient);

            cost = Self::log_loss(y, &Self::probabilities(x, &weights)?);
            trace!("LogisticRegression: iteration {iteration} cost {cost:.6}");

            if cost < self.tolerance {
                debug!(
                    "LogisticRegression: converged after {} iterations, cost {cost:.6}",
                    iteration + 1
                );
                return Ok((weights, iteration + 1, cost));
            }
        }

        debug!(
            "LogisticRegression: reached max_iterations={} with cost {cost:.6}",
            self.max_iterations
        );
        Ok((weights, self.max_iterations, cost))
    }
}

impl Model for LogisticRegression {
    /// # Errors
    ///
    /// [`MlError::ShapeMismatch`] on a sample-count mismatch and
    /// [`MlError::InvalidArgument`] for an empty training set. Reaching
    /// `max_iterations` without converging is not an error.
    fn train(&mut self, features: &Matrix, targets: &Vector) -> Result<()> {
        check_samples("LogisticRegression::train", features, targets)?;
        if features.rows() == 0 {
            return Err(MlError::InvalidArgument(
                "LogisticRegression needs at least one sample".to_string(),
            ));
        }

        let x = self.design_matrix(features);
        let (weights, iterations, cost) = self.gradient_descent(&x, targets)?;

        self.coefficients = Some(weights);
        self.n_features = features.cols();
        self.iterations_run = iterations;
        self.final_cost = Some(cost);
        Ok(())
    }

    /// Probabilities in [0, 1], one per row. Scores far from the decision
    /// boundary saturate to exactly 0.0 or 1.0.
    fn predict(&self, features: &Matrix) -> Result<Vector> {
        let coeffs = self
            .coefficients
            .as_ref()
            .ok_or(MlError::NotFitted("LogisticRegression"))?;
        check_width(features, self.n_features)?;

        Self::probabilities(&self.design_matrix(features), coeffs)
    }

    fn parameters(&self) -> Vector {
        self.coefficients.clone().unwrap_or_else(|| Vector::zeros(0))
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn m(rows: &[Vec<f64>]) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    /// Two blobs centred on (-2, -2) and (2, 2), labelled 0 and 1.
    fn blobs(n_per_class: usize, seed: u64) -> (Matrix, Vector) {
        let mut rng = StdRng::seed_from_u64(seed);
        let noise = Matrix::random_uniform(2 * n_per_class, 2, -1.0, 1.0, &mut rng);
        let mut x = Matrix::zeros(2 * n_per_class, 2);
        let mut y = Vector::zeros(2 * n_per_class);
        for i in 0..2 * n_per_class {
            let (centre, label) = if i < n_per_class { (-2.0, 0.0) } else { (2.0, 1.0) };
            x[(i, 0)] = centre + noise[(i, 0)];
            x[(i, 1)] = centre + noise[(i, 1)];
            y[i] = label;
        }
        (x, y)
    }

    #[test]
    fn test_logistic_regression_simple() {
        let x = m(&[vec![1.0], vec![2.0], vec![3.0], vec![4.0]]);
        let y = array![0.0, 0.0, 1.0, 1.0];

        let mut model = LogisticRegression::new().learning_rate(0.5);
        model.train(&x, &y).unwrap();

        let probabilities = model.predict(&x).unwrap();
        assert_eq!(probabilities.len(), 4);
        assert!(probabilities[0] < 0.5);
        assert!(probabilities[3] > 0.5);
        assert!(probabilities.iter().all(|&p| p > 0.0 && p < 1.0));
    }

    #[test]
    fn test_separable_held_out_points() {
        let (x_train, y_train) = blobs(20, 1);
        let (x_test, y_test) = blobs(10, 2);

        let mut model = LogisticRegression::new().learning_rate(0.1);
        model.train(&x_train, &y_train).unwrap();

        let probabilities = model.predict(&x_test).unwrap();
        for (p, label) in probabilities.iter().zip(y_test.iter()) {
            if *label == 1.0 {
                assert!(*p > 0.5, "class 1 point got probability {p}");
            } else {
                assert!(*p < 0.5, "class 0 point got probability {p}");
            }
        }
        assert_abs_diff_eq!(model.score(&x_test, &y_test).unwrap(), 1.0);
    }

    #[test]
    fn test_converges_early_with_loose_tolerance() {
        let (x, y) = blobs(10, 3);
        let mut model = LogisticRegression::new()
            .learning_rate(0.5)
            .tolerance(0.3)
            .max_iterations(10_000);
        model.train(&x, &y).unwrap();

        assert!(model.iterations_run() < 10_000);
        assert!(model.final_cost().unwrap() < 0.3);
    }

    #[test]
    fn test_iteration_cap_is_not_an_error() {
        let x = m(&[vec![1.0], vec![2.0], vec![3.0], vec![4.0]]);
        let y = array![0.0, 1.0, 0.0, 1.0];

        let mut model = LogisticRegression::new().max_iterations(5);
        model.train(&x, &y).unwrap();
        assert_eq!(model.iterations_run(), 5);
        assert!(model.final_cost().unwrap().is_finite());
    }

    #[test]
    fn test_parameters_include_intercept() {
        let x = m(&[vec![1.0, 0.0], vec![0.0, 1.0]]);
        let y = array![1.0, 0.0];

        let mut model = LogisticRegression::new().max_iterations(1);
        model.train(&x, &y).unwrap();
        assert_eq!(model.parameters().len(), 3);

        let mut model = LogisticRegression::new().fit_intercept(false).max_iterations(1);
        model.train(&x, &y).unwrap();
        assert_eq!(model.parameters().len(), 2);
    }

    #[test]
    fn test_first_step_matches_hand_computed_gradient() {
        // With zero weights every prediction is 0.5.
        let x = m(&[vec![2.0], vec![-1.0]]);
        let y = array![1.0, 0.0];

        let mut model = LogisticRegression::new().learning_rate(1.0).max_iterations(1);
        model.train(&x, &y).unwrap();

        // intercept gradient: (0.5 - 1) + (0.5 - 0) = 0
        // weight gradient: (0.5 - 1) * 2 + (0.5 - 0) * -1 = -1.5
        let params = model.parameters();
        assert_abs_diff_eq!(params[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(params[1], 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_predict_labels() {
        let x = m(&[vec![1.0], vec![2.0], vec![3.0], vec![4.0]]);
        let y = array![0.0, 0.0, 1.0, 1.0];

        let mut model = LogisticRegression::new().learning_rate(0.5);
        model.train(&x, &y).unwrap();
        assert_eq!(model.predict_labels(&x, 0.5).unwrap(), y);
    }

    #[test]
    fn test_log_loss_is_finite_at_saturation() {
        let loss = LogisticRegression::log_loss(&array![1.0, 0.0], &array![0.0, 1.0]);
        assert!(loss.is_finite());
        assert!(loss > 30.0);
    }

    #[test]
    fn test_empty_training_set() {
        let mut model = LogisticRegression::new();
        let result = model.train(&Matrix::zeros(0, 2), &Vector::zeros(0));
        assert!(matches!(result, Err(MlError::InvalidArgument(_))));
    }

    #[test]
    fn test_logistic_regression_predict_without_fit() {
        let x = m(&[vec![1.0], vec![2.0]]);
        let model = LogisticRegression::new();

        assert!(model.predict(&x).is_err());
        assert!(model.predict_labels(&x, 0.5).is_err());
    }

    #[test]
    fn test_sigmoid_function() {
        assert_abs_diff_eq!(LogisticRegression::sigmoid(0.0), 0.5, epsilon = 1e-10);
        assert!(LogisticRegression::sigmoid(1000.0) > 0.99);
        assert!(LogisticRegression::sigmoid(-1000.0) < 0.01);
    }

    #[test]
    fn test_sigmoid_saturates_without_nan() {
        assert_eq!(LogisticRegression::sigmoid(1000.0), 1.0);
        assert_eq!(LogisticRegression::sigmoid(-1000.0), 0.0);
        assert_eq!(LogisticRegression::sigmoid(f64::INFINITY), 1.0);
        assert_eq!(LogisticRegression::sigmoid(f64::NEG_INFINITY), 0.0);
        let p = LogisticRegression::sigmoid(-30.0);
        assert!(p > 0.0 && p < 1e-12);
    }

    #[test]
    #[should_panic(expected = "learning_rate must be > 0")]
    fn test_invalid_learning_rate() {
        let _ = LogisticRegression::new().learning_rate(0.0);
    }
}
