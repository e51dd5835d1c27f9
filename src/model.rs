//! The train / predict / parameters contract shared by every model.

use crate::error::Result;
use crate::{Matrix, Vector};

/// A supervised model trained on a feature matrix and an aligned target vector.
///
/// Implementors own their learned state exclusively. A failed `train` leaves
/// the model exactly as it was before the call.
///
/// # Examples
///
/// ```rust
/// use tabular_ml::{DecisionTree, KNNClassifier, LinearRegression, Matrix, Model};
/// use ndarray::array;
///
/// let x = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0]]).unwrap();
/// let y = array![2.0, 4.0, 6.0];
///
/// let mut models: Vec<Box<dyn Model>> = vec![
///     Box::new(LinearRegression::new()),
///     Box::new(KNNClassifier::new(1)),
///     Box::new(DecisionTree::new()),
/// ];
/// for model in models.iter_mut() {
///     model.train(&x, &y).unwrap();
///     assert_eq!(model.predict(&x).unwrap().len(), 3);
/// }
/// ```
pub trait Model {
    /// Fits the model.
    ///
    /// # Errors
    ///
    /// Fails when `features.rows() != targets.len()`, and with the
    /// model-specific errors documented on each implementor.
    fn train(&mut self, features: &Matrix, targets: &Vector) -> Result<()>;

    /// Predicts one value per row of `features`.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::MlError::NotFitted`] before a successful `train`, or
    /// when the feature count differs from training.
    fn predict(&self, features: &Matrix) -> Result<Vector>;

    /// Flat learned coefficients; empty for models without them.
    fn parameters(&self) -> Vector;
}

/// Rejects feature/target sets whose sample counts disagree.
pub(crate) fn check_samples(op: &'static str, features: &Matrix, targets: &Vector) -> Result<()> {
    if features.rows() != targets.len() {
        return Err(crate::MlError::samples(op, features.rows(), targets.len()));
    }
    Ok(())
}

/// Rejects prediction input whose width differs from the training width.
pub(crate) fn check_width(features: &Matrix, n_features: usize) -> Result<()> {
    if features.cols() != n_features {
        return Err(crate::MlError::shape(
            "predict",
            (features.rows(), n_features),
            features.shape(),
        ));
    }
    Ok(())
}
