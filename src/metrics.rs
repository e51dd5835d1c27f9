//! Evaluation metrics for regression and classification predictions.

use crate::error::{MlError, Result};
use crate::{Matrix, Vector};

/// Two labels are the same class when they differ by less than this.
pub const LABEL_TOLERANCE: f64 = 1e-10;

fn check_pair(op: &'static str, y_true: &Vector, y_pred: &Vector) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(MlError::shape(op, (y_true.len(), 1), (y_pred.len(), 1)));
    }
    if y_true.is_empty() {
        return Err(MlError::InvalidArgument(format!("{op}: empty input")));
    }
    Ok(())
}

pub fn mean_squared_error(y_true: &Vector, y_pred: &Vector) -> Result<f64> {
    check_pair("mean_squared_error", y_true, y_pred)?;
    let diff = y_true - y_pred;
    Ok(diff.mapv(|x| x * x).sum() / diff.len() as f64)
}

pub fn root_mean_squared_error(y_true: &Vector, y_pred: &Vector) -> Result<f64> {
    Ok(mean_squared_error(y_true, y_pred)?.sqrt())
}

pub fn mean_absolute_error(y_true: &Vector, y_pred: &Vector) -> Result<f64> {
    check_pair("mean_absolute_error", y_true, y_pred)?;
    let diff = y_true - y_pred;
    Ok(diff.mapv(f64::abs).sum() / diff.len() as f64)
}

/// Coefficient of determination, 1 − SS_res / SS_tot.
///
/// Constant targets (SS_tot below 1e-10) score 1.0.
pub fn r2_score(y_true: &Vector, y_pred: &Vector) -> Result<f64> {
    check_pair("r2_score", y_true, y_pred)?;

    let y_mean = y_true.sum() / y_true.len() as f64;
    let ss_res = (y_true - y_pred).mapv(|x| x * x).sum();
    let ss_tot = y_true.mapv(|x| (x - y_mean) * (x - y_mean)).sum();

    if ss_tot < 1e-10 {
        return Ok(1.0);
    }
    Ok(1.0 - ss_res / ss_tot)
}

/// Fraction of predictions equal to the true label.
pub fn accuracy(y_true: &Vector, y_pred: &Vector) -> Result<f64> {
    check_pair("accuracy", y_true, y_pred)?;
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(a, p)| (*a - *p).abs() < LABEL_TOLERANCE)
        .count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Counts of (actual, predicted) label pairs.
///
/// Returns the sorted union of labels seen in either vector, and a square
/// matrix where `counts[(i, j)]` is the number of samples of class
/// `classes[i]` predicted as `classes[j]`.
pub fn confusion_matrix(y_true: &Vector, y_pred: &Vector) -> Result<(Vec<f64>, Matrix)> {
    check_pair("confusion_matrix", y_true, y_pred)?;

    let mut classes: Vec<f64> = y_true.iter().chain(y_pred.iter()).copied().collect();
    classes.sort_by(f64::total_cmp);
    classes.dedup_by(|a, b| (*a - *b).abs() < LABEL_TOLERANCE);

    let index_of = |label: f64| {
        classes
            .iter()
            .position(|&c| (c - label).abs() < LABEL_TOLERANCE)
            .ok_or_else(|| MlError::InvalidArgument(format!("unorderable label {label}")))
    };

    let mut counts = Matrix::zeros(classes.len(), classes.len());
    for (&actual, &predicted) in y_true.iter().zip(y_pred.iter()) {
        counts[(index_of(actual)?, index_of(predicted)?)] += 1.0;
    }
    Ok((classes, counts))
}
