use std::cmp::Ordering;

use log::debug;
use ndarray::ArrayView1;

use crate::error::{MlError, Result};
use crate::model::{Model, check_samples, check_width};
use crate::{Matrix, Vector};

/// Euclidean distance between two equally long rows.
pub fn euclidean_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// K-nearest-neighbours classifier.
///
/// Training only stores a copy of the data. Each prediction ranks every
/// stored row by Euclidean distance and returns the most common target among
/// the `k` closest; equal vote counts go to the smallest target value.
#[derive(Clone, Debug)]
pub struct KNNClassifier {
    k: usize,
    training: Option<(Matrix, Vector)>,
}

impl KNNClassifier {
    /// # Panics
    ///
    /// Panics if `k` is 0.
    pub fn new(k: usize) -> Self {
        if k == 0 {
            panic!("k must be > 0, got {}", k);
        }
        Self { k, training: None }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Indices of the `k` training rows closest to `query`, nearest first.
    /// Equal distances are ordered by row index.
    pub fn neighbors(&self, query: ArrayView1<'_, f64>) -> Result<Vec<usize>> {
        let (features, _) = self
            .training
            .as_ref()
            .ok_or(MlError::NotFitted("KNNClassifier"))?;
        if query.len() != features.cols() {
            return Err(MlError::shape(
                "KNNClassifier::neighbors",
                (1, features.cols()),
                (1, query.len()),
            ));
        }
        Ok(self.nearest(features, query))
    }

    fn nearest(&self, features: &Matrix, query: ArrayView1<'_, f64>) -> Vec<usize> {
        let mut ranked: Vec<(f64, usize)> = features
            .row_iter()
            .enumerate()
            .map(|(i, row)| (euclidean_distance(row, query), i))
            .collect();

        let by_distance = |a: &(f64, usize), b: &(f64, usize)| -> Ordering {
            a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
        };
        let k = self.k.min(ranked.len());
        if k < ranked.len() {
            ranked.select_nth_unstable_by(k - 1, by_distance);
            ranked.truncate(k);
        }
        ranked.sort_unstable_by(by_distance);

        ranked.into_iter().map(|(_, i)| i).collect()
    }
}

/// Most frequent label; ties resolve to the smallest label.
fn majority_vote(mut labels: Vec<f64>) -> f64 {
    // -0.0 and 0.0 vote together
    for label in labels.iter_mut() {
        *label += 0.0;
    }
    labels.sort_unstable_by(f64::total_cmp);

    let mut best = (f64::NAN, 0);
    let mut i = 0;
    while i < labels.len() {
        let run = labels[i..].iter().take_while(|&&l| l == labels[i]).count().max(1);
        if run > best.1 {
            best = (labels[i], run);
        }
        i += run;
    }
    best.0
}

impl Model for KNNClassifier {
    /// Replaces the stored training set. Fails with
    /// [`MlError::ShapeMismatch`] when the sample counts disagree, keeping
    /// the previous set.
    fn train(&mut self, features: &Matrix, targets: &Vector) -> Result<()> {
        check_samples("KNNClassifier::train", features, targets)?;
        debug!(
            "KNNClassifier: stored {} samples x {} features (k = {})",
            features.rows(),
            features.cols(),
            self.k
        );
        self.training = Some((features.clone(), targets.clone()));
        Ok(())
    }

    /// # Errors
    ///
    /// [`MlError::NotFitted`] before training, [`MlError::ShapeMismatch`] for
    /// a width mismatch and [`MlError::InvalidArgument`] when the stored
    /// training set is empty.
    fn predict(&self, features: &Matrix) -> Result<Vector> {
        let (train_x, train_y) = self
            .training
            .as_ref()
            .ok_or(MlError::NotFitted("KNNClassifier"))?;
        check_width(features, train_x.cols())?;
        if train_x.rows() == 0 && features.rows() > 0 {
            return Err(MlError::InvalidArgument(
                "KNNClassifier has no training samples to vote".to_string(),
            ));
        }

        Ok(features
            .row_iter()
            .map(|query| {
                let labels = self
                    .nearest(train_x, query)
                    .into_iter()
                    .map(|i| train_y[i])
                    .collect();
                majority_vote(labels)
            })
            .collect())
    }

    fn parameters(&self) -> Vector {
        Vector::zeros(0)
    }
}
