use std::io;
use std::path::Path;

use log::debug;
use ndarray::Axis;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{MlError, Result};
use crate::{Matrix, Vector};

/// Feature matrix paired with one target per row.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub features: Matrix,
    pub targets: Vector,
    /// Column names from a CSV header, empty when there was none.
    pub feature_names: Vec<String>,
}

impl Dataset {
    pub fn new(features: Matrix, targets: Vector) -> Result<Self> {
        if features.rows() != targets.len() {
            return Err(MlError::samples("Dataset::new", features.rows(), targets.len()));
        }

        Ok(Self {
            features,
            targets,
            feature_names: Vec::new(),
        })
    }

    pub fn n_samples(&self) -> usize {
        self.features.rows()
    }

    pub fn n_features(&self) -> usize {
        self.features.cols()
    }

    /// Loads a delimited file whose last column is the target.
    pub fn from_csv<P: AsRef<Path>>(path: P, has_header: bool, delimiter: u8) -> Result<Self> {
        let path = path.as_ref();
        debug!("Dataset: reading {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, has_header, delimiter)
    }

    /// Like [`Dataset::from_csv`] over any reader. Cells are trimmed; blank
    /// lines are skipped.
    ///
    /// # Errors
    ///
    /// [`MlError::Parse`] names the line and column of a non-numeric cell,
    /// [`MlError::Csv`] covers malformed or ragged records, and
    /// [`MlError::InvalidArgument`] is returned when there are no data rows
    /// or fewer than two columns.
    pub fn from_reader<R: io::Read>(reader: R, has_header: bool, delimiter: u8) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(has_header)
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut feature_names: Vec<String> = if has_header {
            reader.headers()?.iter().map(str::to_string).collect()
        } else {
            Vec::new()
        };
        feature_names.pop();

        let mut rows = Vec::new();
        let mut targets = Vec::new();
        for record in reader.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());
            if record.len() < 2 {
                return Err(MlError::InvalidArgument(format!(
                    "line {}: need at least one feature column and a target",
                    line
                )));
            }

            let mut values = record
                .iter()
                .enumerate()
                .map(|(column, cell)| {
                    cell.parse::<f64>().map_err(|_| MlError::Parse {
                        line,
                        column: column + 1,
                        value: cell.to_string(),
                    })
                })
                .collect::<Result<Vec<f64>>>()?;

            targets.push(values.pop().unwrap_or_default());
            rows.push(values);
        }

        if rows.is_empty() {
            return Err(MlError::InvalidArgument("CSV input has no data rows".to_string()));
        }
        debug!("Dataset: loaded {} rows x {} features", rows.len(), rows[0].len());

        let mut dataset = Self::new(Matrix::from_rows(&rows)?, Vector::from(targets))?;
        dataset.feature_names = feature_names;
        Ok(dataset)
    }

    /// Splits into `(train, test)`, putting `floor(n * train_ratio)` samples
    /// in the training half.
    ///
    /// With `shuffle` the rows are permuted first, from `random_state` when
    /// given or a fresh entropy source otherwise. Without it the original
    /// order is kept.
    ///
    /// # Errors
    ///
    /// [`MlError::InvalidArgument`] when `train_ratio` is outside `(0, 1)`.
    pub fn train_test_split(
        &self,
        train_ratio: f64,
        shuffle: bool,
        random_state: Option<u64>,
    ) -> Result<(Self, Self)> {
        if !(train_ratio > 0.0 && train_ratio < 1.0) {
            return Err(MlError::InvalidArgument(format!(
                "train_ratio must be between 0 and 1, got {}",
                train_ratio
            )));
        }

        let n_samples = self.n_samples();
        let n_train = (n_samples as f64 * train_ratio).floor() as usize;

        let mut indices: Vec<usize> = (0..n_samples).collect();
        if shuffle {
            let mut rng = match random_state {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            indices.shuffle(&mut rng);
        }
        let (train_idx, test_idx) = indices.split_at(n_train);

        Ok((self.subset(train_idx), self.subset(test_idx)))
    }

    fn subset(&self, indices: &[usize]) -> Self {
        Self {
            features: Matrix::from(self.features.as_array().select(Axis(0), indices)),
            targets: self.targets.select(Axis(0), indices),
            feature_names: self.feature_names.clone(),
        }
    }
}
