//! Error types shared by the matrix kernel, the models and the data helpers.

use thiserror::Error;

/// Errors raised by `tabular-ml` operations.
///
/// Every variant is raised synchronously at the point of detection and
/// propagated to the immediate caller; nothing is retried internally.
#[derive(Debug, Error)]
pub enum MlError {
    /// Operand shapes are incompatible (element-wise ops, products,
    /// feature/target length disagreement).
    #[error("shape mismatch in {op}: expected {expected}, got {actual}")]
    ShapeMismatch {
        op: &'static str,
        expected: String,
        actual: String,
    },

    /// A reshape or flat-buffer construction does not preserve the element count.
    #[error("size mismatch: {expected} elements required, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Operation requires a square matrix.
    #[error("{op} requires a square matrix, got {rows}x{cols}")]
    NotSquare {
        op: &'static str,
        rows: usize,
        cols: usize,
    },

    #[error("index {index} out of range for {axis} of length {len}")]
    IndexOutOfRange {
        axis: &'static str,
        index: usize,
        len: usize,
    },

    /// Matrix is not invertible within the pivot tolerance.
    #[error("matrix is singular: pivot {pivot:e} at row {row} is below tolerance")]
    Singular { row: usize, pivot: f64 },

    /// Malformed input, e.g. ragged rows or an empty training set.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0} is not fitted yet")]
    NotFitted(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A CSV cell could not be parsed as a number.
    #[error("cannot parse {value:?} at line {line}, column {column}")]
    Parse {
        line: u64,
        column: usize,
        value: String,
    },
}

impl MlError {
    /// Builds a [`MlError::ShapeMismatch`] from two `(rows, cols)` shapes.
    pub(crate) fn shape(op: &'static str, expected: (usize, usize), actual: (usize, usize)) -> Self {
        MlError::ShapeMismatch {
            op,
            expected: format!("{}x{}", expected.0, expected.1),
            actual: format!("{}x{}", actual.0, actual.1),
        }
    }

    /// Builds a [`MlError::ShapeMismatch`] for feature rows vs target length.
    pub(crate) fn samples(op: &'static str, n_rows: usize, n_targets: usize) -> Self {
        MlError::ShapeMismatch {
            op,
            expected: format!("{n_rows} targets"),
            actual: format!("{n_targets} targets"),
        }
    }
}

/// Result type for `tabular-ml` operations.
pub type Result<T> = std::result::Result<T, MlError>;
