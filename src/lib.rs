//! Supervised learning on tabular data: a dense matrix kernel and four models
//! built on it.
//!
//! - [`Matrix`]: checked arithmetic, transpose, determinant, inverse
//! - [`LinearRegression`]: closed-form least squares (normal equations)
//! - [`LogisticRegression`]: batch gradient descent on the log-loss
//! - [`DecisionTree`]: greedy Gini splits, mean-valued leaves
//! - [`KNNClassifier`]: lazy Euclidean k-nearest-neighbour voting
//!
//! Every model implements [`Model`]. The [`dataset`], [`preprocessing`],
//! [`stats`] and [`metrics`] modules cover loading, splitting, scaling and
//! scoring around them.
//!
//! The crate logs through the [`log`] facade and never installs a logger.
//!
//! # Examples
//!
//! ```rust
//! use tabular_ml::{LinearRegression, Matrix, Model};
//! use ndarray::array;
//!
//! let x = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0], vec![4.0]]).unwrap();
//! let y = array![3.0, 5.0, 7.0, 9.0];
//!
//! let mut model = LinearRegression::new();
//! model.train(&x, &y).unwrap();
//! let params = model.parameters();
//! assert!((params[0] - 1.0).abs() < 1e-9);
//! assert!((params[1] - 2.0).abs() < 1e-9);
//! ```

pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

pub mod dataset;
pub mod error;
pub mod linear_model;
pub mod matrix;
pub mod metrics;
pub mod model;
pub mod neighbors;
pub mod preprocessing;
pub mod stats;
pub mod tree;

pub use dataset::Dataset;
pub use error::{MlError, Result};
pub use linear_model::{LinearRegression, LogisticRegression};
pub use matrix::Matrix;
pub use model::Model;
pub use neighbors::KNNClassifier;
pub use preprocessing::{MinMaxScaler, StandardScaler};
pub use tree::DecisionTree;

/// Target and prediction vectors.
pub type Vector = Array1<f64>;
