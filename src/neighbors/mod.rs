//! Instance-based learning.
//!
//! `KNNClassifier` keeps its training set and votes among the nearest rows
//! at prediction time.
//!
//! # Examples
//!
//! ```rust
//! use tabular_ml::{KNNClassifier, Matrix, Model};
//! use ndarray::array;
//!
//! let x = Matrix::from_rows(&[vec![0.0], vec![1.0], vec![9.0], vec![10.0]]).unwrap();
//! let y = array![0.0, 0.0, 1.0, 1.0];
//!
//! let mut knn = KNNClassifier::new(3);
//! knn.train(&x, &y).unwrap();
//! let query = Matrix::from_rows(&[vec![0.5], vec![9.5]]).unwrap();
//! assert_eq!(knn.predict(&query).unwrap(), array![0.0, 1.0]);
//! ```

mod knn;

pub use knn::{KNNClassifier, euclidean_distance};
