//! Linear models for regression and classification.
//!
//! This module provides implementations of linear models including:
//! - `LinearRegression`: Ordinary least squares via the normal equations
//! - `LogisticRegression`: Logistic regression for binary classification
//!
//! # Examples
//!
//! ## Linear Regression
//! ```rust
//! use tabular_ml::{LinearRegression, Matrix, Model};
//! use ndarray::array;
//!
//! let x = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0]]).unwrap();
//! let y = array![2.0, 4.0, 6.0];
//!
//! let mut model = LinearRegression::new();
//! model.train(&x, &y).unwrap();
//! let predictions = model.predict(&x).unwrap();
//! ```
//!
//! ## Logistic Regression
//! ```rust
//! use tabular_ml::{LogisticRegression, Matrix, Model};
//! use ndarray::array;
//!
//! let x = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0], vec![4.0]]).unwrap();
//! let y = array![0.0, 0.0, 1.0, 1.0];
//!
//! let mut model = LogisticRegression::new().learning_rate(0.5);
//! model.train(&x, &y).unwrap();
//! let probabilities = model.predict(&x).unwrap();
//! let labels = model.predict_labels(&x, 0.5).unwrap();
//! ```

mod linear_regression;
mod logistic_regression;

pub use linear_regression::LinearRegression;
pub use logistic_regression::LogisticRegression;
