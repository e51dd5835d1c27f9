//! Decision trees.
//!
//! `DecisionTree` grows a binary tree greedily, picking at each node the
//! feature and midpoint threshold with the lowest weighted Gini impurity.
//!
//! # Examples
//!
//! ```rust
//! use tabular_ml::{DecisionTree, Matrix, Model};
//! use ndarray::array;
//!
//! let x = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![10.0], vec![11.0]]).unwrap();
//! let y = array![0.0, 0.0, 1.0, 1.0];
//!
//! let mut tree = DecisionTree::new().max_depth(3);
//! tree.train(&x, &y).unwrap();
//! assert_eq!(tree.predict(&x).unwrap(), y);
//! ```

mod decision_tree;

pub use decision_tree::{DecisionTree, Node};
