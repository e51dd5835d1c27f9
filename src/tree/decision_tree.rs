use std::collections::HashMap;

use log::debug;
use ndarray::ArrayView1;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::{MlError, Result};
use crate::model::{Model, check_samples, check_width};
use crate::{Matrix, Vector};

/// A node of a fitted tree. Children are indices into the tree's node arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Node {
    Leaf {
        value: f64,
    },
    /// Samples with `x[feature] <= threshold` go to `left`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Binary decision tree grown greedily on Gini impurity.
///
/// Every distinct target value is a class for the impurity computation,
/// while leaves predict the mean target of the samples that reach them. For
/// classification that mean is a continuous estimate rather than a label.
#[derive(Clone, Debug)]
pub struct DecisionTree {
    /// Root is `nodes[0]`; empty until trained.
    nodes: Vec<Node>,
    n_features: usize,
    max_depth: usize,
    min_samples_split: usize,
    max_features: Option<usize>,
    random_state: Option<u64>,
}

impl DecisionTree {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            n_features: 0,
            max_depth: 5,
            min_samples_split: 2,
            max_features: None,
            random_state: None,
        }
    }

    /// Deepest level at which a node may still split; 0 gives a single leaf.
    /// `usize::MAX` grows until nodes are pure or unsplittable.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    /// Considers a random subset of `max_features` features at each node.
    ///
    /// # Panics
    ///
    /// Panics if `max_features` is 0.
    pub fn max_features(mut self, max_features: usize) -> Self {
        if max_features == 0 {
            panic!("max_features must be > 0, got {}", max_features);
        }
        self.max_features = Some(max_features);
        self
    }

    /// Seeds feature subsampling. Without a seed each `train` call draws
    /// from a fresh entropy source.
    pub fn random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    /// Longest root-to-leaf path; a single leaf has depth 0.
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        let mut deepest = 0;
        let mut stack = vec![(0, 0)];
        while let Some((id, level)) = stack.pop() {
            match self.nodes[id] {
                Node::Leaf { .. } => deepest = deepest.max(level),
                Node::Split { left, right, .. } => {
                    stack.push((left, level + 1));
                    stack.push((right, level + 1));
                }
            }
        }
        deepest
    }

    fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut id = 0;
        loop {
            match self.nodes[id] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => id = if row[feature] <= threshold { left } else { right },
            }
        }
    }
}

impl Model for DecisionTree {
    /// # Errors
    ///
    /// [`MlError::ShapeMismatch`] on a sample-count mismatch and
    /// [`MlError::InvalidArgument`] for an empty training set. The previous
    /// tree is kept on failure and replaced on success.
    fn train(&mut self, features: &Matrix, targets: &Vector) -> Result<()> {
        check_samples("DecisionTree::train", features, targets)?;
        if features.rows() == 0 {
            return Err(MlError::InvalidArgument(
                "DecisionTree needs at least one sample".to_string(),
            ));
        }

        let n_features = features.cols();
        let rng = match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (classes, n_classes) = encode_classes(targets);

        let mut builder = TreeBuilder {
            features,
            targets,
            classes,
            n_classes,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            max_features: self.max_features.map_or(n_features, |m| m.min(n_features)),
            rng,
            nodes: Vec::new(),
        };
        let rows: Vec<usize> = (0..features.rows()).collect();
        builder.build(rows);

        self.nodes = builder.nodes;
        self.n_features = n_features;
        debug!(
            "DecisionTree: grew {} nodes ({} leaves, depth {}) from {} samples",
            self.n_nodes(),
            self.n_leaves(),
            self.depth(),
            features.rows()
        );
        Ok(())
    }

    fn predict(&self, features: &Matrix) -> Result<Vector> {
        if self.nodes.is_empty() {
            return Err(MlError::NotFitted("DecisionTree"));
        }
        check_width(features, self.n_features)?;

        Ok(features.row_iter().map(|row| self.predict_row(row)).collect())
    }

    /// Always empty: a tree has no flat coefficient representation.
    fn parameters(&self) -> Vector {
        Vector::zeros(0)
    }
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps each distinct target value to a dense class id. `0.0` and `-0.0`
/// share an id.
fn encode_classes(targets: &Vector) -> (Vec<usize>, usize) {
    let mut ids: HashMap<u64, usize> = HashMap::new();
    let classes = targets
        .iter()
        .map(|&t| {
            let key = if t == 0.0 { 0 } else { t.to_bits() };
            let next = ids.len();
            *ids.entry(key).or_insert(next)
        })
        .collect();
    (classes, ids.len())
}

/// Gini impurity `1 - Σ p_c²` of a class histogram holding `n` samples.
fn gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

#[derive(Clone, Copy, Debug)]
struct Split {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

/// A node still to be grown, and where to link it in its parent.
struct Pending {
    rows: Vec<usize>,
    depth: usize,
    parent: Option<(usize, bool)>,
}

struct TreeBuilder<'a> {
    features: &'a Matrix,
    targets: &'a Vector,
    classes: Vec<usize>,
    n_classes: usize,
    max_depth: usize,
    min_samples_split: usize,
    max_features: usize,
    rng: StdRng,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    /// Grows the tree depth-first from an explicit work stack, so deep trees
    /// never exhaust the call stack. Nodes are numbered in pre-order with the
    /// left subtree first.
    fn build(&mut self, rows: Vec<usize>) {
        let mut pending: Vec<Pending> = vec![Pending {
            rows,
            depth: 0,
            parent: None,
        }];

        while let Some(Pending { rows, depth, parent }) = pending.pop() {
            let id = self.nodes.len();
            let value = self.mean_target(&rows);
            self.nodes.push(Node::Leaf { value });
            if let Some((parent, is_left)) = parent {
                if let Node::Split { left, right, .. } = &mut self.nodes[parent] {
                    if is_left {
                        *left = id;
                    } else {
                        *right = id;
                    }
                }
            }

            if rows.is_empty() || depth >= self.max_depth || rows.len() < self.min_samples_split {
                continue;
            }
            let Some(split) = self.best_split(&rows) else {
                continue;
            };

            let x = self.features;
            let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
                .iter()
                .copied()
                .partition(|&r| x[(r, split.feature)] <= split.threshold);

            // Children are linked when they are popped.
            self.nodes[id] = Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left: id,
                right: id,
            };
            pending.push(Pending {
                rows: right_rows,
                depth: depth + 1,
                parent: Some((id, false)),
            });
            pending.push(Pending {
                rows: left_rows,
                depth: depth + 1,
                parent: Some((id, true)),
            });
        }
    }

    fn mean_target(&self, rows: &[usize]) -> f64 {
        if rows.is_empty() {
            return 0.0;
        }
        rows.iter().map(|&r| self.targets[r]).sum::<f64>() / rows.len() as f64
    }

    fn class_counts(&self, rows: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &r in rows {
            counts[self.classes[r]] += 1;
        }
        counts
    }

    /// Lowest weighted impurity over the candidate features, if it beats
    /// the impurity of the node itself. Ties keep the lower feature index.
    fn best_split(&mut self, rows: &[usize]) -> Option<Split> {
        let n_features = self.features.cols();
        let candidates: Vec<usize> = if self.max_features < n_features {
            let mut picked =
                rand::seq::index::sample(&mut self.rng, n_features, self.max_features).into_vec();
            picked.sort_unstable();
            picked
        } else {
            (0..n_features).collect()
        };

        let node_impurity = gini(&self.class_counts(rows), rows.len());
        let mut best: Option<Split> = None;
        for feature in candidates {
            let Some((threshold, impurity)) = self.best_threshold(rows, feature) else {
                continue;
            };
            if best.is_none_or(|b| impurity < b.impurity) {
                best = Some(Split {
                    feature,
                    threshold,
                    impurity,
                });
            }
        }

        best.filter(|b| b.impurity < node_impurity)
    }

    /// Scans midpoints between consecutive distinct values of `feature`,
    /// returning `(threshold, weighted_impurity)` of the best one.
    fn best_threshold(&self, rows: &[usize], feature: usize) -> Option<(f64, f64)> {
        let mut pairs: Vec<(f64, usize)> = rows
            .iter()
            .map(|&r| (self.features[(r, feature)], self.classes[r]))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let n = pairs.len();
        let mut left = vec![0; self.n_classes];
        let mut right = self.class_counts(rows);
        let mut n_left = 0;
        let mut best: Option<(f64, f64)> = None;

        for i in 1..n {
            let (prev, curr) = (pairs[i - 1].0, pairs[i].0);
            if prev == curr {
                continue;
            }
            let threshold = (prev + curr) / 2.0;
            if threshold.is_nan() {
                continue;
            }
            while n_left < n && pairs[n_left].0 <= threshold {
                let class = pairs[n_left].1;
                left[class] += 1;
                right[class] -= 1;
                n_left += 1;
            }

            let n_right = n - n_left;
            let impurity = (n_left as f64 * gini(&left, n_left)
                + n_right as f64 * gini(&right, n_right))
                / n as f64;
            if best.is_none_or(|(_, b)| impurity < b) {
                best = Some((threshold, impurity));
            }
        }
        best
    }
}
