//! Testing utilities for pathforest.
//!
//! This module provides assertion helpers and a compact tree literal that
//! can be used in both unit tests and integration tests.
//!
//! ```ignore
//! use pathforest::class_tree;
//!
//! let tree = class_tree! {
//!     0 => num(0, 2.0) -> 1, 2,
//!     1 => leaf(1.0, 0.0),
//!     2 => leaf(0.25, 0.75),
//! };
//! ```

use ndarray::Array2;

use crate::repr::{NodeId, Tree, NO_CHILD};

// =============================================================================
// Constants
// =============================================================================

/// Default tolerance for floating point comparisons of percentages and
/// confidences.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

// =============================================================================
// Floating Point Assertions
// =============================================================================

/// Assert that two f64 values are approximately equal.
///
/// Uses absolute difference comparison with the given tolerance.
///
/// # Examples
///
/// ```
/// # use pathforest::assert_approx_eq;
/// assert_approx_eq!(1.0f64, 1.0001f64, 0.001);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let left_val: f64 = $left;
        let right_val: f64 = $right;
        let tol: f64 = $tolerance;
        let diff = (left_val - right_val).abs();
        if diff > tol {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`\n right: `{:?}`\n  diff: `{:?}` > tolerance `{:?}`",
                left_val, right_val, diff, tol
            );
        }
    }};
    ($left:expr, $right:expr, $tolerance:expr, $($arg:tt)+) => {{
        let left_val: f64 = $left;
        let right_val: f64 = $right;
        let tol: f64 = $tolerance;
        let diff = (left_val - right_val).abs();
        if diff > tol {
            panic!(
                "assertion failed: `(left ≈ right)` - {}\n  left: `{:?}`\n right: `{:?}`\n  diff: `{:?}` > tolerance `{:?}`",
                format_args!($($arg)+), left_val, right_val, diff, tol
            );
        }
    }};
}

/// Assert that two slices of f64 values are approximately equal element-wise.
///
/// # Panics
///
/// Panics if lengths differ or any element differs by more than tolerance.
pub fn assert_slice_approx_eq(actual: &[f64], expected: &[f64], tolerance: f64, context: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{context}: length mismatch - got {}, expected {}",
        actual.len(),
        expected.len()
    );
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            approx::abs_diff_eq!(*a, *e, epsilon = tolerance),
            "{context}: element {i} differs - got {a}, expected {e} (tolerance {tolerance})"
        );
    }
}

// =============================================================================
// Tree Literals
// =============================================================================

/// Build a [`Tree`](crate::repr::Tree) from a compact node listing.
///
/// Each entry is either a numeric split `id => num(feature, threshold) -> left, right`
/// or a leaf `id => leaf(p0, p1, ...)` with its class probabilities.
#[macro_export]
macro_rules! class_tree {
    (@node $builder:ident, $id:literal, num ( $feature:expr, $threshold:expr ) -> $left:literal, $right:literal) => {
        $builder.split($id, $feature, $threshold, $left, $right);
    };
    (@node $builder:ident, $id:literal, leaf ( $($p:expr),* )) => {
        $builder.leaf($id, &[$($p as f64),*]);
    };
    ( $( $id:literal => $kind:ident ( $($arg:expr),* $(,)? ) $( -> $left:literal , $right:literal )? ),* $(,)? ) => {{
        let mut builder = $crate::testing::TreeBuilder::new();
        $( $crate::class_tree!(@node builder, $id, $kind ( $($arg),* ) $( -> $left, $right )?); )*
        builder.build()
    }};
}

#[derive(Debug, Clone)]
enum NodeDraft {
    Unset,
    Split {
        feature: u32,
        threshold: f64,
        left: NodeId,
        right: NodeId,
    },
    Leaf(Vec<f64>),
}

/// Incremental tree construction for tests.
///
/// Node ids may be assigned in any order; [`build`](Self::build) panics if an
/// id in `0..n_nodes` was never defined or leaves disagree on class count.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    nodes: Vec<NodeDraft>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of node slots allocated so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn slot(&mut self, id: NodeId) -> &mut NodeDraft {
        let idx = id as usize;
        if idx >= self.nodes.len() {
            self.nodes.resize(idx + 1, NodeDraft::Unset);
        }
        &mut self.nodes[idx]
    }

    /// Define a numeric split node.
    pub fn split(
        &mut self,
        id: NodeId,
        feature: u32,
        threshold: f64,
        left: NodeId,
        right: NodeId,
    ) -> &mut Self {
        *self.slot(id) = NodeDraft::Split {
            feature,
            threshold,
            left,
            right,
        };
        self
    }

    /// Define a leaf node with its class distribution.
    pub fn leaf(&mut self, id: NodeId, probabilities: &[f64]) -> &mut Self {
        *self.slot(id) = NodeDraft::Leaf(probabilities.to_vec());
        self
    }

    /// Finish the tree.
    ///
    /// Split nodes receive an all-zero distribution row.
    pub fn build(&self) -> Tree {
        let n_classes = self
            .nodes
            .iter()
            .find_map(|n| match n {
                NodeDraft::Leaf(p) => Some(p.len()),
                _ => None,
            })
            .expect("tree literal needs at least one leaf");

        let n_nodes = self.nodes.len();
        let mut split_indices = Vec::with_capacity(n_nodes);
        let mut thresholds = Vec::with_capacity(n_nodes);
        let mut lefts = Vec::with_capacity(n_nodes);
        let mut rights = Vec::with_capacity(n_nodes);
        let mut is_leaf = Vec::with_capacity(n_nodes);
        let mut distributions = Array2::zeros((n_nodes, n_classes));

        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                NodeDraft::Unset => panic!("node {i} was never defined"),
                NodeDraft::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    split_indices.push(*feature);
                    thresholds.push(*threshold);
                    lefts.push(*left);
                    rights.push(*right);
                    is_leaf.push(false);
                }
                NodeDraft::Leaf(p) => {
                    assert_eq!(p.len(), n_classes, "leaf {i} has the wrong class count");
                    split_indices.push(0);
                    thresholds.push(0.0);
                    lefts.push(NO_CHILD);
                    rights.push(NO_CHILD);
                    is_leaf.push(true);
                    for (k, &v) in p.iter().enumerate() {
                        distributions[[i, k]] = v;
                    }
                }
            }
        }

        Tree::new(split_indices, thresholds, lefts, rights, is_leaf, distributions)
    }
}
