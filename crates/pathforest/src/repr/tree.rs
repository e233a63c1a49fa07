//! Canonical tree representation (SoA) and read-only tree interface.
//!
//! This module provides:
//! - [`Tree`]: Immutable SoA tree storage for an axis-aligned binary classifier tree
//! - [`TreeView`]: Read-only trait for unified tree access
//! - [`TreeValidationError`]: Structural errors found by path walking

use ndarray::{Array2, ArrayView1};

use super::NodeId;

// ============================================================================
// TreeView Trait
// ============================================================================

/// Read-only view of a classification tree.
///
/// Provides the minimal interface needed to walk a tree from root to leaf.
///
/// # Example
///
/// ```ignore
/// use pathforest::repr::TreeView;
///
/// fn count_leaves<T: TreeView>(tree: &T) -> usize {
///     (0..tree.n_nodes())
///         .filter(|&n| tree.is_leaf(n as u32))
///         .count()
/// }
/// ```
pub trait TreeView {
    /// Number of nodes in the tree.
    fn n_nodes(&self) -> usize;

    /// Width of each node's class distribution.
    fn n_classes(&self) -> usize;

    /// Check if a node is a leaf.
    fn is_leaf(&self, node: NodeId) -> bool;

    /// Get the feature index for a split node.
    fn split_index(&self, node: NodeId) -> u32;

    /// Get the split threshold for a split node.
    fn split_threshold(&self, node: NodeId) -> f64;

    /// Get the left child node index, or [`NO_CHILD`](super::NO_CHILD).
    fn left_child(&self, node: NodeId) -> NodeId;

    /// Get the right child node index, or [`NO_CHILD`](super::NO_CHILD).
    fn right_child(&self, node: NodeId) -> NodeId;

    /// Class-probability vector stored at a node.
    fn class_distribution(&self, node: NodeId) -> ArrayView1<'_, f64>;

    /// Traverse the tree to find the leaf node for a sample.
    ///
    /// Samples with `x <= threshold` go left, all others (including NaN) go right.
    /// The tree must be structurally sound; [`walk_tree`](crate::explainability::paths::walk_tree)
    /// reports trees that are not.
    #[inline]
    fn traverse_to_leaf(&self, sample: ArrayView1<'_, f64>) -> NodeId {
        self.traverse_to_leaf_from(0, sample)
    }

    /// Traverse the tree starting from a specific node.
    #[inline]
    fn traverse_to_leaf_from(&self, start_node: NodeId, sample: ArrayView1<'_, f64>) -> NodeId {
        let mut node = start_node;

        while !self.is_leaf(node) {
            let fvalue = sample[self.split_index(node) as usize];
            node = if fvalue <= self.split_threshold(node) {
                self.left_child(node)
            } else {
                self.right_child(node)
            };
        }

        node
    }
}

// ============================================================================
// TreeValidationError
// ============================================================================

/// Structural errors found while walking a [`Tree`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeValidationError {
    /// Tree has no nodes.
    #[error("tree has no nodes")]
    EmptyTree,
    /// An internal node is missing one of its children.
    #[error("internal node {node} has no {side} child")]
    MissingChild { node: NodeId, side: &'static str },
    /// A child pointer references an out-of-bounds node.
    #[error("node {node} has {side} child {child} outside of {n_nodes} nodes")]
    ChildOutOfBounds {
        node: NodeId,
        side: &'static str,
        child: NodeId,
        n_nodes: usize,
    },
    /// A node flagged as leaf still references children.
    #[error("leaf node {node} references child nodes")]
    LeafWithChildren { node: NodeId },
    /// A node was reached twice: a cycle or a shared subtree.
    #[error("node {node} was reached more than once")]
    DuplicateVisit { node: NodeId },
    /// A split references a feature that has no identifier.
    #[error("node {node} splits on feature {feature} but only {n_features} features are named")]
    UnknownFeature {
        node: NodeId,
        feature: u32,
        n_features: usize,
    },
    /// The class distribution width does not match the class list.
    #[error("node {node} has {width} class probabilities, expected {n_classes}")]
    ClassCountMismatch {
        node: NodeId,
        width: usize,
        n_classes: usize,
    },
}

// ============================================================================
// Tree
// ============================================================================

/// Structure-of-Arrays tree storage.
///
/// Child indices are local to this tree (0 = root); leaves store [`NO_CHILD`](super::NO_CHILD).
/// Every node carries a class distribution row; only leaf rows are used for
/// predictions.
#[derive(Debug, Clone)]
pub struct Tree {
    split_indices: Box<[u32]>,
    split_thresholds: Box<[f64]>,
    left_children: Box<[NodeId]>,
    right_children: Box<[NodeId]>,
    is_leaf: Box<[bool]>,
    /// Shape `[n_nodes, n_classes]`.
    distributions: Array2<f64>,
    /// Optional impurity decrease at each split node (for importance).
    gains: Option<Box<[f64]>>,
    /// Optional weighted sample count at each node (for importance).
    covers: Option<Box<[f64]>>,
}

impl Tree {
    /// Create a new tree from parallel arrays.
    ///
    /// All arrays must have the same length (number of nodes) and
    /// `distributions` must have one row per node.
    pub fn new(
        split_indices: Vec<u32>,
        split_thresholds: Vec<f64>,
        left_children: Vec<NodeId>,
        right_children: Vec<NodeId>,
        is_leaf: Vec<bool>,
        distributions: Array2<f64>,
    ) -> Self {
        let n_nodes = split_indices.len();
        debug_assert_eq!(n_nodes, split_thresholds.len());
        debug_assert_eq!(n_nodes, left_children.len());
        debug_assert_eq!(n_nodes, right_children.len());
        debug_assert_eq!(n_nodes, is_leaf.len());
        debug_assert_eq!(n_nodes, distributions.nrows());

        Self {
            split_indices: split_indices.into_boxed_slice(),
            split_thresholds: split_thresholds.into_boxed_slice(),
            left_children: left_children.into_boxed_slice(),
            right_children: right_children.into_boxed_slice(),
            is_leaf: is_leaf.into_boxed_slice(),
            distributions,
            gains: None,
            covers: None,
        }
    }

    /// Number of leaf nodes.
    pub fn n_leaves(&self) -> usize {
        self.is_leaf.iter().filter(|&&leaf| leaf).count()
    }

    // =========================================================================
    // Node statistics
    // =========================================================================

    #[inline]
    pub fn has_gains(&self) -> bool {
        self.gains.is_some()
    }

    #[inline]
    pub fn has_covers(&self) -> bool {
        self.covers.is_some()
    }

    /// Set the gains for this tree (builder pattern).
    pub fn with_gains(mut self, gains: Vec<f64>) -> Self {
        debug_assert_eq!(gains.len(), self.n_nodes());
        self.gains = Some(gains.into_boxed_slice());
        self
    }

    /// Set the covers for this tree (builder pattern).
    pub fn with_covers(mut self, covers: Vec<f64>) -> Self {
        debug_assert_eq!(covers.len(), self.n_nodes());
        self.covers = Some(covers.into_boxed_slice());
        self
    }

    /// Impurity decrease per node. Leaves have gain 0.
    pub fn gains(&self) -> Option<&[f64]> {
        self.gains.as_deref()
    }

    /// Weighted number of training samples reaching each node.
    pub fn covers(&self) -> Option<&[f64]> {
        self.covers.as_deref()
    }
}

impl TreeView for Tree {
    #[inline]
    fn n_nodes(&self) -> usize {
        self.split_indices.len()
    }

    #[inline]
    fn n_classes(&self) -> usize {
        self.distributions.ncols()
    }

    #[inline]
    fn is_leaf(&self, node: NodeId) -> bool {
        self.is_leaf[node as usize]
    }

    #[inline]
    fn split_index(&self, node: NodeId) -> u32 {
        self.split_indices[node as usize]
    }

    #[inline]
    fn split_threshold(&self, node: NodeId) -> f64 {
        self.split_thresholds[node as usize]
    }

    #[inline]
    fn left_child(&self, node: NodeId) -> NodeId {
        self.left_children[node as usize]
    }

    #[inline]
    fn right_child(&self, node: NodeId) -> NodeId {
        self.right_children[node as usize]
    }

    #[inline]
    fn class_distribution(&self, node: NodeId) -> ArrayView1<'_, f64> {
        self.distributions.row(node as usize)
    }
}
