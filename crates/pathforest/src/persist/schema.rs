//! Schema types for persisted inputs.
//!
//! The tree layout follows the scikit-learn `tree_` attribute export: parallel
//! per-node arrays with `-1` marking an absent child. Schema types are kept
//! apart from runtime types so loading can validate before any tree exists.

use serde::{Deserialize, Serialize};

use crate::repr::Label;

/// Sentinel for an absent child in exported trees.
pub const SCHEMA_NO_CHILD: i64 = -1;

/// One exported decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSchema {
    /// Left child of each node, `-1` for leaves.
    pub children_left: Vec<i64>,
    /// Right child of each node, `-1` for leaves.
    pub children_right: Vec<i64>,
    /// Split feature of each node. Leaves carry a negative placeholder.
    pub feature: Vec<i64>,
    /// Split threshold of each node.
    pub threshold: Vec<f64>,
    /// Per-node class counts or fractions, one row per node.
    pub value: Vec<Vec<f64>>,
    /// Node impurity (optional, enables gain importance).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impurity: Option<Vec<f64>>,
    /// Weighted training samples per node (optional, enables cover importance).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weighted_n_node_samples: Option<Vec<f64>>,
}

/// An exported random forest classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    /// Name of each feature index, in training column order.
    pub feature_names: Vec<String>,
    /// Class labels; `classes[k]` labels column `k` of every `value` row.
    pub classes: Vec<Label>,
    /// Trees in ensemble order.
    pub trees: Vec<TreeSchema>,
}
