//! Conversion from schema types into runtime types.

use ndarray::Array2;

use super::error::ReadError;
use super::schema::{ModelSchema, TreeSchema, SCHEMA_NO_CHILD};
use super::Model;
use crate::repr::{Forest, NodeId, Tree, NO_CHILD};

// =============================================================================
// Tree conversions
// =============================================================================

/// Map an exported child index to a runtime reference.
///
/// `-1` becomes [`NO_CHILD`]. Indices past the node count are kept so the
/// walker can report the dangling reference with its node.
fn child_ref(node: usize, side: &str, child: i64) -> Result<NodeId, ReadError> {
    if child == SCHEMA_NO_CHILD {
        return Ok(NO_CHILD);
    }
    NodeId::try_from(child)
        .ok()
        .filter(|&c| c != NO_CHILD)
        .ok_or_else(|| {
            ReadError::Validation(format!("node {node}: invalid {side} child index {child}"))
        })
}

/// Scale a class-count row to probabilities. All-zero rows stay as they are.
fn normalize_row(row: &mut [f64]) {
    let total: f64 = row.iter().sum();
    if total > 0.0 {
        for v in row.iter_mut() {
            *v /= total;
        }
    }
}

/// Weighted impurity decrease at every split node; leaves get 0.
fn impurity_gains(
    impurity: &[f64],
    weights: &[f64],
    lefts: &[NodeId],
    rights: &[NodeId],
    is_leaf: &[bool],
) -> Vec<f64> {
    let weighted = |node: NodeId| -> f64 {
        let idx = node as usize;
        match (impurity.get(idx), weights.get(idx)) {
            (Some(imp), Some(w)) => imp * w,
            _ => 0.0,
        }
    };
    (0..is_leaf.len())
        .map(|node| {
            if is_leaf[node] {
                0.0
            } else {
                weighted(node as NodeId) - weighted(lefts[node]) - weighted(rights[node])
            }
        })
        .collect()
}

impl TryFrom<TreeSchema> for Tree {
    type Error = ReadError;

    fn try_from(schema: TreeSchema) -> Result<Self, Self::Error> {
        let n_nodes = schema.children_left.len();
        let lengths = [
            ("children_right", schema.children_right.len()),
            ("feature", schema.feature.len()),
            ("threshold", schema.threshold.len()),
            ("value", schema.value.len()),
        ];
        for (name, len) in lengths {
            if len != n_nodes {
                return Err(ReadError::Validation(format!(
                    "{name} has {len} entries, expected {n_nodes}"
                )));
            }
        }
        for (name, stat) in [
            ("impurity", schema.impurity.as_ref()),
            ("weighted_n_node_samples", schema.weighted_n_node_samples.as_ref()),
        ] {
            if let Some(stat) = stat {
                if stat.len() != n_nodes {
                    return Err(ReadError::Validation(format!(
                        "{name} has {} entries, expected {n_nodes}",
                        stat.len()
                    )));
                }
            }
        }

        // A node is a leaf when it has no left child; a leaf that still has a
        // right child stays representable and is rejected by the walker.
        let is_leaf: Vec<bool> = schema
            .children_left
            .iter()
            .map(|&left| left == SCHEMA_NO_CHILD)
            .collect();

        let mut lefts = Vec::with_capacity(n_nodes);
        let mut rights = Vec::with_capacity(n_nodes);
        let mut split_indices = Vec::with_capacity(n_nodes);
        for node in 0..n_nodes {
            lefts.push(child_ref(node, "left", schema.children_left[node])?);
            rights.push(child_ref(node, "right", schema.children_right[node])?);

            let feature = schema.feature[node];
            let index = match u32::try_from(feature) {
                Ok(index) => index,
                Err(_) if is_leaf[node] => 0,
                Err(_) => {
                    return Err(ReadError::Validation(format!(
                        "node {node}: invalid split feature {feature}"
                    )));
                }
            };
            split_indices.push(index);
        }

        let width = schema.value.first().map_or(0, Vec::len);
        let mut flat = Vec::with_capacity(n_nodes * width);
        for (node, mut row) in schema.value.into_iter().enumerate() {
            if row.len() != width {
                return Err(ReadError::Validation(format!(
                    "node {node}: value row has {} entries, expected {width}",
                    row.len()
                )));
            }
            normalize_row(&mut row);
            flat.extend(row);
        }
        let distributions = Array2::from_shape_vec((n_nodes, width), flat)
            .map_err(|e| ReadError::Validation(format!("value table: {e}")))?;

        let gains = match (&schema.impurity, &schema.weighted_n_node_samples) {
            (Some(impurity), Some(weights)) => {
                Some(impurity_gains(impurity, weights, &lefts, &rights, &is_leaf))
            }
            _ => None,
        };

        let tree = Tree::new(
            split_indices,
            schema.threshold,
            lefts,
            rights,
            is_leaf,
            distributions,
        );

        let tree = match gains {
            Some(gains) => tree.with_gains(gains),
            None => tree,
        };
        let tree = match schema.weighted_n_node_samples {
            Some(covers) => tree.with_covers(covers),
            None => tree,
        };

        Ok(tree)
    }
}

// =============================================================================
// Model conversions
// =============================================================================

impl TryFrom<ModelSchema> for Model {
    type Error = ReadError;

    fn try_from(schema: ModelSchema) -> Result<Self, Self::Error> {
        if schema.classes.is_empty() {
            return Err(ReadError::Validation("model declares no classes".into()));
        }

        let mut forest = Forest::new(schema.classes);
        for (tree_idx, tree_schema) in schema.trees.into_iter().enumerate() {
            let tree = Tree::try_from(tree_schema).map_err(|e| match e {
                ReadError::Validation(msg) => ReadError::Validation(format!("tree {tree_idx}: {msg}")),
                other => other,
            })?;
            forest.push_tree(tree);
        }

        Ok(Model {
            forest,
            feature_names: schema.feature_names,
        })
    }
}
