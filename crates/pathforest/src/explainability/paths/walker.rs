//! Per-tree decision path extraction.

use std::sync::Arc;

use fixedbitset::FixedBitSet;

use super::{Comparison, DecisionPath, LeafOutcome, PathRecord, SplitCondition};
use crate::repr::{ClassLabel, NodeId, TreeValidationError, TreeView, NO_CHILD};

/// Extract one [`PathRecord`] per leaf of `tree`.
///
/// Depth-first, left subtree before right, so records come out in leaf
/// discovery order. Each stack frame owns the path leading to its node; a
/// split hands `(feature <= t)` to the left frame and `(feature > t)` to the
/// right frame.
///
/// `classes[k]` labels column `k` of the leaf distributions and
/// `features[i]` names split feature index `i`.
///
/// # Errors
///
/// Returns a [`TreeValidationError`] if a split node is missing a child, a
/// child reference is out of bounds, a leaf still has children, a node is
/// reached twice (cycle or shared subtree), a split feature has no name, or a
/// leaf distribution does not have one entry per class.
pub fn walk_tree<T, C>(
    tree: &T,
    classes: &[C],
    features: &[Arc<str>],
) -> Result<Vec<PathRecord<C>>, TreeValidationError>
where
    T: TreeView + ?Sized,
    C: ClassLabel,
{
    let n_nodes = tree.n_nodes();
    if n_nodes == 0 {
        return Err(TreeValidationError::EmptyTree);
    }

    let mut visited = FixedBitSet::with_capacity(n_nodes);
    let mut records = Vec::new();
    let mut stack: Vec<(NodeId, DecisionPath)> = vec![(0, DecisionPath::root())];

    while let Some((node, path)) = stack.pop() {
        if visited.put(node as usize) {
            return Err(TreeValidationError::DuplicateVisit { node });
        }

        let Some((left, right)) = checked_children(tree, node)? else {
            let outcome = leaf_outcome(tree, node, classes)?;
            records.push(PathRecord {
                path,
                outcome,
                leaf: node,
            });
            continue;
        };

        let feature_index = tree.split_index(node);
        let feature = features.get(feature_index as usize).ok_or(
            TreeValidationError::UnknownFeature {
                node,
                feature: feature_index,
                n_features: features.len(),
            },
        )?;
        let threshold = tree.split_threshold(node);

        let right_path = path.clone().extended(SplitCondition::new(
            feature_index,
            Arc::clone(feature),
            Comparison::Greater,
            threshold,
        ));
        let left_path = path.extended(SplitCondition::new(
            feature_index,
            Arc::clone(feature),
            Comparison::LessOrEqual,
            threshold,
        ));

        // Right pushed first so the left subtree is explored first.
        stack.push((right, right_path));
        stack.push((left, left_path));
    }

    Ok(records)
}

/// Children of `node`: `None` for a leaf, `Some((left, right))` for a split.
///
/// # Errors
///
/// A leaf that references children, a split missing a child, or a child
/// index past the node count.
pub(crate) fn checked_children<T>(
    tree: &T,
    node: NodeId,
) -> Result<Option<(NodeId, NodeId)>, TreeValidationError>
where
    T: TreeView + ?Sized,
{
    let left = tree.left_child(node);
    let right = tree.right_child(node);

    if tree.is_leaf(node) {
        if left != NO_CHILD || right != NO_CHILD {
            return Err(TreeValidationError::LeafWithChildren { node });
        }
        return Ok(None);
    }

    let n_nodes = tree.n_nodes();
    for (side, child) in [("left", left), ("right", right)] {
        if child == NO_CHILD {
            return Err(TreeValidationError::MissingChild { node, side });
        }
        if child as usize >= n_nodes {
            return Err(TreeValidationError::ChildOutOfBounds {
                node,
                side,
                child,
                n_nodes,
            });
        }
    }
    Ok(Some((left, right)))
}

/// Argmax class and its probability; the first maximum wins ties.
fn leaf_outcome<T, C>(
    tree: &T,
    node: NodeId,
    classes: &[C],
) -> Result<LeafOutcome<C>, TreeValidationError>
where
    T: TreeView + ?Sized,
    C: ClassLabel,
{
    let distribution = tree.class_distribution(node);
    if distribution.len() != classes.len() || classes.is_empty() {
        return Err(TreeValidationError::ClassCountMismatch {
            node,
            width: distribution.len(),
            n_classes: classes.len(),
        });
    }

    let mut best = 0;
    for (k, &p) in distribution.iter().enumerate().skip(1) {
        if p > distribution[best] {
            best = k;
        }
    }

    Ok(LeafOutcome {
        class: classes[best].clone(),
        confidence: distribution[best],
    })
}
