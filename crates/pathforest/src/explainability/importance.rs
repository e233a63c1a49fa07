//! Feature importance over a forest.

use std::fmt;
use std::str::FromStr;

use fixedbitset::FixedBitSet;

use super::paths::checked_children;
use crate::repr::{ClassLabel, Forest, NodeId, Tree, TreeValidationError, TreeView};

/// Errors raised while computing explanations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExplainError {
    /// The requested importance needs per-node statistics the model lacks.
    #[error("missing node statistics: {0}")]
    MissingNodeStats(&'static str),
    /// A split references a feature outside the declared feature count.
    #[error("tree {tree_idx} splits on feature {feature} but the model has {n_features} features")]
    FeatureOutOfRange {
        tree_idx: usize,
        feature: u32,
        n_features: usize,
    },
    /// A tree cannot be walked from its root.
    #[error("tree {tree_idx}: {source}")]
    Structural {
        tree_idx: usize,
        #[source]
        source: TreeValidationError,
    },
}

/// Type of feature importance to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportanceType {
    /// Number of times each feature is used in splits.
    #[default]
    Split,
    /// Total impurity decrease from splits using each feature.
    Gain,
    /// Total weighted sample count at splits using each feature.
    Cover,
}

impl ImportanceType {
    fn stat_name(self) -> &'static str {
        match self {
            ImportanceType::Split => "split",
            ImportanceType::Gain => "gain statistics required for gain importance",
            ImportanceType::Cover => "cover statistics required for cover importance",
        }
    }
}

impl fmt::Display for ImportanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportanceType::Split => f.write_str("split"),
            ImportanceType::Gain => f.write_str("gain"),
            ImportanceType::Cover => f.write_str("cover"),
        }
    }
}

impl FromStr for ImportanceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "split" => Ok(ImportanceType::Split),
            "gain" => Ok(ImportanceType::Gain),
            "cover" => Ok(ImportanceType::Cover),
            other => Err(format!("expected 'split', 'gain' or 'cover', got '{other}'")),
        }
    }
}

/// Per-feature importance scores.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureImportance {
    values: Vec<f64>,
    names: Option<Vec<String>>,
    importance_type: ImportanceType,
}

impl FeatureImportance {
    pub fn new(values: Vec<f64>, names: Option<Vec<String>>, importance_type: ImportanceType) -> Self {
        Self {
            values,
            names,
            importance_type,
        }
    }

    /// Raw scores, indexed by feature.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    pub fn importance_type(&self) -> ImportanceType {
        self.importance_type
    }

    /// Scores scaled to sum to 1. All zeros stay zero.
    pub fn normalized(&self) -> Vec<f64> {
        let total: f64 = self.values.iter().sum();
        if total > 0.0 {
            self.values.iter().map(|v| v / total).collect()
        } else {
            self.values.clone()
        }
    }

    /// The `k` highest scoring features as `(index, name, score)`.
    ///
    /// Equal scores keep feature order.
    pub fn top_k(&self, k: usize) -> Vec<(usize, Option<&str>, f64)> {
        let mut order: Vec<usize> = (0..self.values.len()).collect();
        order.sort_by(|&a, &b| self.values[b].total_cmp(&self.values[a]));
        order
            .into_iter()
            .take(k)
            .map(|i| {
                let name = self.names.as_ref().and_then(|n| n.get(i)).map(String::as_str);
                (i, name, self.values[i])
            })
            .collect()
    }
}

/// Compute feature importance over the split nodes reachable from each root.
///
/// Stored nodes the root cannot reach do not contribute.
///
/// # Errors
///
/// - [`ExplainError::MissingNodeStats`] if `Gain` or `Cover` is requested and a
///   tree lacks the statistic.
/// - [`ExplainError::FeatureOutOfRange`] if a split feature is `>= n_features`.
/// - [`ExplainError::Structural`] if a tree is empty, has a dangling child, or
///   reaches a node twice.
pub fn compute_forest_importance<C: ClassLabel>(
    forest: &Forest<C>,
    n_features: usize,
    importance_type: ImportanceType,
    names: Option<Vec<String>>,
) -> Result<FeatureImportance, ExplainError> {
    let mut values = vec![0.0; n_features];

    for (tree_idx, tree) in forest.trees().enumerate() {
        let stats = match importance_type {
            ImportanceType::Split => None,
            ImportanceType::Gain => Some(tree.gains()),
            ImportanceType::Cover => Some(tree.covers()),
        };
        let stats = match stats {
            None => None,
            Some(Some(s)) => Some(s),
            Some(None) => return Err(ExplainError::MissingNodeStats(importance_type.stat_name())),
        };

        let splits = reachable_splits(tree)
            .map_err(|source| ExplainError::Structural { tree_idx, source })?;
        for node in splits {
            let feature = tree.split_index(node);
            let slot = values
                .get_mut(feature as usize)
                .ok_or(ExplainError::FeatureOutOfRange {
                    tree_idx,
                    feature,
                    n_features,
                })?;
            *slot += stats.map_or(1.0, |s| s[node as usize]);
        }
    }

    Ok(FeatureImportance::new(values, names, importance_type))
}

/// Split nodes reachable from the root, in preorder (left subtree first).
fn reachable_splits(tree: &Tree) -> Result<Vec<NodeId>, TreeValidationError> {
    let n_nodes = tree.n_nodes();
    if n_nodes == 0 {
        return Err(TreeValidationError::EmptyTree);
    }

    let mut visited = FixedBitSet::with_capacity(n_nodes);
    let mut splits = Vec::new();
    let mut stack: Vec<NodeId> = vec![0];

    while let Some(node) = stack.pop() {
        if visited.put(node as usize) {
            return Err(TreeValidationError::DuplicateVisit { node });
        }
        if let Some((left, right)) = checked_children(tree, node)? {
            splits.push(node);
            stack.push(right);
            stack.push(left);
        }
    }
    Ok(splits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_tree;

    fn forest_with_stats() -> Forest<i64> {
        let tree = class_tree! {
            0 => num(0, 0.5) -> 1, 2,
            1 => leaf(1.0, 0.0),
            2 => num(1, 0.3) -> 3, 4,
            3 => leaf(0.0, 1.0),
            4 => leaf(1.0, 0.0),
        };
        let tree = tree
            .with_gains(vec![10.0, 0.0, 5.0, 0.0, 0.0])
            .with_covers(vec![100.0, 40.0, 60.0, 30.0, 30.0]);

        let stump = class_tree! {
            0 => num(1, 1.5) -> 1, 2,
            1 => leaf(1.0, 0.0),
            2 => leaf(0.0, 1.0),
        };
        let stump = stump.with_gains(vec![2.0, 0.0, 0.0]).with_covers(vec![50.0, 25.0, 25.0]);

        Forest::new(vec![0, 1]).with_tree(tree).with_tree(stump)
    }

    #[test]
    fn split_importance_counts_splits() {
        let imp = compute_forest_importance(&forest_with_stats(), 3, ImportanceType::Split, None)
            .unwrap();
        assert_eq!(imp.values(), &[1.0, 2.0, 0.0]);
        assert_eq!(imp.normalized(), vec![1.0 / 3.0, 2.0 / 3.0, 0.0]);
    }

    #[test]
    fn gain_and_cover_importance() {
        let forest = forest_with_stats();
        let gain = compute_forest_importance(&forest, 2, ImportanceType::Gain, None).unwrap();
        assert_eq!(gain.values(), &[10.0, 7.0]);
        let cover = compute_forest_importance(&forest, 2, ImportanceType::Cover, None).unwrap();
        assert_eq!(cover.values(), &[100.0, 110.0]);
    }

    #[test]
    fn missing_stats() {
        let forest = Forest::new(vec![0i64, 1]).with_tree(class_tree! {
            0 => num(0, 0.5) -> 1, 2,
            1 => leaf(1.0, 0.0),
            2 => leaf(0.0, 1.0),
        });
        let err = compute_forest_importance(&forest, 1, ImportanceType::Gain, None).unwrap_err();
        assert!(matches!(err, ExplainError::MissingNodeStats(_)));
        assert!(compute_forest_importance(&forest, 1, ImportanceType::Split, None).is_ok());
    }

    #[test]
    fn feature_out_of_range() {
        let err = compute_forest_importance(&forest_with_stats(), 1, ImportanceType::Split, None)
            .unwrap_err();
        assert_eq!(
            err,
            ExplainError::FeatureOutOfRange { tree_idx: 0, feature: 1, n_features: 1 }
        );
    }

    #[test]
    fn top_k_with_names() {
        let names = vec!["Height".to_string(), "Material".to_string(), "Age".to_string()];
        let imp = compute_forest_importance(
            &forest_with_stats(),
            3,
            ImportanceType::Split,
            Some(names),
        )
        .unwrap();
        let top = imp.top_k(2);
        assert_eq!(top, vec![(1, Some("Material"), 2.0), (0, Some("Height"), 1.0)]);
    }

    #[test]
    fn unreachable_splits_do_not_count() {
        let tree = class_tree! {
            0 => leaf(1.0, 0.0),
            1 => num(0, 0.5) -> 2, 3,
            2 => leaf(1.0, 0.0),
            3 => leaf(0.0, 1.0),
        };
        let tree = tree
            .with_gains(vec![0.0, 8.0, 0.0, 0.0])
            .with_covers(vec![10.0, 6.0, 3.0, 3.0]);
        let forest = Forest::new(vec![0i64, 1]).with_tree(tree);

        for importance_type in [ImportanceType::Split, ImportanceType::Gain, ImportanceType::Cover] {
            let imp = compute_forest_importance(&forest, 1, importance_type, None).unwrap();
            assert_eq!(imp.values(), &[0.0], "{importance_type}");
        }
    }

    #[test]
    fn dangling_child_is_structural() {
        let forest = forest_with_stats().with_tree(class_tree! {
            0 => num(0, 0.5) -> 1, 7,
            1 => leaf(1.0, 0.0),
        });
        let err = compute_forest_importance(&forest, 2, ImportanceType::Split, None).unwrap_err();
        assert_eq!(
            err,
            ExplainError::Structural {
                tree_idx: 2,
                source: TreeValidationError::ChildOutOfBounds {
                    node: 0,
                    side: "right",
                    child: 7,
                    n_nodes: 2,
                },
            }
        );
    }

    #[test]
    fn shared_subtree_is_structural() {
        let forest = Forest::new(vec![0i64, 1]).with_tree(class_tree! {
            0 => num(0, 0.5) -> 1, 1,
            1 => leaf(1.0, 0.0),
        });
        let err = compute_forest_importance(&forest, 1, ImportanceType::Split, None).unwrap_err();
        assert_eq!(
            err,
            ExplainError::Structural {
                tree_idx: 0,
                source: TreeValidationError::DuplicateVisit { node: 1 },
            }
        );
    }

    #[test]
    fn parse_importance_type() {
        assert_eq!("Gain".parse::<ImportanceType>().unwrap(), ImportanceType::Gain);
        assert!("permutation".parse::<ImportanceType>().is_err());
    }
}
