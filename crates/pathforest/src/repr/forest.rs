//! Canonical forest representation (collection of classifier trees).

use super::{ClassLabel, Label, Tree};

/// Forest of classification trees.
///
/// Every tree votes over the same ordered class list: column `k` of a node's
/// class distribution is the probability of `classes()[k]`. Trees whose
/// distribution width differs are stored as given; the path walker reports
/// them.
#[derive(Debug, Clone)]
pub struct Forest<C: ClassLabel = Label> {
    trees: Vec<Tree>,
    classes: Vec<C>,
}

impl<C: ClassLabel> Forest<C> {
    /// Create an empty forest over the given classes.
    pub fn new(classes: Vec<C>) -> Self {
        Self {
            trees: Vec::new(),
            classes,
        }
    }

    /// Add a tree to the forest.
    pub fn push_tree(&mut self, tree: Tree) {
        self.trees.push(tree);
    }

    /// Add a tree (builder pattern).
    pub fn with_tree(mut self, tree: Tree) -> Self {
        self.push_tree(tree);
        self
    }

    /// Number of trees.
    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of classes.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Class labels in distribution column order.
    #[inline]
    pub fn classes(&self) -> &[C] {
        &self.classes
    }

    /// Get a reference to a specific tree.
    #[inline]
    pub fn tree(&self, idx: usize) -> &Tree {
        &self.trees[idx]
    }

    /// All trees in ensemble order.
    #[inline]
    pub fn tree_slice(&self) -> &[Tree] {
        &self.trees
    }

    /// Iterate over trees.
    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.trees.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_tree;
    use crate::explainability::paths::{aggregate_paths, PathError};
    use crate::repr::{TreeValidationError, TreeView};
    use crate::utils::Parallelism;

    #[test]
    fn push_and_iterate() {
        let forest = Forest::new(vec![0i64, 1])
            .with_tree(class_tree! {
                0 => num(0, 0.5) -> 1, 2,
                1 => leaf(1.0, 0.0),
                2 => leaf(0.0, 1.0),
            })
            .with_tree(class_tree! { 0 => leaf(0.7, 0.3) });

        assert_eq!(forest.n_trees(), 2);
        assert_eq!(forest.n_classes(), 2);
        assert_eq!(forest.classes(), &[0, 1]);
        assert_eq!(forest.tree(1).n_nodes(), 1);
        assert_eq!(forest.trees().map(|t| t.n_leaves()).sum::<usize>(), 3);
    }

    #[test]
    fn mismatched_tree_width_is_stored_and_reported_by_the_walker() {
        let forest = Forest::new(vec!["AFS".to_string(), "UFS".to_string()])
            .with_tree(class_tree! { 0 => leaf(1.0, 0.0) })
            .with_tree(class_tree! { 0 => leaf(0.2, 0.3, 0.5) });
        assert_eq!(forest.n_trees(), 2);
        assert_eq!(forest.tree(1).n_classes(), 3);

        let err = aggregate_paths(&forest, &[], Parallelism::Sequential).unwrap_err();
        match err {
            PathError::Structural { tree_idx, source } => {
                assert_eq!(tree_idx, 1);
                assert_eq!(
                    source,
                    TreeValidationError::ClassCountMismatch { node: 0, width: 3, n_classes: 2 }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
