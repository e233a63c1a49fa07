//! Forest-wide path aggregation grouped by predicted class.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::walker::walk_tree;
use super::{PathError, PathRecord};
use crate::repr::{ClassLabel, Forest};
use crate::utils::Parallelism;

/// Path records of a whole forest, grouped by the class each leaf predicts.
///
/// Within a group, records appear in ensemble order and then leaf discovery
/// order. Classes no leaf predicts have no group.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassPathGroups<C: ClassLabel> {
    groups: BTreeMap<C, Vec<PathRecord<C>>>,
    leaves_per_tree: Vec<usize>,
}

impl<C: ClassLabel> ClassPathGroups<C> {
    /// Records for one class, if any leaf predicts it.
    pub fn get(&self, class: &C) -> Option<&[PathRecord<C>]> {
        self.groups.get(class).map(Vec::as_slice)
    }

    /// Iterate over `(class, records)` in ascending class order.
    pub fn iter(&self) -> impl Iterator<Item = (&C, &[PathRecord<C>])> {
        self.groups.iter().map(|(c, r)| (c, r.as_slice()))
    }

    /// Classes with at least one record, ascending.
    pub fn classes(&self) -> impl Iterator<Item = &C> {
        self.groups.keys()
    }

    /// Number of classes with at least one record.
    pub fn n_classes(&self) -> usize {
        self.groups.len()
    }

    /// Total number of records over all classes (= leaves in the forest).
    pub fn n_records(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Number of leaves walked in each tree, in ensemble order.
    pub fn leaves_per_tree(&self) -> &[usize] {
        &self.leaves_per_tree
    }
}

/// Walk every tree in `forest` and group the resulting records by class.
///
/// With [`Parallelism::Parallel`] trees are walked on the rayon pool; results
/// are merged in ensemble order either way, so the output does not depend on
/// scheduling.
///
/// # Errors
///
/// - [`PathError::EmptyEnsemble`] if the forest has no trees.
/// - [`PathError::Structural`] for the first tree (in ensemble order) that
///   fails to walk. No partial grouping is returned.
pub fn aggregate_paths<C: ClassLabel>(
    forest: &Forest<C>,
    feature_names: &[String],
    parallelism: Parallelism,
) -> Result<ClassPathGroups<C>, PathError> {
    if forest.n_trees() == 0 {
        return Err(PathError::EmptyEnsemble);
    }

    let features: Vec<Arc<str>> = feature_names.iter().map(|n| Arc::from(n.as_str())).collect();
    let classes = forest.classes();

    let walked = parallelism.maybe_par_map(forest.tree_slice(), |tree| {
        walk_tree(tree, classes, &features)
    });

    let mut groups: BTreeMap<C, Vec<PathRecord<C>>> = BTreeMap::new();
    let mut leaves_per_tree = Vec::with_capacity(walked.len());

    for (tree_idx, result) in walked.into_iter().enumerate() {
        let records = result.map_err(|source| PathError::Structural { tree_idx, source })?;
        leaves_per_tree.push(records.len());
        for record in records {
            groups
                .entry(record.outcome.class.clone())
                .or_default()
                .push(record);
        }
    }

    Ok(ClassPathGroups {
        groups,
        leaves_per_tree,
    })
}
