//! End-to-end decision-path analysis.

use std::collections::BTreeMap;

use crate::config::AnalysisConfig;
use crate::explainability::paths::{
    aggregate_paths, ClassPathGroups, ClassSummary, PathError, PathReport, PathTally,
};
use crate::logger::AnalysisLogger;
use crate::repr::{ClassLabel, Forest};
use crate::utils::{run_with_threads, Parallelism};

/// Walk, aggregate and rank the decision paths of `forest`.
///
/// # Arguments
///
/// * `forest` - Trained ensemble; `forest.classes()[k]` labels distribution column `k`
/// * `feature_names` - Name of each split feature index
/// * `config` - Ranking depth, thread count and verbosity
///
/// # Errors
///
/// - [`PathError::EmptyEnsemble`] if the forest has no trees.
/// - [`PathError::Structural`] for the first malformed tree.
pub fn analyze_paths<C: ClassLabel>(
    forest: &Forest<C>,
    feature_names: &[String],
    config: &AnalysisConfig,
) -> Result<PathReport<C>, PathError> {
    run_with_threads(config.n_threads, |parallelism| {
        analyze_inner(forest, feature_names, config, parallelism)
    })
}

/// Analysis body; assumes the caller has set up the thread pool.
fn analyze_inner<C: ClassLabel>(
    forest: &Forest<C>,
    feature_names: &[String],
    config: &AnalysisConfig,
    parallelism: Parallelism,
) -> Result<PathReport<C>, PathError> {
    let logger = AnalysisLogger::new(config.verbosity);
    logger.start_analysis(forest.n_trees(), feature_names.len());

    let groups = aggregate_paths(forest, feature_names, parallelism)?;
    for (tree_idx, &n_leaves) in groups.leaves_per_tree().iter().enumerate() {
        logger.log_tree(tree_idx, n_leaves);
    }

    let report = rank_groups(&groups, config.top_k, &logger);

    for class in forest.classes() {
        if groups.get(class).is_none() {
            logger.warn(&format!("no leaf predicts class {class}; omitted from report"));
        }
    }
    logger.finish_analysis(report.n_classes(), groups.n_records());

    Ok(report)
}

fn rank_groups<C: ClassLabel>(
    groups: &ClassPathGroups<C>,
    top_k: usize,
    logger: &AnalysisLogger,
) -> PathReport<C> {
    let mut classes = BTreeMap::new();
    for (class, records) in groups.iter() {
        let tally = PathTally::from_records(records);
        logger.log_class(class, tally.total(), tally.n_distinct());
        classes.insert(
            class.clone(),
            ClassSummary {
                total_paths: tally.total(),
                distinct_paths: tally.n_distinct(),
                ranked: tally.top_k(top_k),
            },
        );
    }
    PathReport::new(classes)
}
