//! End-to-end properties of path extraction, aggregation and ranking.

use std::collections::VecDeque;
use std::sync::Arc;

use ndarray::{arr1, Array1};
use pathforest::explainability::paths::{aggregate_paths, rank_paths, walk_tree};
use pathforest::testing::{TreeBuilder, DEFAULT_TOLERANCE};
use pathforest::{
    analyze_paths, assert_approx_eq, class_tree, AnalysisConfig, CategoryMap, Comparison,
    Forest, Parallelism, ReportEmitter, SplitCondition, Tree, TreeView,
};
use proptest::prelude::*;

const N_FEATURES: usize = 3;

fn names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("X{i}")).collect()
}

fn arc_names(n: usize) -> Vec<Arc<str>> {
    names(n).into_iter().map(Arc::from).collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn split_tree_plus_stump() {
    let forest = Forest::new(vec![0i64, 1])
        .with_tree(class_tree! {
            0 => num(0, 2.0) -> 1, 2,
            1 => leaf(0.9, 0.1),
            2 => leaf(0.3, 0.7),
        })
        .with_tree(class_tree! { 0 => leaf(0.8, 0.2) });

    let groups = aggregate_paths(&forest, &names(1), Parallelism::Sequential).unwrap();
    assert_eq!(groups.get(&0).unwrap().len(), 2);
    assert_eq!(groups.get(&1).unwrap().len(), 1);

    let report = analyze_paths(&forest, &names(1), &AnalysisConfig::default()).unwrap();

    // `X1 <= 2.0` and the empty stump path are distinct: one occurrence each.
    let zero = report.get(&0).unwrap();
    assert_eq!(zero.distinct_paths, 2);
    for ranked in &zero.ranked {
        assert_eq!(ranked.count, 1);
        assert_approx_eq!(ranked.percentage, 50.0, DEFAULT_TOLERANCE);
    }
    assert_eq!(zero.ranked[0].path.to_string(), "X1 <= 2.0000");
    assert!(zero.ranked[1].path.is_empty());

    let one = report.get(&1).unwrap();
    assert_eq!(one.ranked.len(), 1);
    assert_eq!(one.ranked[0].count, 1);
    assert_approx_eq!(one.ranked[0].percentage, 100.0, DEFAULT_TOLERANCE);
    assert_approx_eq!(one.ranked[0].mean_confidence, 0.7, DEFAULT_TOLERANCE);
}

#[test]
fn identical_paths_across_trees_merge() {
    let split = || {
        class_tree! {
            0 => num(0, 2.0) -> 1, 2,
            1 => leaf(1.0, 0.0),
            2 => leaf(0.0, 1.0),
        }
    };
    let forest = Forest::new(vec![0i64, 1]).with_tree(split()).with_tree(split());
    let report = analyze_paths(&forest, &names(1), &AnalysisConfig::default()).unwrap();

    let zero = report.get(&0).unwrap();
    assert_eq!(zero.distinct_paths, 1);
    assert_eq!(zero.ranked[0].count, 2);
    assert_approx_eq!(zero.ranked[0].percentage, 100.0, DEFAULT_TOLERANCE);
}

#[test]
fn non_integer_threshold_on_categorical_feature_renders_numerically() {
    let forest = Forest::new(vec!["collapse", "intact"]).with_tree(class_tree! {
        0 => num(0, 0.5) -> 1, 2,
        1 => leaf(0.9, 0.1),
        2 => leaf(0.2, 0.8),
    });
    let features = vec!["Material".to_string()];
    let categories = CategoryMap::new().with_feature("Material", [(0, "Timber"), (1, "Concrete")]);

    let report = analyze_paths(&forest, &features, &AnalysisConfig::default()).unwrap();
    let emitter = ReportEmitter::new(&categories, " AND ");
    let rows = emitter.rows(&report);

    assert_eq!(rows[0].label, "collapse");
    assert_eq!(rows[0].conditions, "Material <= 0.5000");
    assert_eq!(rows[1].label, "intact");
    assert_eq!(rows[1].conditions, "Material > 0.5000");
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn repeated_analysis_is_identical() {
    let forest = Forest::new(vec![0i64, 1, 2])
        .with_tree(class_tree! {
            0 => num(1, 3.5) -> 1, 2,
            1 => num(0, 1.0) -> 3, 4,
            2 => leaf(0.1, 0.1, 0.8),
            3 => leaf(0.6, 0.3, 0.1),
            4 => leaf(0.2, 0.7, 0.1),
        })
        .with_tree(class_tree! {
            0 => num(2, 0.25) -> 1, 2,
            1 => leaf(0.5, 0.5, 0.0),
            2 => leaf(0.0, 0.4, 0.6),
        });

    let first = aggregate_paths(&forest, &names(N_FEATURES), Parallelism::Sequential).unwrap();
    let second = aggregate_paths(&forest, &names(N_FEATURES), Parallelism::Sequential).unwrap();
    let parallel = aggregate_paths(&forest, &names(N_FEATURES), Parallelism::Parallel).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, parallel);
    assert_eq!(first.leaves_per_tree(), &[3, 2]);

    // Leaf 1 of tree 1 ties 0.5/0.5: first maximum wins.
    let zero: Vec<_> = first.get(&0).unwrap().iter().map(|r| r.path.to_string()).collect();
    assert_eq!(zero, vec!["X2 <= 3.5000 AND X1 <= 1.0000", "X3 <= 0.2500"]);
}

#[test]
fn ties_rank_in_first_occurrence_order() {
    // Class 0 leaves reached through B, A, B, A: both count 2, B seen first.
    let tree_b = || {
        class_tree! {
            0 => num(0, 1.0) -> 1, 2,
            1 => leaf(1.0, 0.0),
            2 => leaf(0.0, 1.0),
        }
    };
    let tree_a = || {
        class_tree! {
            0 => num(0, 5.0) -> 1, 2,
            1 => leaf(0.0, 1.0),
            2 => leaf(1.0, 0.0),
        }
    };
    let forest = Forest::new(vec![0i64, 1])
        .with_tree(tree_b())
        .with_tree(tree_a())
        .with_tree(tree_b())
        .with_tree(tree_a());

    let groups = aggregate_paths(&forest, &names(1), Parallelism::Sequential).unwrap();
    let ranked = rank_paths(groups.get(&0).unwrap(), 5);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].path.to_string(), "X1 <= 1.0000");
    assert_eq!(ranked[1].path.to_string(), "X1 > 5.0000");
    assert_eq!(ranked[0].count, ranked[1].count);
}

#[test]
fn same_feature_may_repeat_along_a_path() {
    let tree = class_tree! {
        0 => num(0, 4.0) -> 1, 2,
        1 => num(0, 2.0) -> 3, 4,
        2 => leaf(0.0, 1.0),
        3 => leaf(1.0, 0.0),
        4 => leaf(0.4, 0.6),
    };
    let records = walk_tree(&tree, &[0i64, 1], &arc_names(1)).unwrap();
    let x1 = |op, t| SplitCondition::new(0, Arc::from("X1"), op, t);
    assert_eq!(
        records[0].path.conditions(),
        &[x1(Comparison::LessOrEqual, 4.0), x1(Comparison::LessOrEqual, 2.0)]
    );
    assert_eq!(records[1].path.conditions()[1], x1(Comparison::Greater, 2.0));
}

// =============================================================================
// Properties
// =============================================================================

/// Grow a tree breadth-first: each step either splits the next pending node
/// or makes it a leaf. Remaining pending nodes become leaves.
fn grow_tree(steps: &[(u32, f64, bool)]) -> Tree {
    let mut builder = TreeBuilder::new();
    let mut pending = VecDeque::from([0u32]);
    let mut next_id = 1u32;

    let leaf = |builder: &mut TreeBuilder, id: u32| {
        let mut p = [0.1, 0.1, 0.1];
        p[id as usize % 3] = 0.8;
        builder.leaf(id, &p);
    };

    for &(feature, threshold, split) in steps {
        let Some(node) = pending.pop_front() else {
            break;
        };
        if split {
            builder.split(node, feature, threshold, next_id, next_id + 1);
            pending.extend([next_id, next_id + 1]);
            next_id += 2;
        } else {
            leaf(&mut builder, node);
        }
    }
    for node in pending {
        leaf(&mut builder, node);
    }
    builder.build()
}

fn steps_strategy() -> impl Strategy<Value = Vec<(u32, f64, bool)>> {
    prop::collection::vec((0..N_FEATURES as u32, 0.0f64..10.0, prop::bool::weighted(0.6)), 1..24)
}

fn sample_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..10.0, N_FEATURES)
}

proptest! {
    #[test]
    fn every_leaf_has_exactly_one_matching_path(
        steps in steps_strategy(),
        samples in prop::collection::vec(sample_strategy(), 1..16),
    ) {
        let tree = grow_tree(&steps);
        let records = walk_tree(&tree, &[0i64, 1, 2], &arc_names(N_FEATURES)).unwrap();

        prop_assert_eq!(records.len(), tree.n_leaves());
        let mut leaves: Vec<_> = records.iter().map(|r| r.leaf).collect();
        leaves.sort_unstable();
        leaves.dedup();
        prop_assert_eq!(leaves.len(), records.len());

        for sample in samples {
            let sample: Array1<f64> = arr1(&sample);
            let reached = tree.traverse_to_leaf(sample.view());
            for record in &records {
                prop_assert_eq!(record.path.matches(sample.view()), record.leaf == reached);
            }
        }
    }

    #[test]
    fn counts_and_percentages_add_up(
        trees in prop::collection::vec(steps_strategy(), 1..6),
    ) {
        let forest = trees
            .iter()
            .fold(Forest::new(vec![0i64, 1, 2]), |f, steps| f.with_tree(grow_tree(steps)));
        let total_leaves: usize = forest.trees().map(Tree::n_leaves).sum();

        let config = AnalysisConfig::builder().top_k(usize::MAX).build().unwrap();
        let report = analyze_paths(&forest, &names(N_FEATURES), &config).unwrap();

        let mut seen = 0;
        for (_, summary) in report.iter() {
            let counted: usize = summary.ranked.iter().map(|r| r.count).sum();
            prop_assert_eq!(counted, summary.total_paths);
            prop_assert_eq!(summary.ranked.len(), summary.distinct_paths);

            let pct: f64 = summary.ranked.iter().map(|r| r.percentage).sum();
            prop_assert!((pct - 100.0).abs() < 1e-6);
            for r in &summary.ranked {
                let expected = 100.0 * r.count as f64 / summary.total_paths as f64;
                prop_assert!((r.percentage - expected).abs() < 1e-12);
            }
            prop_assert!(summary.ranked.windows(2).all(|w| w[0].count >= w[1].count));
            seen += summary.total_paths;
        }
        prop_assert_eq!(seen, total_leaves);
    }
}
