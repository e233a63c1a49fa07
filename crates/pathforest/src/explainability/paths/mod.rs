//! Decision-path mining (Damage Propagation Pathways).
//!
//! Pipeline, leaf to root:
//! - [`walk_tree`]: one record per leaf of a tree, carrying the root-to-leaf
//!   conditions and the leaf's argmax class and confidence
//! - [`aggregate_paths`]: records of the whole forest grouped by class
//! - [`PathTally`] / [`rank_paths`]: occurrence counts and top-k ranking per class
//! - [`CategoryMap`]: reverse mapping of encoded categorical thresholds
//! - [`ReportEmitter`]: console and on-disk rendering

mod aggregate;
mod condition;
mod demap;
mod error;
mod rank;
mod report;
mod walker;

pub use aggregate::{aggregate_paths, ClassPathGroups};
pub use condition::{Comparison, DecisionPath, LeafOutcome, PathRecord, SplitCondition};
pub use demap::CategoryMap;
pub use error::PathError;
pub use rank::{rank_paths, PathTally, RankedPath};
pub use report::{write_csv, ClassSummary, PathReport, ReportEmitter, ReportRow};
pub use walker::walk_tree;
pub(crate) use walker::checked_children;
