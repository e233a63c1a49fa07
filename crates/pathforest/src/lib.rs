//! pathforest: decision-path mining for random forest classifiers.
//!
//! Post-hoc interpretability for trained tree ensembles. The central analysis
//! walks every tree, reconstructs the conjunction of split conditions leading
//! to each leaf, groups those paths by the class the leaf predicts, and ranks
//! the most frequent paths per class (Damage Propagation Pathways).
//!
//! # Key Types
//!
//! - [`Forest`] / [`Tree`] - Read-only ensemble representation
//! - [`AnalysisConfig`] - Configuration builder
//! - [`PathReport`] - Ranked paths per class, ready for rendering
//! - [`CategoryMap`] - Reverse mapping for label-encoded features
//!
//! # Running an analysis
//!
//! ```ignore
//! use pathforest::{analyze_paths, AnalysisConfig, CategoryMap, ReportEmitter};
//! use pathforest::persist::Model;
//!
//! let model = Model::load_json("forest.json")?;
//! let config = AnalysisConfig::builder().top_k(5).build()?;
//! let report = analyze_paths(&model.forest, &model.feature_names, &config)?;
//!
//! let categories = CategoryMap::default();
//! let emitter = ReportEmitter::new(&categories, &config.delimiter);
//! print!("{}", emitter.render_text(&report));
//! emitter.write(&report, "pathways.csv", config.format)?;
//! ```

// Re-export approx traits for users who want to compare scores
pub use approx;

pub mod analysis;
pub mod config;
pub mod explainability;
pub mod logger;
pub mod persist;
pub mod repr;
pub mod testing;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use analysis::analyze_paths;
pub use config::{AnalysisConfig, ArtifactFormat, ConfigError};
pub use explainability::paths::{
    CategoryMap, ClassPathGroups, ClassSummary, Comparison, DecisionPath, LeafOutcome,
    PathError, PathRecord, PathReport, RankedPath, ReportEmitter, SplitCondition,
};
pub use explainability::{ExplainError, FeatureImportance, ImportanceType};
pub use logger::{AnalysisLogger, Verbosity};
pub use repr::{ClassLabel, Forest, Label, NodeId, Tree, TreeValidationError, TreeView};
pub use utils::{run_with_threads, Parallelism};
