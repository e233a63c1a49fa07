//! Post-hoc interpretability for tree ensembles.
//!
//! - [`paths`]: frequent decision paths per predicted class
//! - [`importance`]: split / gain / cover feature importance

pub mod importance;
pub mod paths;

pub use importance::{compute_forest_importance, ExplainError, FeatureImportance, ImportanceType};
