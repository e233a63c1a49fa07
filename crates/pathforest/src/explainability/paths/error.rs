//! Errors raised by the path analysis.

use std::io;
use std::path::PathBuf;

use crate::repr::TreeValidationError;

/// Error type for decision-path extraction and reporting.
///
/// Every error aborts the analysis: a partial aggregation would under-count
/// paths without any visible sign.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// A tree in the ensemble is malformed.
    #[error("tree {tree_idx} is malformed: {source}")]
    Structural {
        tree_idx: usize,
        #[source]
        source: TreeValidationError,
    },

    /// The ensemble contains no trees.
    #[error("ensemble has no trees")]
    EmptyEnsemble,

    /// The persisted artifact could not be written.
    #[error("failed to write pathway table to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
