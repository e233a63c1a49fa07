//! Canonical tree-ensemble representations.

/// Canonical node identifier.
///
/// Internally this is just an index into the tree's SoA arrays.
pub type NodeId = u32;

/// Child reference stored for leaves.
pub const NO_CHILD: NodeId = NodeId::MAX;

pub mod forest;
pub mod label;
pub mod tree;

pub use forest::Forest;
pub use label::{ClassLabel, Label};
pub use tree::{Tree, TreeValidationError, TreeView};
