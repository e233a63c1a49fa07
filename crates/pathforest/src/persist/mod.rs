//! Loading of exported models and category maps.
//!
//! Models are read from JSON in the [`ModelSchema`] layout and converted into
//! runtime types with `TryFrom`. Length and index checks happen here;
//! structural defects that survive conversion (dangling children, cycles,
//! unnamed features) are reported by the path walker.
//!
//! # Example
//!
//! ```ignore
//! use pathforest::persist::{load_category_map, Model};
//!
//! let model = Model::load_json("forest.json")?;
//! let categories = load_category_map("categories.json")?;
//! ```

mod convert;
mod error;
mod schema;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub use error::ReadError;
pub use schema::{ModelSchema, TreeSchema, SCHEMA_NO_CHILD};

use crate::explainability::paths::CategoryMap;
use crate::repr::{Forest, Label};

/// A trained forest together with the names of its features.
#[derive(Debug, Clone)]
pub struct Model {
    pub forest: Forest<Label>,
    /// `feature_names[i]` names split feature index `i`.
    pub feature_names: Vec<String>,
}

impl Model {
    /// Read a model from JSON.
    pub fn read_json<R: Read>(reader: R) -> Result<Self, ReadError> {
        let schema: ModelSchema = serde_json::from_reader(reader)?;
        Model::try_from(schema)
    }

    /// Load a model from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ReadError> {
        let file = File::open(path)?;
        Self::read_json(BufReader::new(file))
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }
}

/// Read a category map (`{"feature": {"code": "label", ...}, ...}`) from JSON.
pub fn read_category_map<R: Read>(reader: R) -> Result<CategoryMap, ReadError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load a category map from a JSON file.
pub fn load_category_map(path: impl AsRef<Path>) -> Result<CategoryMap, ReadError> {
    let file = File::open(path)?;
    read_category_map(BufReader::new(file))
}
