//! Class label types.
//!
//! The analysis is generic over the label type so the same code serves the
//! five damage-state model (labels `0..=4`) and the binary functional /
//! non-functional model (`AFS` / `UFS`).

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Requirements for a class label.
///
/// Labels key the per-class groups (ordered map), identify identical
/// outcomes and appear in reports.
pub trait ClassLabel: Clone + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync {}

impl<T> ClassLabel for T where T: Clone + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync {}

/// Integer-or-symbol class label as found in exported models.
///
/// Deserializes from either a JSON integer or a JSON string. Integer codes
/// order before symbols.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Code(i64),
    Name(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Code(code) => write!(f, "{code}"),
            Label::Name(name) => f.write_str(name),
        }
    }
}

impl From<i64> for Label {
    fn from(code: i64) -> Self {
        Label::Code(code)
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Label::Name(name.to_string())
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        Label::Name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_codes_and_names() {
        let labels: Vec<Label> = serde_json::from_str(r#"[0, 4, "AFS", "UFS"]"#).unwrap();
        assert_eq!(
            labels,
            vec![Label::Code(0), Label::Code(4), Label::from("AFS"), Label::from("UFS")]
        );
    }

    #[test]
    fn codes_order_before_names() {
        let mut labels = vec![Label::from("UFS"), Label::Code(3), Label::from("AFS"), Label::Code(1)];
        labels.sort();
        assert_eq!(
            labels,
            vec![Label::Code(1), Label::Code(3), Label::from("AFS"), Label::from("UFS")]
        );
    }

    #[test]
    fn display() {
        assert_eq!(Label::Code(2).to_string(), "2");
        assert_eq!(Label::from("AFS").to_string(), "AFS");
    }
}
