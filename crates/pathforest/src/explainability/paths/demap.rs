//! Human-readable rendering of split conditions.
//!
//! Label-encoded categorical features are split on integer codes. When a
//! threshold lands exactly on a known code it is shown as the original
//! category; every other threshold is shown numerically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{DecisionPath, SplitCondition};

/// Reverse mapping from integer codes to original category labels, per feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryMap {
    features: BTreeMap<String, BTreeMap<i64, String>>,
}

impl CategoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `code -> label` for `feature`.
    pub fn insert(
        &mut self,
        feature: impl Into<String>,
        code: i64,
        label: impl Into<String>,
    ) -> &mut Self {
        self.features
            .entry(feature.into())
            .or_default()
            .insert(code, label.into());
        self
    }

    /// Register a whole feature at once (builder pattern).
    pub fn with_feature<I, L>(mut self, feature: impl Into<String>, codes: I) -> Self
    where
        I: IntoIterator<Item = (i64, L)>,
        L: Into<String>,
    {
        let entry = self.features.entry(feature.into()).or_default();
        for (code, label) in codes {
            entry.insert(code, label.into());
        }
        self
    }

    /// Whether `feature` is a mapped categorical feature.
    pub fn contains_feature(&self, feature: &str) -> bool {
        self.features.contains_key(feature)
    }

    /// Original label of `code` for `feature`.
    pub fn label(&self, feature: &str, code: i64) -> Option<&str> {
        self.features
            .get(feature)
            .and_then(|codes| codes.get(&code))
            .map(String::as_str)
    }

    /// Number of mapped features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Render one condition.
    ///
    /// - Mapped feature, integer threshold with a known code: `Material <= Concrete`
    /// - Mapped feature, integer threshold without a code: `Material > -1`
    /// - Anything else: `Height <= 12.5000`
    pub fn render_condition(&self, condition: &SplitCondition) -> String {
        let feature = condition.feature();
        let op = condition.op().symbol();
        let threshold = condition.threshold();

        if let Some(codes) = self.features.get(feature) {
            if let Some(code) = integer_code(threshold) {
                return match codes.get(&code) {
                    Some(label) => format!("{feature} {op} {label}"),
                    None => format!("{feature} {op} {threshold}"),
                };
            }
        }

        format!("{feature} {op} {threshold:.4}")
    }

    /// Render every condition of `path`, joined by `delimiter`.
    pub fn render_path(&self, path: &DecisionPath, delimiter: &str) -> String {
        path.conditions()
            .iter()
            .map(|c| self.render_condition(c))
            .collect::<Vec<_>>()
            .join(delimiter)
    }
}

/// The threshold as an integer code, if it is integer-valued and representable.
fn integer_code(threshold: f64) -> Option<i64> {
    if !threshold.is_finite() || threshold.fract() != 0.0 {
        return None;
    }
    if threshold < i64::MIN as f64 || threshold >= i64::MAX as f64 {
        return None;
    }
    Some(threshold as i64)
}
