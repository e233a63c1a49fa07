//! Split conditions, decision paths and leaf outcomes.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use ndarray::ArrayView1;

use crate::repr::NodeId;

/// Comparison applied by a split condition.
///
/// Matches the split semantics used at training time: samples with
/// `x <= threshold` take the left branch, `x > threshold` the right branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    LessOrEqual,
    Greater,
}

impl Comparison {
    #[inline]
    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::LessOrEqual => "<=",
            Comparison::Greater => ">",
        }
    }

    /// Evaluate `value <op> threshold`. NaN never satisfies `<=`.
    #[inline]
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::LessOrEqual => value <= threshold,
            Comparison::Greater => !(value <= threshold),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One predicate on a root-to-leaf path.
///
/// Equality and hashing compare thresholds bit for bit, so two conditions
/// only match when they were produced by the very same split value.
#[derive(Debug, Clone)]
pub struct SplitCondition {
    feature_index: u32,
    feature: Arc<str>,
    op: Comparison,
    threshold: f64,
}

impl SplitCondition {
    pub fn new(feature_index: u32, feature: Arc<str>, op: Comparison, threshold: f64) -> Self {
        Self {
            feature_index,
            feature,
            op,
            threshold,
        }
    }

    #[inline]
    pub fn feature_index(&self) -> u32 {
        self.feature_index
    }

    /// Feature name.
    #[inline]
    pub fn feature(&self) -> &str {
        &self.feature
    }

    #[inline]
    pub fn op(&self) -> Comparison {
        self.op
    }

    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether `sample` satisfies this condition.
    #[inline]
    pub fn matches(&self, sample: ArrayView1<'_, f64>) -> bool {
        self.op.holds(sample[self.feature_index as usize], self.threshold)
    }
}

impl PartialEq for SplitCondition {
    fn eq(&self, other: &Self) -> bool {
        self.feature_index == other.feature_index
            && self.op == other.op
            && self.threshold.to_bits() == other.threshold.to_bits()
            && self.feature == other.feature
    }
}

impl Eq for SplitCondition {}

impl Hash for SplitCondition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.feature_index.hash(state);
        self.feature.hash(state);
        self.op.hash(state);
        self.threshold.to_bits().hash(state);
    }
}

impl fmt::Display for SplitCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:.4}", self.feature, self.op, self.threshold)
    }
}

/// Ordered root-to-leaf sequence of split conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DecisionPath(Vec<SplitCondition>);

impl DecisionPath {
    /// The empty path (root-only tree).
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_conditions(conditions: Vec<SplitCondition>) -> Self {
        Self(conditions)
    }

    /// This path followed by one more condition.
    pub fn extended(mut self, condition: SplitCondition) -> Self {
        self.0.push(condition);
        self
    }

    #[inline]
    pub fn conditions(&self) -> &[SplitCondition] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `sample` satisfies every condition on the path.
    pub fn matches(&self, sample: ArrayView1<'_, f64>) -> bool {
        self.0.iter().all(|c| c.matches(sample))
    }
}

impl fmt::Display for DecisionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, condition) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            write!(f, "{condition}")?;
        }
        Ok(())
    }
}

/// Prediction stored at a leaf: argmax class and its probability.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafOutcome<C> {
    pub class: C,
    pub confidence: f64,
}

/// A decision path together with the outcome of the leaf it ends in.
#[derive(Debug, Clone, PartialEq)]
pub struct PathRecord<C> {
    pub path: DecisionPath,
    pub outcome: LeafOutcome<C>,
    /// Leaf node the path ends in, local to its tree.
    pub leaf: NodeId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn cond(idx: u32, name: &str, op: Comparison, t: f64) -> SplitCondition {
        SplitCondition::new(idx, Arc::from(name), op, t)
    }

    #[test]
    fn comparison_boundary() {
        assert!(Comparison::LessOrEqual.holds(2.0, 2.0));
        assert!(!Comparison::Greater.holds(2.0, 2.0));
        assert!(Comparison::Greater.holds(f64::NAN, 2.0));
        assert!(!Comparison::LessOrEqual.holds(f64::NAN, 2.0));
    }

    #[test]
    fn equality_is_bitwise_on_threshold() {
        let a = cond(0, "X1", Comparison::LessOrEqual, 0.1 + 0.2);
        let b = cond(0, "X1", Comparison::LessOrEqual, 0.3);
        let c = cond(0, "X1", Comparison::LessOrEqual, 0.1 + 0.2);
        assert_ne!(a, b);
        assert_eq!(a, c);
        assert_ne!(a, cond(0, "X1", Comparison::Greater, 0.1 + 0.2));
    }

    #[test]
    fn path_matches_sample() {
        let path = DecisionPath::root()
            .extended(cond(0, "X1", Comparison::LessOrEqual, 2.0))
            .extended(cond(1, "X2", Comparison::Greater, -1.0));

        assert_eq!(path.len(), 2);
        assert!(path.matches(array![2.0, 0.0].view()));
        assert!(!path.matches(array![2.5, 0.0].view()));
        assert!(!path.matches(array![1.0, -1.0].view()));
        assert!(DecisionPath::root().matches(array![9.0].view()));
    }

    #[test]
    fn display() {
        let path = DecisionPath::from_conditions(vec![
            cond(0, "X1", Comparison::LessOrEqual, 2.0),
            cond(0, "X1", Comparison::Greater, 0.5),
        ]);
        assert_eq!(path.to_string(), "X1 <= 2.0000 AND X1 > 0.5000");
    }
}
