//! Frequency ranking of decision paths within one class.

use std::collections::HashMap;

use super::{DecisionPath, PathRecord};

/// A frequent path for one class.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPath {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub path: DecisionPath,
    /// Number of leaves in the forest reached through exactly this path.
    pub count: usize,
    /// `100 * count / total`, where `total` counts every path of the class.
    pub percentage: f64,
    /// Mean leaf confidence over all occurrences of the path.
    pub mean_confidence: f64,
}

#[derive(Debug, Clone)]
struct TallyEntry<'a> {
    path: &'a DecisionPath,
    count: usize,
    confidence_sum: f64,
}

/// Occurrence counts of every distinct path in one class group.
///
/// Entries are kept in first-occurrence order.
#[derive(Debug, Clone)]
pub struct PathTally<'a> {
    entries: Vec<TallyEntry<'a>>,
    total: usize,
}

impl<'a> PathTally<'a> {
    /// Count structurally identical paths in `records`.
    pub fn from_records<C>(records: &'a [PathRecord<C>]) -> Self {
        let mut index: HashMap<&'a DecisionPath, usize> = HashMap::with_capacity(records.len());
        let mut entries: Vec<TallyEntry<'a>> = Vec::new();

        for record in records {
            let slot = *index.entry(&record.path).or_insert_with(|| {
                entries.push(TallyEntry {
                    path: &record.path,
                    count: 0,
                    confidence_sum: 0.0,
                });
                entries.len() - 1
            });
            let entry = &mut entries[slot];
            entry.count += 1;
            entry.confidence_sum += record.outcome.confidence;
        }

        Self {
            entries,
            total: records.len(),
        }
    }

    /// Total number of records in the class.
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct paths.
    #[inline]
    pub fn n_distinct(&self) -> usize {
        self.entries.len()
    }

    /// `(path, count)` pairs in first-occurrence order.
    pub fn counts(&self) -> impl Iterator<Item = (&'a DecisionPath, usize)> + '_ {
        self.entries.iter().map(|e| (e.path, e.count))
    }

    /// The `k` most frequent paths, ties kept in first-occurrence order.
    pub fn top_k(&self, k: usize) -> Vec<RankedPath> {
        let mut order: Vec<&TallyEntry<'a>> = self.entries.iter().collect();
        // Stable sort keeps first-occurrence order among equal counts.
        order.sort_by(|a, b| b.count.cmp(&a.count));

        order
            .into_iter()
            .take(k)
            .enumerate()
            .map(|(i, entry)| RankedPath {
                rank: i + 1,
                path: entry.path.clone(),
                count: entry.count,
                percentage: 100.0 * entry.count as f64 / self.total as f64,
                mean_confidence: entry.confidence_sum / entry.count as f64,
            })
            .collect()
    }
}

/// Rank the `top_k` most frequent paths among one class's records.
///
/// Returns an empty ranking for an empty record list.
pub fn rank_paths<C>(records: &[PathRecord<C>], top_k: usize) -> Vec<RankedPath> {
    PathTally::from_records(records).top_k(top_k)
}
