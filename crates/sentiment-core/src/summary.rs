//! Aggregation of classification results

use crate::classification::{ClassificationResult, SentimentLabel};
use serde::Serialize;
use std::collections::BTreeMap;

/// Label frequencies and mean score over a batch of results
///
/// Only labels that occur in the batch have an entry in [`counts`]; use
/// [`count`] to read absent labels as zero.
///
/// [`counts`]: SentimentSummary::counts
/// [`count`]: SentimentSummary::count
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SentimentSummary {
    counts: BTreeMap<SentimentLabel, usize>,
    mean_score: f64,
    total: usize,
}

impl SentimentSummary {
    pub fn counts(&self) -> &BTreeMap<SentimentLabel, usize> {
        &self.counts
    }

    pub fn count(&self, label: SentimentLabel) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    /// Arithmetic mean of all scores, 0.0 for an empty batch
    pub fn mean_score(&self) -> f64 {
        self.mean_score
    }

    /// Number of results summarized
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Summarize a batch of results
///
/// The result does not depend on input order. Scores are summed in sorted
/// order so the mean is bit-for-bit identical for any permutation.
pub fn summarize<'a, I>(results: I) -> SentimentSummary
where
    I: IntoIterator<Item = &'a ClassificationResult>,
{
    let mut counts = BTreeMap::new();
    let mut scores = Vec::new();

    for result in results {
        *counts.entry(result.label()).or_insert(0) += 1;
        scores.push(result.score());
    }

    let total = scores.len();
    let mean_score = if total == 0 {
        0.0
    } else {
        scores.sort_by(f64::total_cmp);
        scores.iter().sum::<f64>() / total as f64
    };

    SentimentSummary {
        counts,
        mean_score,
        total,
    }
}
