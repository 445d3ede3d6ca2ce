//! Aggregate statistics over a scored collection
//!
//! A pure aggregate: count, average, median, min, max and a four-bucket
//! distribution over the total scores. No I/O and no state.

use std::collections::HashMap;

use super::types::{QualityMetrics, QualityStats, ScoreDistribution};

/// Compute aggregate statistics over a scored collection
///
/// An empty collection yields the all-zero stats rather than an error.
pub fn quality_stats(metrics: &HashMap<String, QualityMetrics>) -> QualityStats {
    if metrics.is_empty() {
        return QualityStats::default();
    }

    let mut totals: Vec<f64> = metrics.values().map(|m| m.total_score).collect();
    totals.sort_by(f64::total_cmp);

    let count = totals.len();
    let sum: f64 = totals.iter().sum();
    let median = if count % 2 == 1 {
        totals[count / 2]
    } else {
        (totals[count / 2 - 1] + totals[count / 2]) / 2.0
    };

    QualityStats {
        count,
        average: round2(sum / count as f64),
        median: round2(median),
        min: totals[0],
        max: totals[count - 1],
        distribution: distribution(&totals),
    }
}

fn distribution(totals: &[f64]) -> ScoreDistribution {
    let mut dist = ScoreDistribution::default();
    for &total in totals {
        if total >= 80.0 {
            dist.excellent += 1;
        } else if total >= 60.0 {
            dist.good += 1;
        } else if total >= 40.0 {
            dist.average += 1;
        } else {
            dist.poor += 1;
        }
    }
    dist
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
