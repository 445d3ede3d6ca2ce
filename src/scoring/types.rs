//! Scoring types

use serde::{Deserialize, Serialize};

/// Composite quality metrics for one annotation
///
/// Each sub-metric is clamped to [0, 100] before weighting, so the
/// total is always in [0, 100] as well. Recomputed on demand; this
/// layer never caches metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    /// Content richness of text and comment
    pub content_quality: f64,
    /// Likes and comments received
    pub social_engagement: f64,
    /// Author's standing from their aggregate statistics
    pub author_reputation: f64,
    /// Step function of age since creation
    pub recency: f64,
    /// Type, placement and color signals
    pub relevance: f64,
    /// Weighted combination, rounded to 2 decimals
    pub total_score: f64,
}

impl QualityMetrics {
    /// The all-zero metric, used for invalid input records
    pub fn zero() -> Self {
        Self {
            content_quality: 0.0,
            social_engagement: 0.0,
            author_reputation: 0.0,
            recency: 0.0,
            relevance: 0.0,
            total_score: 0.0,
        }
    }
}

/// Score distribution buckets over a scored collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDistribution {
    /// Total score >= 80
    pub excellent: usize,
    /// Total score in [60, 80)
    pub good: usize,
    /// Total score in [40, 60)
    pub average: usize,
    /// Total score < 40
    pub poor: usize,
}

/// Aggregate statistics over a scored collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityStats {
    pub count: usize,
    pub average: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub distribution: ScoreDistribution,
}
