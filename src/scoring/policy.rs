//! Scoring policy
//!
//! The weights, vocabularies and batch pacing used by the scorer.
//! The important-color list and academic-keyword vocabulary are policy
//! data rather than algorithmic truth, so deployments can tune them
//! without touching the scoring code. A policy is validated once at
//! configuration time; scoring itself never fails.

use serde::{Deserialize, Serialize};

use crate::error::{AnnotationError, Result};

/// Weights of the five sub-metrics in the total score
///
/// Must sum to 1.0 so the total stays within [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreWeights {
    pub content_quality: f64,
    pub social_engagement: f64,
    pub author_reputation: f64,
    pub recency: f64,
    pub relevance: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            content_quality: 0.30,
            social_engagement: 0.25,
            author_reputation: 0.20,
            recency: 0.15,
            relevance: 0.10,
        }
    }
}

impl ScoreWeights {
    fn sum(&self) -> f64 {
        self.content_quality
            + self.social_engagement
            + self.author_reputation
            + self.recency
            + self.relevance
    }

    fn all(&self) -> [f64; 5] {
        [
            self.content_quality,
            self.social_engagement,
            self.author_reputation,
            self.recency,
            self.relevance,
        ]
    }
}

/// Scoring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringPolicy {
    /// Sub-metric weights; must sum to 1.0
    pub weights: ScoreWeights,
    /// Highlight colors that signal importance
    pub important_colors: Vec<String>,
    /// Comment keywords that signal academic substance
    pub academic_keywords: Vec<String>,
    /// Annotations scored per batch chunk
    pub batch_chunk_size: usize,
    /// Pause between batch chunks, in milliseconds
    pub batch_chunk_delay_ms: u64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            important_colors: vec![
                "red".to_string(),
                "orange".to_string(),
                "yellow".to_string(),
            ],
            academic_keywords: vec![
                "research".to_string(),
                "study".to_string(),
                "analysis".to_string(),
                "evidence".to_string(),
                "hypothesis".to_string(),
                "conclusion".to_string(),
                "methodology".to_string(),
                "findings".to_string(),
            ],
            batch_chunk_size: 10,
            batch_chunk_delay_ms: 100,
        }
    }
}

impl ScoringPolicy {
    /// Parse a policy from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let policy: Self = serde_json::from_str(json)
            .map_err(|e| AnnotationError::InvalidPolicy(e.to_string()))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Reject weight vectors that would break score boundedness
    pub fn validate(&self) -> Result<()> {
        if self.weights.all().iter().any(|w| !(0.0..=1.0).contains(w)) {
            return Err(AnnotationError::InvalidPolicy(
                "each weight must be in [0, 1]".to_string(),
            ));
        }
        if (self.weights.sum() - 1.0).abs() > 1e-9 {
            return Err(AnnotationError::InvalidPolicy(format!(
                "weights must sum to 1.0, got {}",
                self.weights.sum()
            )));
        }
        if self.batch_chunk_size == 0 {
            return Err(AnnotationError::InvalidPolicy(
                "batch chunk size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a highlight color is in the important set
    pub fn is_important_color(&self, color: &str) -> bool {
        let color = color.trim();
        self.important_colors
            .iter()
            .any(|c| c.eq_ignore_ascii_case(color))
    }

    /// Whether a lowercased comment contains an academic keyword
    pub fn has_academic_keyword(&self, comment_lower: &str) -> bool {
        self.academic_keywords
            .iter()
            .any(|kw| comment_lower.contains(kw.as_str()))
    }
}
