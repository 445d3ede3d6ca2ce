//! Quality scorer
//!
//! Pure scoring of enriched annotations plus the cooperative batch
//! schedule. The scorer holds only its policy; metrics are recomputed
//! on demand and never cached here.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use super::policy::ScoringPolicy;
use super::types::QualityMetrics;
use crate::annotations::{AnnotationType, AuthorStats, EnrichedAnnotation};
use crate::error::Result;

/// Caller-injected author statistics lookup
///
/// The layer never fetches statistics on its own; the host supplies an
/// implementation backed by whatever store it uses. A failed lookup
/// degrades to scoring without reputation, never a batch failure.
#[async_trait]
pub trait AuthorStatsProvider: Send + Sync {
    /// Statistics for one author, `None` when the store has none
    async fn author_stats(&self, author_id: &str) -> Result<Option<AuthorStats>>;
}

/// Attach author statistics to a batch of annotations
///
/// Lookups run through the provider with at most `max_concurrency` in
/// flight, the systems-native replacement for pacing a rate-limited
/// stats backend. Input order is preserved.
pub async fn enrich_author_stats(
    annotations: &[EnrichedAnnotation],
    provider: &dyn AuthorStatsProvider,
    max_concurrency: usize,
) -> Vec<EnrichedAnnotation> {
    let max_concurrency = max_concurrency.max(1);

    stream::iter(annotations.iter().cloned())
        .map(|mut annotation| async move {
            match provider.author_stats(&annotation.author_id).await {
                Ok(stats) => annotation.author_stats = stats,
                Err(e) => {
                    warn!(
                        author_id = %annotation.author_id,
                        error = %e,
                        "author stats lookup failed, scoring without reputation"
                    );
                    annotation.author_stats = None;
                }
            }
            annotation
        })
        .buffered(max_concurrency)
        .collect()
        .await
}

/// Composite quality scorer
///
/// Stateless apart from its policy: every method is a pure function of
/// its inputs (and, for the `Utc::now()` convenience entry points, the
/// clock).
#[derive(Debug, Clone)]
pub struct QualityScorer {
    policy: ScoringPolicy,
}

impl Default for QualityScorer {
    fn default() -> Self {
        Self {
            policy: ScoringPolicy::default(),
        }
    }
}

impl QualityScorer {
    /// Create a scorer with a validated policy
    pub fn new(policy: ScoringPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// The active policy
    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Score one annotation against the current clock
    pub fn score(&self, annotation: &EnrichedAnnotation) -> QualityMetrics {
        self.score_at(annotation, Utc::now())
    }

    /// Score one annotation against an explicit clock
    ///
    /// An annotation with empty text and empty comment is an invalid
    /// record and short-circuits to the zero metric.
    pub fn score_at(&self, annotation: &EnrichedAnnotation, now: DateTime<Utc>) -> QualityMetrics {
        let text = annotation.text.trim();
        let comment = annotation.comment.as_deref().unwrap_or("").trim();
        if text.is_empty() && comment.is_empty() {
            return QualityMetrics::zero();
        }

        let content_quality = clamp(self.content_quality(text, comment));
        let social_engagement = clamp(social_engagement(annotation));
        let author_reputation = clamp(author_reputation(annotation.author_stats.as_ref()));
        let recency = clamp(recency(annotation.created_at, now));
        let relevance = clamp(self.relevance(annotation));

        let w = &self.policy.weights;
        let total = content_quality * w.content_quality
            + social_engagement * w.social_engagement
            + author_reputation * w.author_reputation
            + recency * w.recency
            + relevance * w.relevance;

        QualityMetrics {
            content_quality,
            social_engagement,
            author_reputation,
            recency,
            relevance,
            total_score: round2(total),
        }
    }

    /// Score a batch, keyed by annotation id
    ///
    /// Processes chunks of `batch_chunk_size` with `batch_chunk_delay`
    /// between them. The pause is a caller-visible scheduling courtesy
    /// toward rate-limited stats providers, not a correctness
    /// requirement; results carry no cross-chunk ordering because the
    /// map is keyed by id.
    pub async fn score_batch(
        &self,
        annotations: &[EnrichedAnnotation],
    ) -> HashMap<String, QualityMetrics> {
        let mut results = HashMap::with_capacity(annotations.len());
        let chunk_size = self.policy.batch_chunk_size.max(1);
        let delay = Duration::from_millis(self.policy.batch_chunk_delay_ms);

        let mut chunks = annotations.chunks(chunk_size).peekable();
        while let Some(chunk) = chunks.next() {
            let now = Utc::now();
            for annotation in chunk {
                results.insert(annotation.id.clone(), self.score_at(annotation, now));
            }
            debug!(
                scored = results.len(),
                total = annotations.len(),
                "batch scoring progress"
            );
            if chunks.peek().is_some() && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        results
    }

    /// Rank annotations by total score, best first
    ///
    /// Ties are broken by creation time, newest first. Idempotent:
    /// ranking an already-ranked sequence preserves its order.
    pub fn rank(&self, annotations: &[EnrichedAnnotation]) -> Vec<EnrichedAnnotation> {
        let now = Utc::now();
        let metrics: HashMap<String, QualityMetrics> = annotations
            .iter()
            .map(|a| (a.id.clone(), self.score_at(a, now)))
            .collect();
        self.rank_with_metrics(annotations, &metrics)
    }

    /// Rank using precomputed metrics
    pub fn rank_with_metrics(
        &self,
        annotations: &[EnrichedAnnotation],
        metrics: &HashMap<String, QualityMetrics>,
    ) -> Vec<EnrichedAnnotation> {
        let mut ranked = annotations.to_vec();
        ranked.sort_by(|a, b| {
            let score_a = total_of(metrics, &a.id);
            let score_b = total_of(metrics, &b.id);
            score_b
                .total_cmp(&score_a)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        ranked
    }

    /// Keep annotations whose total score clears a threshold
    pub fn filter_by_min_score(
        &self,
        annotations: &[EnrichedAnnotation],
        threshold: f64,
    ) -> Vec<EnrichedAnnotation> {
        let now = Utc::now();
        annotations
            .iter()
            .filter(|a| self.score_at(a, now).total_score >= threshold)
            .cloned()
            .collect()
    }

    /// Keep annotations whose precomputed total clears a threshold
    pub fn filter_by_min_score_with_metrics(
        &self,
        annotations: &[EnrichedAnnotation],
        threshold: f64,
        metrics: &HashMap<String, QualityMetrics>,
    ) -> Vec<EnrichedAnnotation> {
        annotations
            .iter()
            .filter(|a| total_of(metrics, &a.id) >= threshold)
            .cloned()
            .collect()
    }

    /// Content richness of text and comment
    fn content_quality(&self, text: &str, comment: &str) -> f64 {
        let mut points = 0.0;

        let text_len = text.chars().count();
        points += if text_len >= 150 {
            40.0
        } else if text_len >= 50 {
            30.0
        } else if text_len >= 10 {
            20.0
        } else {
            5.0
        };

        let comment_len = comment.chars().count();
        points += if comment_len >= 100 {
            35.0
        } else if comment_len >= 20 {
            25.0
        } else if comment_len > 0 {
            10.0
        } else {
            0.0
        };

        if !text.is_empty() && !comment.is_empty() {
            points += 15.0;
        }

        if !comment.is_empty() {
            if comment.contains('?') {
                points += 5.0;
            }
            if comment.contains("1.")
                || comment.contains('•')
                || comment.contains('*')
                || comment.contains('-')
            {
                points += 5.0;
            }
            if self.policy.has_academic_keyword(&comment.to_lowercase()) {
                points += 10.0;
            }
        }

        points
    }

    /// Type, placement and color signals
    fn relevance(&self, annotation: &EnrichedAnnotation) -> f64 {
        let mut points = 50.0;

        points += match annotation.annotation_type {
            AnnotationType::Note => 30.0,
            AnnotationType::Highlight => 20.0,
            AnnotationType::Image => 15.0,
            _ => 10.0,
        };
        if annotation.page.is_some() {
            points += 10.0;
        }
        if self.policy.is_important_color(&annotation.color) {
            points += 10.0;
        }

        points
    }
}

fn social_engagement(annotation: &EnrichedAnnotation) -> f64 {
    let likes = (annotation.likes_count as f64 * 5.0).min(50.0);
    let comments = (annotation.comments_count as f64 * 10.0).min(50.0);
    likes + comments
}

fn author_reputation(stats: Option<&AuthorStats>) -> f64 {
    let Some(stats) = stats else {
        // Missing stats are a degraded state, not an error
        return 0.0;
    };

    (stats.annotations_count as f64 * 2.0).min(30.0)
        + (stats.likes_received as f64 * 1.5).min(35.0)
        + (stats.comments_received as f64 * 2.0).min(25.0)
        + (stats.followers_count as f64 * 3.0).min(10.0)
}

/// Step function of age since creation; future timestamps count as new
fn recency(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let age_days = now.signed_duration_since(created_at).num_days();
    match age_days {
        d if d < 1 => 100.0,
        d if d < 7 => 80.0,
        d if d < 30 => 60.0,
        d if d < 90 => 40.0,
        d if d < 365 => 20.0,
        _ => 10.0,
    }
}

fn total_of(metrics: &HashMap<String, QualityMetrics>, id: &str) -> f64 {
    metrics.get(id).map(|m| m.total_score).unwrap_or(0.0)
}

fn clamp(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnnotationError;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn annotation(id: &str) -> EnrichedAnnotation {
        EnrichedAnnotation::new(
            id,
            "a highlighted passage of reasonable length for testing",
            AnnotationType::Highlight,
            "user-1",
        )
        .with_created_at(fixed_now())
    }

    #[test]
    fn test_social_engagement_scenario() {
        let scorer = QualityScorer::default();
        let a = annotation("a").with_social(10, 4);

        let metrics = scorer.score_at(&a, fixed_now());
        assert_eq!(metrics.social_engagement, 90.0);
    }

    #[test]
    fn test_social_engagement_caps() {
        let scorer = QualityScorer::default();
        let a = annotation("a").with_social(1000, 1000);

        let metrics = scorer.score_at(&a, fixed_now());
        assert_eq!(metrics.social_engagement, 100.0);
    }

    #[test]
    fn test_content_quality_tiers() {
        let scorer = QualityScorer::default();

        // 10-char text, no comment: 20 points
        let short = EnrichedAnnotation::new("s", "0123456789", AnnotationType::Highlight, "u")
            .with_created_at(fixed_now());
        assert_eq!(scorer.score_at(&short, fixed_now()).content_quality, 20.0);

        // 60-char text (30) + 28-char comment (25) + both-present bonus (15)
        let text = "a".repeat(60);
        let mid = EnrichedAnnotation::new("m", &text, AnnotationType::Highlight, "u")
            .with_comment("short but over twenty chars.")
            .with_created_at(fixed_now());
        assert_eq!(scorer.score_at(&mid, fixed_now()).content_quality, 70.0);
    }

    #[test]
    fn test_content_quality_structural_signals_clamped() {
        let scorer = QualityScorer::default();
        let comment = format!(
            "Does the evidence hold? 1. check the methodology {}",
            "x".repeat(60)
        );
        let a = EnrichedAnnotation::new("c", &"t".repeat(160), AnnotationType::Note, "u")
            .with_comment(&comment)
            .with_created_at(fixed_now());

        // 40 + 35 + 15 + 5 + 5 + 10 = 110, clamped to 100
        assert_eq!(scorer.score_at(&a, fixed_now()).content_quality, 100.0);
    }

    #[test]
    fn test_author_reputation_from_stats() {
        let scorer = QualityScorer::default();
        let a = annotation("r").with_author_stats(AuthorStats {
            annotations_count: 20,
            likes_received: 10,
            comments_received: 5,
            followers_count: 2,
        });

        // min(40,30) + min(15,35) + min(10,25) + min(6,10) = 61
        assert_eq!(scorer.score_at(&a, fixed_now()).author_reputation, 61.0);
    }

    #[test]
    fn test_missing_author_stats_scores_zero_reputation() {
        let scorer = QualityScorer::default();
        let metrics = scorer.score_at(&annotation("r"), fixed_now());

        assert_eq!(metrics.author_reputation, 0.0);
        assert!(metrics.total_score > 0.0);
    }

    #[test]
    fn test_recency_steps() {
        let now = fixed_now();
        let cases = [
            (chrono::Duration::hours(12), 100.0),
            (chrono::Duration::days(3), 80.0),
            (chrono::Duration::days(20), 60.0),
            (chrono::Duration::days(60), 40.0),
            (chrono::Duration::days(200), 20.0),
            (chrono::Duration::days(400), 10.0),
            // A future timestamp counts as brand new
            (chrono::Duration::days(-2), 100.0),
        ];

        for (age, expected) in cases {
            assert_eq!(recency(now - age, now), expected, "age {age}");
        }
    }

    #[test]
    fn test_relevance_signals() {
        let scorer = QualityScorer::default();

        let full = EnrichedAnnotation::new("f", "text of sufficient length", AnnotationType::Note, "u")
            .with_page(3)
            .with_color("red")
            .with_created_at(fixed_now());
        assert_eq!(scorer.score_at(&full, fixed_now()).relevance, 100.0);

        let bare =
            EnrichedAnnotation::new("b", "text of sufficient length", AnnotationType::Underline, "u")
                .with_color("blue")
                .with_created_at(fixed_now());
        assert_eq!(scorer.score_at(&bare, fixed_now()).relevance, 60.0);
    }

    #[test]
    fn test_total_is_weighted_combination() {
        let scorer = QualityScorer::default();
        let a = EnrichedAnnotation::new("t", &"t".repeat(160), AnnotationType::Note, "u")
            .with_comment(&format!(
                "Does the evidence hold? 1. check the methodology {}",
                "x".repeat(60)
            ))
            .with_page(3)
            .with_color("red")
            .with_social(10, 4)
            .with_author_stats(AuthorStats {
                annotations_count: 15,
                likes_received: 24,
                comments_received: 13,
                followers_count: 4,
            })
            .with_created_at(fixed_now() - chrono::Duration::hours(12));

        let metrics = scorer.score_at(&a, fixed_now());
        assert_eq!(metrics.content_quality, 100.0);
        assert_eq!(metrics.social_engagement, 90.0);
        assert_eq!(metrics.author_reputation, 100.0);
        assert_eq!(metrics.recency, 100.0);
        assert_eq!(metrics.relevance, 100.0);
        // 100*.3 + 90*.25 + 100*.2 + 100*.15 + 100*.1
        assert_eq!(metrics.total_score, 97.5);
    }

    #[test]
    fn test_score_boundedness() {
        let scorer = QualityScorer::default();
        let extremes = [
            annotation("lo"),
            EnrichedAnnotation::new("hi", &"t".repeat(500), AnnotationType::Note, "u")
                .with_comment(&format!("research? 1. {}", "c".repeat(200)))
                .with_page(1)
                .with_color("red")
                .with_social(u32::MAX, u32::MAX)
                .with_author_stats(AuthorStats {
                    annotations_count: u32::MAX,
                    likes_received: u32::MAX,
                    comments_received: u32::MAX,
                    followers_count: u32::MAX,
                })
                .with_created_at(fixed_now() - chrono::Duration::days(5000)),
        ];

        for a in &extremes {
            let m = scorer.score_at(a, fixed_now());
            for sub in [
                m.content_quality,
                m.social_engagement,
                m.author_reputation,
                m.recency,
                m.relevance,
                m.total_score,
            ] {
                assert!((0.0..=100.0).contains(&sub), "out of bounds: {sub}");
            }
        }
    }

    #[test]
    fn test_empty_record_short_circuits_to_zero() {
        let scorer = QualityScorer::default();
        let a = EnrichedAnnotation::new("z", "   ", AnnotationType::Highlight, "u")
            .with_social(50, 50)
            .with_created_at(fixed_now());

        assert_eq!(scorer.score_at(&a, fixed_now()), QualityMetrics::zero());
    }

    #[test]
    fn test_rank_ties_break_by_recency() {
        let scorer = QualityScorer::default();
        let older = annotation("older")
            .with_created_at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let newer = annotation("newer")
            .with_created_at(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());

        let mut metrics = HashMap::new();
        let tied = QualityMetrics {
            content_quality: 80.0,
            social_engagement: 80.0,
            author_reputation: 80.0,
            recency: 80.0,
            relevance: 80.0,
            total_score: 81.2,
        };
        metrics.insert("older".to_string(), tied);
        metrics.insert("newer".to_string(), tied);

        let ranked = scorer.rank_with_metrics(&[older, newer], &metrics);
        assert_eq!(ranked[0].id, "newer");
        assert_eq!(ranked[1].id, "older");
    }

    #[test]
    fn test_rank_is_idempotent() {
        let scorer = QualityScorer::default();
        let annotations = vec![
            annotation("a").with_social(10, 4),
            annotation("b"),
            annotation("c").with_social(2, 0),
        ];
        let metrics: HashMap<String, QualityMetrics> = annotations
            .iter()
            .map(|a| (a.id.clone(), scorer.score_at(a, fixed_now())))
            .collect();

        let once = scorer.rank_with_metrics(&annotations, &metrics);
        let twice = scorer.rank_with_metrics(&once, &metrics);

        let ids = |v: &[EnrichedAnnotation]| v.iter().map(|a| a.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn test_rank_empty_input() {
        let scorer = QualityScorer::default();
        assert!(scorer.rank(&[]).is_empty());
    }

    #[test]
    fn test_filter_by_min_score() {
        let scorer = QualityScorer::default();
        let annotations = vec![annotation("strong").with_social(10, 5), annotation("weak")];
        let metrics: HashMap<String, QualityMetrics> = annotations
            .iter()
            .map(|a| (a.id.clone(), scorer.score_at(a, fixed_now())))
            .collect();

        let strong_total = metrics["strong"].total_score;
        let weak_total = metrics["weak"].total_score;
        assert!(strong_total > weak_total);

        let kept =
            scorer.filter_by_min_score_with_metrics(&annotations, weak_total + 0.01, &metrics);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "strong");
    }

    #[test]
    fn test_invalid_policy_rejected_at_construction() {
        let mut policy = ScoringPolicy::default();
        policy.weights.relevance = 0.9;

        assert!(matches!(
            QualityScorer::new(policy),
            Err(AnnotationError::InvalidPolicy(_))
        ));
    }

    #[tokio::test]
    async fn test_score_batch_covers_all_ids() {
        let mut policy = ScoringPolicy::default();
        policy.batch_chunk_delay_ms = 1;
        let scorer = QualityScorer::new(policy).unwrap();

        let annotations: Vec<EnrichedAnnotation> = (0..25)
            .map(|i| annotation(&format!("ann-{i}")).with_social(i, 0))
            .collect();

        let results = scorer.score_batch(&annotations).await;
        assert_eq!(results.len(), 25);
        assert!(results.contains_key("ann-0"));
        assert!(results.contains_key("ann-24"));
        assert_eq!(
            results["ann-24"].social_engagement,
            scorer.score_at(&annotations[24], fixed_now()).social_engagement
        );
    }

    #[tokio::test]
    async fn test_score_batch_empty_input() {
        let scorer = QualityScorer::default();
        assert!(scorer.score_batch(&[]).await.is_empty());
    }

    struct StubProvider;

    #[async_trait]
    impl AuthorStatsProvider for StubProvider {
        async fn author_stats(&self, author_id: &str) -> Result<Option<AuthorStats>> {
            match author_id {
                "user-ok" => Ok(Some(AuthorStats {
                    annotations_count: 5,
                    likes_received: 2,
                    comments_received: 1,
                    followers_count: 0,
                })),
                "user-err" => Err(AnnotationError::StatsLookup {
                    author_id: author_id.to_string(),
                    reason: "backend unavailable".to_string(),
                }),
                _ => Ok(None),
            }
        }
    }

    #[tokio::test]
    async fn test_enrich_degrades_on_lookup_failure() {
        let annotations = vec![
            EnrichedAnnotation::new("1", "text of sufficient length", AnnotationType::Note, "user-ok"),
            EnrichedAnnotation::new("2", "text of sufficient length", AnnotationType::Note, "user-err"),
            EnrichedAnnotation::new("3", "text of sufficient length", AnnotationType::Note, "user-new"),
        ];

        let enriched = enrich_author_stats(&annotations, &StubProvider, 2).await;

        assert_eq!(enriched.len(), 3);
        assert_eq!(enriched[0].id, "1");
        assert!(enriched[0].author_stats.is_some());
        assert!(enriched[1].author_stats.is_none());
        assert!(enriched[2].author_stats.is_none());
    }
}
