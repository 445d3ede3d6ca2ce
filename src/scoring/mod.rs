//! Annotation quality scoring
//!
//! Converts heterogeneous signals (content richness, social
//! engagement, author standing, recency, topical relevance) into a
//! single 0-100 composite score used to sort and filter shared
//! annotations. Scoring is a pure computation over the enriched
//! annotation; the weights and vocabularies live in a serde-loadable
//! [`ScoringPolicy`].

mod policy;
mod scorer;
mod stats;
mod types;

pub use policy::{ScoreWeights, ScoringPolicy};
pub use scorer::{enrich_author_stats, AuthorStatsProvider, QualityScorer};
pub use stats::quality_stats;
pub use types::{QualityMetrics, QualityStats, ScoreDistribution};
