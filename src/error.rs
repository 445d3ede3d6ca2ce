//! Annotation layer error types
//!
//! Unified error handling for extraction, matching and scoring.
//! Nothing in this layer is fatal: extraction failures are scoped to a
//! single page, stats-lookup failures degrade to a zero reputation
//! sub-metric, and bad policy values are rejected before any scoring
//! happens.

use thiserror::Error;

/// Unified annotation layer error type
#[derive(Debug, Error)]
pub enum AnnotationError {
    /// Text extraction failed for one page
    #[error("Text extraction error: {0}")]
    TextExtraction(String),

    /// Page index outside the source's page range
    #[error("Page not found: index {0}")]
    PageNotFound(usize),

    /// Author statistics lookup failed
    #[error("Author stats lookup failed for {author_id}: {reason}")]
    StatsLookup { author_id: String, reason: String },

    /// Scoring policy rejected at validation time
    #[error("Invalid scoring policy: {0}")]
    InvalidPolicy(String),
}

/// Result type alias for annotation layer operations
pub type Result<T> = std::result::Result<T, AnnotationError>;
