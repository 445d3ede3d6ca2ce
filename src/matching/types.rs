//! Matching types and position ordering
//!
//! Implements comparison logic for unit positions to enable sorting
//! matched annotations into reading order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::annotations::RawAnnotation;
use crate::extract::TextUnit;

/// The strategy that produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchStrategy {
    /// Normalized unit text contains the normalized annotation text
    Exact,
    /// Normalized unit context contains the normalized annotation text
    Context,
    /// Token-set Jaccard similarity between the normalized texts
    TokenSimilarity,
    /// Annotation keywords found among the unit's context words
    KeywordOverlap,
}

/// An annotation located in the document's unit sequence
///
/// Only produced when a match cleared the confidence threshold; an
/// annotation that could not be located yields no value at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedAnnotation {
    /// The original annotation record
    #[serde(flatten)]
    pub annotation: RawAnnotation,
    /// The best-matching text unit
    pub position: TextUnit,
    /// Match confidence in [0, 1]
    pub confidence: f64,
    /// Strategy that produced the match
    pub strategy: MatchStrategy,
}

impl MatchedAnnotation {
    /// Reading-order position of the matched unit
    pub fn unit_position(&self) -> UnitPosition {
        UnitPosition::from(&self.position)
    }
}

/// Reading-order position of a text unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitPosition {
    /// Page number (1-indexed)
    pub page: u32,
    /// Paragraph index within the page
    pub paragraph: usize,
    /// Sentence index within the paragraph
    pub sentence: usize,
}

impl From<&TextUnit> for UnitPosition {
    fn from(unit: &TextUnit) -> Self {
        Self {
            page: unit.page,
            paragraph: unit.paragraph_index,
            sentence: unit.sentence_index,
        }
    }
}

impl Ord for UnitPosition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.page
            .cmp(&other.page)
            .then_with(|| self.paragraph.cmp(&other.paragraph))
            .then_with(|| self.sentence.cmp(&other.sentence))
    }
}

impl PartialOrd for UnitPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Determine if position `a` comes before position `b` in reading order
pub fn is_before(a: &UnitPosition, b: &UnitPosition) -> bool {
    a < b
}

/// Determine if position `a` comes after position `b` in reading order
pub fn is_after(a: &UnitPosition, b: &UnitPosition) -> bool {
    a > b
}
