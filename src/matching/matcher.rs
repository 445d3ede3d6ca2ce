//! Position matcher
//!
//! Locates an annotation's stored text inside the extracted unit
//! sequence. Strategies are tried per unit in order of strictness
//! (exact containment, context containment, token-set similarity,
//! keyword overlap); the overall winner is the highest-confidence unit
//! across the whole sequence, not the first hit. Ties go to the
//! earliest unit in reading order.

use std::collections::HashSet;

use tracing::debug;

use super::normalize::{jaccard_similarity, normalize};
use super::types::{MatchStrategy, MatchedAnnotation, UnitPosition};
use crate::annotations::RawAnnotation;
use crate::extract::TextUnit;

/// Matches below this confidence are rejected
const MIN_CONFIDENCE: f64 = 0.7;

/// Normalized annotation texts shorter than this cannot be matched
const MIN_ANNOTATION_CHARS: usize = 10;

/// Confidence for exact containment in the unit's own text
const EXACT_CONFIDENCE: f64 = 1.0;

/// Confidence for containment in the unit's surrounding context
const CONTEXT_CONFIDENCE: f64 = 0.9;

/// Token-set similarity must exceed this to count at all
const TOKEN_SIMILARITY_FLOOR: f64 = 0.8;

/// Token-set similarity is discounted by this factor
const TOKEN_SIMILARITY_WEIGHT: f64 = 0.8;

/// Keyword overlap must reach this fraction to count at all
const KEYWORD_OVERLAP_FLOOR: f64 = 0.6;

/// Keyword overlap is discounted by this factor
const KEYWORD_OVERLAP_WEIGHT: f64 = 0.7;

/// Only annotation words longer than this count as keywords
const KEYWORD_MIN_WORD_CHARS: usize = 3;

/// Locate one annotation in the unit sequence
///
/// Returns `None` when the annotation text is below the matching floor
/// or no unit clears the confidence threshold. Absence is the normal
/// "could not locate annotation in document" outcome, not an error.
pub fn match_annotation(
    annotation: &RawAnnotation,
    units: &[TextUnit],
) -> Option<MatchedAnnotation> {
    let needle = normalize(&annotation.text);
    if needle.chars().count() < MIN_ANNOTATION_CHARS {
        return None;
    }

    let mut best: Option<(usize, f64, MatchStrategy)> = None;
    for (index, unit) in units.iter().enumerate() {
        let Some((confidence, strategy)) = evaluate_unit(&needle, unit) else {
            continue;
        };
        if confidence < MIN_CONFIDENCE {
            continue;
        }
        // Strictly-greater keeps the earliest unit on exact ties.
        if best.map_or(true, |(_, c, _)| confidence > c) {
            best = Some((index, confidence, strategy));
        }
    }

    best.map(|(index, confidence, strategy)| MatchedAnnotation {
        annotation: annotation.clone(),
        position: units[index].clone(),
        confidence,
        strategy,
    })
}

/// Locate every annotation in the sequence, omitting the unmatched
pub fn match_all(annotations: &[RawAnnotation], units: &[TextUnit]) -> Vec<MatchedAnnotation> {
    let mut matched = Vec::new();
    for annotation in annotations {
        match match_annotation(annotation, units) {
            Some(m) => matched.push(m),
            None => {
                debug!(id = ?annotation.id, "annotation could not be located in document");
            }
        }
    }
    matched
}

/// All matched annotations near a reading position
///
/// Returns the annotations on `page` whose paragraph index differs from
/// `paragraph` by at most one, ordered ascending by (paragraph,
/// sentence). Purely a filter and sort.
pub fn annotations_for_position(
    page: u32,
    paragraph: usize,
    matched: &[MatchedAnnotation],
) -> Vec<MatchedAnnotation> {
    let mut nearby: Vec<MatchedAnnotation> = matched
        .iter()
        .filter(|m| m.position.page == page && m.position.paragraph_index.abs_diff(paragraph) <= 1)
        .cloned()
        .collect();

    nearby.sort_by_key(|m| UnitPosition::from(&m.position));
    nearby
}

/// Evaluate one unit against the normalized annotation text
fn evaluate_unit(needle: &str, unit: &TextUnit) -> Option<(f64, MatchStrategy)> {
    let unit_text = normalize(&unit.text);
    if unit_text.contains(needle) {
        return Some((EXACT_CONFIDENCE, MatchStrategy::Exact));
    }

    let unit_context = normalize(&unit.context);
    if unit_context.contains(needle) {
        return Some((CONTEXT_CONFIDENCE, MatchStrategy::Context));
    }

    let similarity = jaccard_similarity(needle, &unit_text);
    if similarity > TOKEN_SIMILARITY_FLOOR {
        return Some((similarity * TOKEN_SIMILARITY_WEIGHT, MatchStrategy::TokenSimilarity));
    }

    let overlap = keyword_overlap(needle, &unit_context);
    if overlap >= KEYWORD_OVERLAP_FLOOR {
        return Some((overlap * KEYWORD_OVERLAP_WEIGHT, MatchStrategy::KeywordOverlap));
    }

    None
}

/// Fraction of annotation keywords found among the context words
fn keyword_overlap(needle: &str, context: &str) -> f64 {
    let keywords: Vec<&str> = needle
        .split_whitespace()
        .filter(|w| w.chars().count() > KEYWORD_MIN_WORD_CHARS)
        .collect();
    if keywords.is_empty() {
        return 0.0;
    }

    let context_words: HashSet<&str> = context.split_whitespace().collect();
    let found = keywords
        .iter()
        .filter(|w| context_words.contains(*w))
        .count();
    found as f64 / keywords.len() as f64
}
