//! Text normalization for matching
//!
//! All matching strategies compare normalized text: lowercased, with
//! non-word characters stripped and whitespace collapsed. Punctuation
//! and casing differences between the stored annotation text and the
//! re-extracted page text must never defeat a match.

use std::collections::HashSet;

/// Normalize text for comparison
///
/// Lowercases, strips all non-word characters and collapses whitespace
/// runs into single spaces. The result has no leading or trailing
/// whitespace.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
        } else if ch.is_alphanumeric() || ch == '_' {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        }
        // anything else is a non-word character and is stripped
    }

    out
}

/// Jaccard similarity between the word sets of two normalized strings
pub(crate) fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let set_a: HashSet<&str> = a.split_whitespace().collect();
    let set_b: HashSet<&str> = b.split_whitespace().collect();
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    intersection as f64 / union as f64
}
