//! Extraction types
//!
//! Format-agnostic types for the text structure pass.

use serde::{Deserialize, Serialize};

/// Raw text of one document page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageText {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// The page's full text
    pub text: String,
}

impl PageText {
    /// Create a page from a single text blob
    pub fn new(page_number: u32, text: &str) -> Self {
        Self {
            page_number,
            text: text.to_string(),
        }
    }

    /// Create a page by concatenating text run fragments in order
    ///
    /// Text providers often deliver a page as many small runs; they are
    /// joined with single spaces so word boundaries survive.
    pub fn from_runs<I, S>(page_number: u32, runs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let text = runs
            .into_iter()
            .map(|r| r.as_ref().trim().to_string())
            .filter(|r| !r.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self { page_number, text }
    }
}

/// One addressable span of extracted document text
///
/// Offsets are character offsets within the page text (not bytes), so
/// multi-byte text cannot split a unit mid-character. `context` is the
/// unit text plus a fixed window either side, used by the approximate
/// matching strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextUnit {
    /// Page number (1-indexed)
    pub page: u32,
    /// Paragraph index within the page (0-indexed, emitted order)
    pub paragraph_index: usize,
    /// Sentence index within the paragraph (0-indexed, emitted order)
    pub sentence_index: usize,
    /// Start character offset within the page text (inclusive)
    pub start_offset: usize,
    /// End character offset within the page text (exclusive)
    pub end_offset: usize,
    /// The unit's own text
    pub text: String,
    /// Unit text plus surrounding window, clamped to page bounds
    pub context: String,
}
