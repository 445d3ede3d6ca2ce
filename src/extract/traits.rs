//! Extraction traits
//!
//! Seam for the external document-text provider. The host application
//! implements this over whatever reader backend it uses; the extractor
//! only pulls page text through it.

use super::types::PageText;
use crate::error::Result;

/// Source of per-page raw text
///
/// Implementations supply one raw text blob per page, in page order.
/// A failing page is not fatal to extraction: the extractor logs it and
/// continues with the remaining pages.
pub trait PageTextSource {
    /// Number of pages the source can supply
    fn page_count(&self) -> usize;

    /// Raw text for one page (0-indexed)
    fn page_text(&self, index: usize) -> Result<PageText>;
}
