//! Text structure extraction
//!
//! Turns a paginated document's raw text into an ordered sequence of
//! addressable units (page, paragraph index, sentence index, character
//! span, surrounding context). The unit sequence is what the position
//! matcher searches when locating a freeform annotation.
//!
//! Extraction is deterministic: the same pages always produce the same
//! unit sequence, so a matching pass can be re-run at any time.

mod extractor;
mod traits;
mod types;

pub use extractor::{extract, extract_from_source, extract_page};
pub use traits::PageTextSource;
pub use types::{PageText, TextUnit};
