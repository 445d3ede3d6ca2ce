//! Marginalia
//!
//! The annotation intelligence layer of a shared-annotation reader:
//! position matching and quality scoring over in-memory data. The
//! surrounding application owns persistence, authentication and
//! presentation; this crate owns the algorithms between them.
//!
//! # Modules
//!
//! - `extract`: page text to addressable (page, paragraph, sentence) units
//! - `matching`: multi-strategy annotation position matching
//! - `scoring`: composite quality scoring, ranking and statistics
//! - `annotations`: the raw and enriched annotation records
//!
//! # Data flow
//!
//! ```text
//! raw page text ──▶ extract ──▶ TextUnit sequence
//!                                     │
//! RawAnnotation ──────────────▶ matching ──▶ MatchedAnnotation
//!                                                  │
//!                                       [store round-trip, external]
//!                                                  │
//! EnrichedAnnotation + AuthorStats ──▶ scoring ──▶ ranked annotations
//! ```

pub mod annotations;
pub mod error;
pub mod extract;
pub mod matching;
pub mod scoring;
