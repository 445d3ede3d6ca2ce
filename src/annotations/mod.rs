//! Annotation data model
//!
//! Raw annotation records as supplied by the host application, plus the
//! enriched form the quality scorer consumes (social counters and
//! author statistics attached by the caller).

mod types;

pub use types::{
    AnnotationType, AuthorStats, EnrichedAnnotation, RawAnnotation,
};
