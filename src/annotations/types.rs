//! Annotation types
//!
//! `RawAnnotation` is the record the host application hands to this
//! layer: the highlighted text, an optional comment, and display
//! metadata. It is read-only here. `EnrichedAnnotation` is the same
//! content after the store round-trip, carrying the social counters and
//! per-author statistics the caller fetched for scoring.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Types of annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationType {
    /// Text highlight
    Highlight,
    /// Text note with content
    Note,
    /// Underline
    Underline,
    /// Image region annotation
    Image,
    /// Bookmark (position marker)
    Bookmark,
}

/// A raw annotation as supplied by the host application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAnnotation {
    /// Unique identifier (UUID); absent for records the host has not
    /// persisted yet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The highlighted/selected text
    pub text: String,
    /// Optional user comment attached to the selection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Type of annotation
    #[serde(rename = "type")]
    pub annotation_type: AnnotationType,
    /// Highlight color (CSS color value or color name)
    pub color: String,
    /// Author display name
    pub author: String,
    /// Creation timestamp
    pub timestamp: DateTime<Utc>,
}

impl RawAnnotation {
    /// Create a new highlight annotation
    pub fn new_highlight(text: &str, color: &str, author: &str) -> Self {
        Self {
            id: Some(Uuid::new_v4().to_string()),
            text: text.to_string(),
            comment: None,
            annotation_type: AnnotationType::Highlight,
            color: color.to_string(),
            author: author.to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new note annotation
    pub fn new_note(text: &str, comment: &str, author: &str) -> Self {
        Self {
            id: Some(Uuid::new_v4().to_string()),
            text: text.to_string(),
            comment: Some(comment.to_string()),
            annotation_type: AnnotationType::Note,
            color: "yellow".to_string(),
            author: author.to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Set the id
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Set the comment
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    /// Set the color
    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    /// Set the timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Per-author aggregate statistics, fetched by the caller
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorStats {
    /// Total annotations the author has shared
    pub annotations_count: u32,
    /// Likes received across all shared annotations
    pub likes_received: u32,
    /// Comments received across all shared annotations
    pub comments_received: u32,
    /// Follower count
    pub followers_count: u32,
}

/// An annotation enriched with the social counters and author
/// statistics the quality scorer consumes
///
/// The counters come from the annotation store; `author_stats` is
/// fetched per-author by the caller (directly or through the
/// [`AuthorStatsProvider`](crate::scoring::AuthorStatsProvider) seam).
/// `author_stats: None` is a valid degraded state, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedAnnotation {
    /// Unique identifier (UUID)
    pub id: String,
    /// The highlighted/selected text
    pub text: String,
    /// Optional user comment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Type of annotation
    #[serde(rename = "type")]
    pub annotation_type: AnnotationType,
    /// Highlight color
    pub color: String,
    /// Page number the annotation was located on, if known (1-indexed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Like count from the store
    pub likes_count: u32,
    /// Comment count from the store
    pub comments_count: u32,
    /// Author id in the store
    pub author_id: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Author statistics, when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_stats: Option<AuthorStats>,
}

impl EnrichedAnnotation {
    /// Create an enriched annotation with zeroed counters
    pub fn new(id: &str, text: &str, annotation_type: AnnotationType, author_id: &str) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            comment: None,
            annotation_type,
            color: "yellow".to_string(),
            page: None,
            likes_count: 0,
            comments_count: 0,
            author_id: author_id.to_string(),
            created_at: Utc::now(),
            author_stats: None,
        }
    }

    /// Build from a raw annotation and its store identity
    pub fn from_raw(raw: &RawAnnotation, author_id: &str) -> Self {
        Self {
            id: raw
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            text: raw.text.clone(),
            comment: raw.comment.clone(),
            annotation_type: raw.annotation_type,
            color: raw.color.clone(),
            page: None,
            likes_count: 0,
            comments_count: 0,
            author_id: author_id.to_string(),
            created_at: raw.timestamp,
            author_stats: None,
        }
    }

    /// Set the comment
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    /// Set the color
    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    /// Set the page number
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the social counters
    pub fn with_social(mut self, likes_count: u32, comments_count: u32) -> Self {
        self.likes_count = likes_count;
        self.comments_count = comments_count;
        self
    }

    /// Set the author statistics
    pub fn with_author_stats(mut self, stats: AuthorStats) -> Self {
        self.author_stats = Some(stats);
        self
    }

    /// Set the creation timestamp
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}
