use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const MAX_COMMENT_CHARS: usize = 1000;
pub const MAX_RATING: i16 = 5;

#[derive(Debug, Error, PartialEq)]
pub enum ReviewError {
    #[error("Invalid rating (must be between 0 and 5)")]
    RatingOutOfRange,
    #[error("Comment cannot exceed 1000 characters")]
    CommentTooLong,
    #[error("A review must be associated with exactly one destination, accommodation or activity")]
    InvalidTarget,
    #[error("Unknown review target type: {0}")]
    UnknownTargetKind(String),
}

/// Star rating in `0..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct Rating(i16);

impl Rating {
    pub fn new(value: i16) -> Result<Self, ReviewError> {
        if !(0..=MAX_RATING).contains(&value) {
            return Err(ReviewError::RatingOutOfRange);
        }
        Ok(Self(value))
    }

    pub fn value(self) -> i16 {
        self.0
    }
}

impl TryFrom<i16> for Rating {
    type Error = ReviewError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for i16 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// The single entity a review is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ReviewTarget {
    Destination(Uuid),
    Accommodation(Uuid),
    Activity(Uuid),
}

impl ReviewTarget {
    /// Builds a target from a form-style `(entity type, id)` pair.
    pub fn from_kind(kind: &str, id: Uuid) -> Result<Self, ReviewError> {
        match kind.to_ascii_lowercase().as_str() {
            "destination" => Ok(Self::Destination(id)),
            "accommodation" => Ok(Self::Accommodation(id)),
            "activity" => Ok(Self::Activity(id)),
            _ => Err(ReviewError::UnknownTargetKind(kind.to_string())),
        }
    }

    /// Rebuilds a target from the three nullable foreign keys of a stored row.
    pub fn from_columns(
        destination_id: Option<Uuid>,
        accommodation_id: Option<Uuid>,
        activity_id: Option<Uuid>,
    ) -> Result<Self, ReviewError> {
        match (destination_id, accommodation_id, activity_id) {
            (Some(id), None, None) => Ok(Self::Destination(id)),
            (None, Some(id), None) => Ok(Self::Accommodation(id)),
            (None, None, Some(id)) => Ok(Self::Activity(id)),
            _ => Err(ReviewError::InvalidTarget),
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Self::Destination(id) | Self::Accommodation(id) | Self::Activity(id) => *id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Destination(_) => "destination",
            Self::Accommodation(_) => "accommodation",
            Self::Activity(_) => "activity",
        }
    }

    pub fn destination_id(&self) -> Option<Uuid> {
        match self {
            Self::Destination(id) => Some(*id),
            _ => None,
        }
    }

    pub fn accommodation_id(&self) -> Option<Uuid> {
        match self {
            Self::Accommodation(id) => Some(*id),
            _ => None,
        }
    }

    pub fn activity_id(&self) -> Option<Uuid> {
        match self {
            Self::Activity(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for ReviewTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub target: ReviewTarget,
    pub rating: Option<Rating>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(
        user_id: Uuid,
        target: ReviewTarget,
        rating: Option<Rating>,
        comment: Option<String>,
    ) -> Result<Self, ReviewError> {
        let comment = normalize_comment(comment)?;
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            target,
            rating,
            comment,
            created_at: Utc::now(),
        })
    }

    /// Applies an administrative edit. Returns the previous target when it changed.
    pub fn edit(
        &mut self,
        user_id: Uuid,
        target: ReviewTarget,
        rating: Option<Rating>,
        comment: Option<String>,
    ) -> Result<Option<ReviewTarget>, ReviewError> {
        self.comment = normalize_comment(comment)?;
        self.user_id = user_id;
        self.rating = rating;

        let previous = self.target;
        self.target = target;
        Ok((previous != target).then_some(previous))
    }
}

fn normalize_comment(comment: Option<String>) -> Result<Option<String>, ReviewError> {
    match comment {
        Some(text) if text.chars().count() > MAX_COMMENT_CHARS => Err(ReviewError::CommentTooLong),
        Some(text) if text.trim().is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Storage shape of a review: one nullable foreign key per target kind.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub rating: Option<i16>,
    pub comment: Option<String>,
    pub destination_id: Option<Uuid>,
    pub accommodation_id: Option<Uuid>,
    pub activity_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = ReviewError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let target =
            ReviewTarget::from_columns(row.destination_id, row.accommodation_id, row.activity_id)?;
        let rating = row.rating.map(Rating::new).transpose()?;
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            target,
            rating,
            comment: row.comment,
            created_at: row.created_at,
        })
    }
}

/// A review joined with its author's display name.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewWithAuthor {
    #[serde(flatten)]
    pub review: Review,
    pub author_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(Rating::new(0).is_ok());
        assert!(Rating::new(5).is_ok());
        assert_eq!(Rating::new(6), Err(ReviewError::RatingOutOfRange));
        assert_eq!(Rating::new(-1), Err(ReviewError::RatingOutOfRange));
    }

    #[test]
    fn test_target_from_columns_requires_exactly_one() {
        let id = Uuid::new_v4();

        assert_eq!(
            ReviewTarget::from_columns(Some(id), None, None),
            Ok(ReviewTarget::Destination(id))
        );
        assert_eq!(
            ReviewTarget::from_columns(None, None, Some(id)),
            Ok(ReviewTarget::Activity(id))
        );
        assert_eq!(
            ReviewTarget::from_columns(None, None, None),
            Err(ReviewError::InvalidTarget)
        );
        assert_eq!(
            ReviewTarget::from_columns(Some(id), Some(Uuid::new_v4()), None),
            Err(ReviewError::InvalidTarget)
        );
    }

    #[test]
    fn test_target_from_kind() {
        let id = Uuid::new_v4();

        assert_eq!(
            ReviewTarget::from_kind("Accommodation", id),
            Ok(ReviewTarget::Accommodation(id))
        );
        assert!(matches!(
            ReviewTarget::from_kind("city", id),
            Err(ReviewError::UnknownTargetKind(_))
        ));
    }

    #[test]
    fn test_review_rejects_long_comment() {
        let result = Review::new(
            Uuid::new_v4(),
            ReviewTarget::Destination(Uuid::new_v4()),
            Rating::new(4).ok(),
            Some("x".repeat(MAX_COMMENT_CHARS + 1)),
        );

        assert_eq!(result.unwrap_err(), ReviewError::CommentTooLong);
    }

    #[test]
    fn test_review_blank_comment_is_dropped() {
        let review = Review::new(
            Uuid::new_v4(),
            ReviewTarget::Activity(Uuid::new_v4()),
            None,
            Some("   ".to_string()),
        )
        .unwrap();

        assert!(review.comment.is_none());
    }

    #[test]
    fn test_review_edit_reports_previous_target() {
        let old_target = ReviewTarget::Destination(Uuid::new_v4());
        let new_target = ReviewTarget::Accommodation(Uuid::new_v4());
        let mut review = Review::new(Uuid::new_v4(), old_target, None, None).unwrap();
        let user_id = review.user_id;

        let previous = review
            .edit(user_id, new_target, Rating::new(3).ok(), None)
            .unwrap();
        assert_eq!(previous, Some(old_target));
        assert_eq!(review.target, new_target);

        let previous = review
            .edit(user_id, new_target, Rating::new(2).ok(), None)
            .unwrap();
        assert_eq!(previous, None);
    }

    #[test]
    fn test_row_with_two_targets_is_rejected() {
        let row = ReviewRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            rating: Some(4),
            comment: None,
            destination_id: Some(Uuid::new_v4()),
            accommodation_id: None,
            activity_id: Some(Uuid::new_v4()),
            created_at: Utc::now(),
        };

        assert_eq!(Review::try_from(row).unwrap_err(), ReviewError::InvalidTarget);
    }
}
