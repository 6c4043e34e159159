//! Average rating aggregation for destinations, accommodations and activities.
//!
//! The cached `average_rating` of a rated entity is always the arithmetic mean
//! of every rating currently attached to it. It is recomputed from a full scan
//! of the entity's reviews each time a review touching it changes.

use serde::Serialize;

use crate::domain::review::{Rating, Review, ReviewTarget};

/// Mean of the ratings that carry a value, `None` when there is none.
pub fn average_rating<I>(ratings: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<Rating>>,
{
    let (sum, count) = ratings
        .into_iter()
        .flatten()
        .fold((0i64, 0u32), |(sum, count), rating| {
            (sum + i64::from(rating.value()), count + 1)
        });

    (count > 0).then(|| sum as f64 / f64::from(count))
}

/// Reviews written, edited or removed within one unit of work.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewChangeSet {
    pub saved: Vec<Review>,
    pub removed: Vec<Review>,
    /// Targets a review was moved away from.
    pub detached: Vec<ReviewTarget>,
}

impl ReviewChangeSet {
    pub fn saving(review: Review) -> Self {
        Self {
            saved: vec![review],
            ..Default::default()
        }
    }

    pub fn removing(review: Review) -> Self {
        Self {
            removed: vec![review],
            ..Default::default()
        }
    }

    pub fn detach(mut self, target: ReviewTarget) -> Self {
        self.detached.push(target);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty() && self.removed.is_empty() && self.detached.is_empty()
    }

    /// Every entity whose average must be recomputed, each once, in first-seen order.
    pub fn affected_targets(&self) -> Vec<ReviewTarget> {
        let mut targets: Vec<ReviewTarget> = Vec::new();
        let candidates = self
            .saved
            .iter()
            .chain(self.removed.iter())
            .map(|review| review.target)
            .chain(self.detached.iter().copied());

        for target in candidates {
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
        targets
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AverageOutcome {
    Updated { average: Option<f64>, rated_count: i64 },
    /// The review points at an entity that no longer exists.
    TargetMissing,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AverageUpdate {
    pub target: ReviewTarget,
    #[serde(flatten)]
    pub outcome: AverageOutcome,
}

impl AverageUpdate {
    pub fn updated(target: ReviewTarget, ratings: &[Option<Rating>]) -> Self {
        let rated_count = ratings.iter().flatten().count() as i64;
        Self {
            target,
            outcome: AverageOutcome::Updated {
                average: average_rating(ratings.iter().copied()),
                rated_count,
            },
        }
    }

    pub fn missing(target: ReviewTarget) -> Self {
        Self {
            target,
            outcome: AverageOutcome::TargetMissing,
        }
    }

    pub fn average(&self) -> Option<f64> {
        match self.outcome {
            AverageOutcome::Updated { average, .. } => average,
            AverageOutcome::TargetMissing => None,
        }
    }
}
