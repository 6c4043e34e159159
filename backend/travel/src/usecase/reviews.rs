use uuid::Uuid;

use crate::domain::rating::{AverageOutcome, AverageUpdate, ReviewChangeSet};
use crate::domain::review::{Rating, Review, ReviewTarget, ReviewWithAuthor};
use crate::repository::errors::RepositoryError;
use crate::usecase::contracts::ReviewRepository;
use crate::usecase::error::UsecaseError;

/// Outcome of a user submitting a review.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewSubmission {
    Recorded {
        review: Review,
        average: Option<f64>,
    },
    AlreadyReviewed,
}

pub struct ReviewsUseCase<R>
where
    R: ReviewRepository,
{
    review_repository: R,
}

impl<R> ReviewsUseCase<R>
where
    R: ReviewRepository,
{
    pub fn new(review_repository: R) -> Self {
        Self { review_repository }
    }

    /// Stores a new review for `target` and returns the target's fresh average.
    /// A user gets one review per target; a second attempt is reported, not stored.
    #[tracing::instrument(skip(self, comment), fields(user_id = %author, target = %target, rating = ?rating))]
    pub async fn record_review(
        &self,
        author: Uuid,
        target: ReviewTarget,
        rating: Option<Rating>,
        comment: Option<String>,
    ) -> Result<ReviewSubmission, UsecaseError> {
        tracing::debug!("recording review");

        self.ensure_target_exists(target).await?;

        if self
            .review_repository
            .find_by_user_and_target(author, target)
            .await?
            .is_some()
        {
            tracing::info!(user_id = %author, target = %target, "duplicate review rejected");
            metrics::counter!("review_duplicates_total", "kind" => target.kind()).increment(1);
            return Ok(ReviewSubmission::AlreadyReviewed);
        }

        let review = Review::new(author, target, rating, comment)?;
        let updates = match self
            .review_repository
            .apply(&ReviewChangeSet::saving(review.clone()))
            .await
        {
            Ok(updates) => updates,
            // lost a race against the same user's concurrent submission
            Err(RepositoryError::Conflict(_)) => {
                metrics::counter!("review_duplicates_total", "kind" => target.kind()).increment(1);
                return Ok(ReviewSubmission::AlreadyReviewed);
            }
            Err(e) => return Err(e.into()),
        };
        report_missing_targets(&updates);

        let average = average_for(&updates, target);
        metrics::counter!("reviews_recorded_total", "kind" => target.kind()).increment(1);
        tracing::info!(review_id = %review.id, target = %target, ?average, "review recorded");
        Ok(ReviewSubmission::Recorded { review, average })
    }

    #[tracing::instrument(skip(self, comment), fields(user_id = %user_id, target = %target))]
    pub async fn create_review(
        &self,
        user_id: Uuid,
        target: ReviewTarget,
        rating: Option<Rating>,
        comment: Option<String>,
    ) -> Result<(Review, Vec<AverageUpdate>), UsecaseError> {
        tracing::debug!("creating review");

        self.ensure_target_exists(target).await?;

        let review = Review::new(user_id, target, rating, comment)?;
        let updates = self
            .review_repository
            .apply(&ReviewChangeSet::saving(review.clone()))
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    UsecaseError::Conflict("This user has already reviewed this entity.".to_string())
                }
                other => other.into(),
            })?;
        report_missing_targets(&updates);

        tracing::info!(review_id = %review.id, "review created");
        Ok((review, updates))
    }

    /// Edits a review. When the review moves to another entity, both the old and
    /// the new entity get their averages recomputed.
    #[tracing::instrument(skip(self, comment), fields(review_id = %id, target = %target))]
    pub async fn update_review(
        &self,
        id: Uuid,
        user_id: Uuid,
        target: ReviewTarget,
        rating: Option<Rating>,
        comment: Option<String>,
    ) -> Result<(Review, Vec<AverageUpdate>), UsecaseError> {
        tracing::debug!("updating review");

        let mut review = self
            .review_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Review".to_string()))?;

        self.ensure_target_exists(target).await?;

        let previous = review.edit(user_id, target, rating, comment)?;
        let mut changes = ReviewChangeSet::saving(review.clone());
        if let Some(previous) = previous {
            tracing::debug!(previous = %previous, "review moved to another target");
            changes = changes.detach(previous);
        }

        let updates = self.review_repository.apply(&changes).await?;
        report_missing_targets(&updates);

        tracing::info!(review_id = %id, "review updated");
        Ok((review, updates))
    }

    #[tracing::instrument(skip(self), fields(review_id = %id))]
    pub async fn delete_review(&self, id: Uuid) -> Result<Vec<AverageUpdate>, UsecaseError> {
        tracing::debug!("deleting review");

        let review = self
            .review_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Review".to_string()))?;

        let updates = self
            .review_repository
            .apply(&ReviewChangeSet::removing(review))
            .await?;
        report_missing_targets(&updates);

        tracing::info!(review_id = %id, "review deleted");
        Ok(updates)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_reviews(&self) -> Result<Vec<ReviewWithAuthor>, UsecaseError> {
        let reviews = self.review_repository.find_all().await?;

        tracing::debug!(count = reviews.len(), "retrieved reviews");
        Ok(reviews)
    }

    #[tracing::instrument(skip(self), fields(review_id = %id))]
    pub async fn get_review(&self, id: Uuid) -> Result<Review, UsecaseError> {
        self.review_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Review".to_string()))
    }

    async fn ensure_target_exists(&self, target: ReviewTarget) -> Result<(), UsecaseError> {
        if !self.review_repository.target_exists(target).await? {
            tracing::warn!(target = %target, "review target does not exist");
            return Err(UsecaseError::NotFound(capitalize(target.kind())));
        }
        Ok(())
    }
}

fn average_for(updates: &[AverageUpdate], target: ReviewTarget) -> Option<f64> {
    updates
        .iter()
        .find(|update| update.target == target)
        .and_then(AverageUpdate::average)
}

/// A review pointing at a vanished entity is a data integrity problem.
pub(crate) fn report_missing_targets(updates: &[AverageUpdate]) {
    for update in updates {
        if update.outcome == AverageOutcome::TargetMissing {
            tracing::warn!(target = %update.target, "rated entity missing while recomputing its average");
            metrics::counter!("review_average_target_missing_total", "kind" => update.target.kind())
                .increment(1);
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::usecase::contracts::MockReviewRepository;

    fn rating(value: i16) -> Option<Rating> {
        Some(Rating::new(value).unwrap())
    }

    #[tokio::test]
    async fn test_record_review_returns_recomputed_average() {
        let mut repo = MockReviewRepository::new();
        let user_id = Uuid::new_v4();
        let target = ReviewTarget::Destination(Uuid::new_v4());

        repo.expect_target_exists()
            .with(eq(target))
            .times(1)
            .returning(|_| Ok(true));
        repo.expect_find_by_user_and_target()
            .with(eq(user_id), eq(target))
            .times(1)
            .returning(|_, _| Ok(None));
        repo.expect_apply()
            .withf(move |changes| {
                changes.saved.len() == 1
                    && changes.saved[0].target == target
                    && changes.removed.is_empty()
                    && changes.detached.is_empty()
            })
            .times(1)
            .returning(|changes| {
                // existing 3 and 5, plus the new 4
                let mut stored = vec![rating(3), rating(5)];
                stored.push(changes.saved[0].rating);
                Ok(vec![AverageUpdate::updated(changes.saved[0].target, &stored)])
            });

        let usecase = ReviewsUseCase::new(repo);
        let result = usecase
            .record_review(user_id, target, rating(4), Some("Lovely".to_string()))
            .await
            .unwrap();

        match result {
            ReviewSubmission::Recorded { review, average } => {
                assert_eq!(review.user_id, user_id);
                assert_eq!(review.target, target);
                assert_eq!(average, Some(4.0));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_second_review_is_rejected_without_insert() {
        let mut repo = MockReviewRepository::new();
        let user_id = Uuid::new_v4();
        let target = ReviewTarget::Destination(Uuid::new_v4());

        repo.expect_target_exists().returning(|_| Ok(true));
        repo.expect_find_by_user_and_target()
            .with(eq(user_id), eq(target))
            .times(1)
            .returning(move |u, t| Ok(Some(Review::new(u, t, rating(5), None).unwrap())));
        repo.expect_apply().never();

        let usecase = ReviewsUseCase::new(repo);
        let result = usecase.record_review(user_id, target, rating(2), None).await;

        assert_eq!(result.unwrap(), ReviewSubmission::AlreadyReviewed);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_reported_as_already_reviewed() {
        let mut repo = MockReviewRepository::new();

        repo.expect_target_exists().returning(|_| Ok(true));
        repo.expect_find_by_user_and_target().returning(|_, _| Ok(None));
        repo.expect_apply()
            .times(1)
            .returning(|_| Err(RepositoryError::Conflict("reviews_user_destination_key".to_string())));

        let usecase = ReviewsUseCase::new(repo);
        let result = usecase
            .record_review(
                Uuid::new_v4(),
                ReviewTarget::Destination(Uuid::new_v4()),
                rating(3),
                None,
            )
            .await;

        assert_eq!(result.unwrap(), ReviewSubmission::AlreadyReviewed);
    }

    #[tokio::test]
    async fn test_record_review_unknown_target() {
        let mut repo = MockReviewRepository::new();
        let target = ReviewTarget::Accommodation(Uuid::new_v4());

        repo.expect_target_exists()
            .with(eq(target))
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_apply().never();

        let usecase = ReviewsUseCase::new(repo);
        let result = usecase
            .record_review(Uuid::new_v4(), target, rating(3), None)
            .await;

        match result {
            Err(UsecaseError::NotFound(what)) => assert_eq!(what, "Accommodation"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_record_review_with_missing_target_during_recompute_still_succeeds() {
        let mut repo = MockReviewRepository::new();
        let target = ReviewTarget::Activity(Uuid::new_v4());

        repo.expect_target_exists().returning(|_| Ok(true));
        repo.expect_find_by_user_and_target().returning(|_, _| Ok(None));
        repo.expect_apply()
            .returning(|changes| Ok(vec![AverageUpdate::missing(changes.saved[0].target)]));

        let usecase = ReviewsUseCase::new(repo);
        let result = usecase
            .record_review(Uuid::new_v4(), target, rating(1), None)
            .await
            .unwrap();

        assert!(matches!(result, ReviewSubmission::Recorded { average: None, .. }));
    }

    #[tokio::test]
    async fn test_update_review_moving_target_recomputes_both() {
        let mut repo = MockReviewRepository::new();
        let old_target = ReviewTarget::Destination(Uuid::new_v4());
        let new_target = ReviewTarget::Accommodation(Uuid::new_v4());
        let existing = Review::new(Uuid::new_v4(), old_target, rating(2), None).unwrap();
        let review_id = existing.id;
        let user_id = existing.user_id;

        repo.expect_find_by_id()
            .with(eq(review_id))
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_target_exists()
            .with(eq(new_target))
            .returning(|_| Ok(true));
        repo.expect_apply()
            .withf(move |changes| {
                changes.affected_targets() == vec![new_target, old_target]
            })
            .times(1)
            .returning(|changes| {
                Ok(changes
                    .affected_targets()
                    .into_iter()
                    .map(|t| AverageUpdate::updated(t, &[]))
                    .collect())
            });

        let usecase = ReviewsUseCase::new(repo);
        let (review, updates) = usecase
            .update_review(review_id, user_id, new_target, rating(5), None)
            .await
            .unwrap();

        assert_eq!(review.target, new_target);
        assert_eq!(updates.len(), 2);
    }

    #[tokio::test]
    async fn test_update_review_not_found() {
        let mut repo = MockReviewRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let usecase = ReviewsUseCase::new(repo);
        let result = usecase
            .update_review(
                Uuid::new_v4(),
                Uuid::new_v4(),
                ReviewTarget::Destination(Uuid::new_v4()),
                None,
                None,
            )
            .await;

        assert!(matches!(result, Err(UsecaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_review_recomputes_its_target() {
        let mut repo = MockReviewRepository::new();
        let target = ReviewTarget::Destination(Uuid::new_v4());
        let existing = Review::new(Uuid::new_v4(), target, rating(1), None).unwrap();
        let review_id = existing.id;

        repo.expect_find_by_id()
            .with(eq(review_id))
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_apply()
            .withf(move |changes| changes.saved.is_empty() && changes.removed.len() == 1)
            .times(1)
            .returning(move |_| Ok(vec![AverageUpdate::updated(target, &[])]));

        let usecase = ReviewsUseCase::new(repo);
        let updates = usecase.delete_review(review_id).await.unwrap();

        assert_eq!(updates[0].target, target);
        assert_eq!(updates[0].average(), None);
    }

    #[tokio::test]
    async fn test_create_review_duplicate_is_conflict() {
        let mut repo = MockReviewRepository::new();

        repo.expect_target_exists().returning(|_| Ok(true));
        repo.expect_apply()
            .returning(|_| Err(RepositoryError::Conflict("reviews_user_activity_key".to_string())));

        let usecase = ReviewsUseCase::new(repo);
        let result = usecase
            .create_review(
                Uuid::new_v4(),
                ReviewTarget::Activity(Uuid::new_v4()),
                rating(4),
                None,
            )
            .await;

        assert!(matches!(result, Err(UsecaseError::Conflict(_))));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("destination"), "Destination");
        assert_eq!(capitalize(""), "");
    }
}
