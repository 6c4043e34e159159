use uuid::Uuid;

use crate::domain::destination::Destination;
use crate::domain::favorite::Favorite;
use crate::domain::visit::{PastTravels, Visit};
use crate::repository::errors::RepositoryError;
use crate::usecase::catalog::not_found;
use crate::usecase::contracts::{DestinationRepository, EngagementRepository, ReviewRepository};
use crate::usecase::error::UsecaseError;

/// Favorites and past travels of a user.
pub struct EngagementUseCase<E, D, R>
where
    E: EngagementRepository,
    D: DestinationRepository,
    R: ReviewRepository,
{
    engagement_repository: E,
    destination_repository: D,
    review_repository: R,
}

impl<E, D, R> EngagementUseCase<E, D, R>
where
    E: EngagementRepository,
    D: DestinationRepository,
    R: ReviewRepository,
{
    pub fn new(engagement_repository: E, destination_repository: D, review_repository: R) -> Self {
        Self {
            engagement_repository,
            destination_repository,
            review_repository,
        }
    }

    async fn ensure_destination(&self, destination_id: Uuid) -> Result<(), UsecaseError> {
        self.destination_repository
            .find_by_id(destination_id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Destination".to_string()))?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, destination_id = %destination_id))]
    pub async fn add_favorite(&self, user_id: Uuid, destination_id: Uuid) -> Result<Favorite, UsecaseError> {
        tracing::debug!("adding favorite");

        self.ensure_destination(destination_id).await?;

        if self
            .engagement_repository
            .is_favorite(user_id, destination_id)
            .await?
        {
            return Err(UsecaseError::Conflict("Destination is already a favorite".to_string()));
        }

        let favorite = Favorite::new(user_id, destination_id);
        self.engagement_repository
            .add_favorite(&favorite)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    UsecaseError::Conflict("Destination is already a favorite".to_string())
                }
                other => other.into(),
            })?;

        tracing::info!(user_id = %user_id, destination_id = %destination_id, "favorite added");
        Ok(favorite)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, destination_id = %destination_id))]
    pub async fn remove_favorite(&self, user_id: Uuid, destination_id: Uuid) -> Result<(), UsecaseError> {
        self.engagement_repository
            .remove_favorite(user_id, destination_id)
            .await
            .map_err(not_found("Favorite"))?;

        tracing::info!(user_id = %user_id, destination_id = %destination_id, "favorite removed");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<Destination>, UsecaseError> {
        let favorites = self.engagement_repository.favorite_destinations(user_id).await?;

        tracing::debug!(count = favorites.len(), "favorites listed");
        Ok(favorites)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, destination_id = %destination_id))]
    pub async fn mark_visited(&self, user_id: Uuid, destination_id: Uuid) -> Result<Visit, UsecaseError> {
        self.ensure_destination(destination_id).await?;

        if self
            .engagement_repository
            .has_visited(user_id, destination_id)
            .await?
        {
            return Err(UsecaseError::Conflict("Destination already marked as visited".to_string()));
        }

        let visit = Visit::new(user_id, destination_id);
        self.engagement_repository
            .add_visit(&visit)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    UsecaseError::Conflict("Destination already marked as visited".to_string())
                }
                other => other.into(),
            })?;

        tracing::info!(user_id = %user_id, destination_id = %destination_id, "visit recorded");
        Ok(visit)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn past_travels(&self, user_id: Uuid) -> Result<PastTravels, UsecaseError> {
        let destinations = self.engagement_repository.visited_destinations(user_id).await?;
        let reviewed_destination_ids = self.review_repository.reviewed_destination_ids(user_id).await?;

        Ok(PastTravels {
            destinations,
            reviewed_destination_ids,
        })
    }
}
