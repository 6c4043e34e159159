use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::destination::Destination;
use crate::domain::favorite::Favorite;
use crate::domain::visit::Visit;
use crate::repository::errors::RepositoryError;
use crate::usecase::contracts::EngagementRepository;

/// Favorites and visits of users to destinations.
pub struct PostgresEngagementRepository {
    pool: PgPool,
}

impl PostgresEngagementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl EngagementRepository for PostgresEngagementRepository {
    #[tracing::instrument(skip(self, favorite), fields(user_id = %favorite.user_id, destination_id = %favorite.destination_id))]
    async fn add_favorite(&self, favorite: &Favorite) -> Result<(), RepositoryError> {
        tracing::debug!("adding favorite");

        sqlx::query(
            r#"
            INSERT INTO favorites (user_id, destination_id, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(favorite.user_id)
        .bind(favorite.destination_id)
        .bind(favorite.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, destination_id = %destination_id))]
    async fn remove_favorite(&self, user_id: Uuid, destination_id: Uuid) -> Result<(), RepositoryError> {
        tracing::debug!("removing favorite");

        let result = sqlx::query(
            r#"
            DELETE FROM favorites
            WHERE user_id = $1 AND destination_id = $2
            "#,
        )
        .bind(user_id)
        .bind(destination_id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, destination_id = %destination_id))]
    async fn is_favorite(&self, user_id: Uuid, destination_id: Uuid) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM favorites WHERE user_id = $1 AND destination_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(destination_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(exists)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn favorite_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepositoryError> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT destination_id FROM favorites WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(ids)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn favorite_destinations(&self, user_id: Uuid) -> Result<Vec<Destination>, RepositoryError> {
        let destinations = sqlx::query_as::<_, Destination>(
            r#"
            SELECT d.id, d.name, d.description, d.city_id, d.location, d.image_path, d.average_rating
            FROM destinations d
            JOIN favorites f ON f.destination_id = d.id
            WHERE f.user_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(count = destinations.len(), "found favorite destinations");
        Ok(destinations)
    }

    #[tracing::instrument(skip(self, visit), fields(user_id = %visit.user_id, destination_id = %visit.destination_id))]
    async fn add_visit(&self, visit: &Visit) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO visits (user_id, destination_id, visited_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(visit.user_id)
        .bind(visit.destination_id)
        .bind(visit.visited_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, destination_id = %destination_id))]
    async fn has_visited(&self, user_id: Uuid, destination_id: Uuid) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM visits WHERE user_id = $1 AND destination_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(destination_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(exists)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn visited_destinations(&self, user_id: Uuid) -> Result<Vec<Destination>, RepositoryError> {
        let destinations = sqlx::query_as::<_, Destination>(
            r#"
            SELECT d.id, d.name, d.description, d.city_id, d.location, d.image_path, d.average_rating
            FROM destinations d
            JOIN visits v ON v.destination_id = d.id
            WHERE v.user_id = $1
            ORDER BY v.visited_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(destinations)
    }
}
