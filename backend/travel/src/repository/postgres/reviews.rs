use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::rating::{AverageUpdate, ReviewChangeSet};
use crate::domain::review::{Rating, Review, ReviewRow, ReviewTarget, ReviewWithAuthor};
use crate::repository::errors::RepositoryError;
use crate::usecase::contracts::ReviewRepository;

pub struct PostgresReviewRepository {
    pool: PgPool,
}

impl PostgresReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Table and review column for each rated entity kind.
fn target_columns(target: ReviewTarget) -> (&'static str, &'static str) {
    match target {
        ReviewTarget::Destination(_) => ("destinations", "destination_id"),
        ReviewTarget::Accommodation(_) => ("accommodations", "accommodation_id"),
        ReviewTarget::Activity(_) => ("activities", "activity_id"),
    }
}

#[derive(sqlx::FromRow)]
struct ReviewWithAuthorRow {
    #[sqlx(flatten)]
    review: ReviewRow,
    author_name: String,
}

fn into_review(row: ReviewRow) -> Result<Review, RepositoryError> {
    let id = row.id;
    Review::try_from(row).map_err(|e| {
        tracing::error!(review_id = %id, error = %e, "stored review is malformed");
        RepositoryError::DatabaseError(e.to_string())
    })
}

fn into_reviews_with_author(rows: Vec<ReviewWithAuthorRow>) -> Result<Vec<ReviewWithAuthor>, RepositoryError> {
    rows.into_iter()
        .map(|row| {
            Ok(ReviewWithAuthor {
                review: into_review(row.review)?,
                author_name: row.author_name,
            })
        })
        .collect()
}

async fn save_review(tx: &mut Transaction<'_, Postgres>, review: &Review) -> Result<(), RepositoryError> {
    sqlx::query(
        r#"
        INSERT INTO reviews (id, user_id, rating, comment, destination_id, accommodation_id, activity_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (id) DO UPDATE
        SET user_id = EXCLUDED.user_id,
            rating = EXCLUDED.rating,
            comment = EXCLUDED.comment,
            destination_id = EXCLUDED.destination_id,
            accommodation_id = EXCLUDED.accommodation_id,
            activity_id = EXCLUDED.activity_id
        "#,
    )
    .bind(review.id)
    .bind(review.user_id)
    .bind(review.rating.map(i16::from))
    .bind(&review.comment)
    .bind(review.target.destination_id())
    .bind(review.target.accommodation_id())
    .bind(review.target.activity_id())
    .bind(review.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Reviews written by `user_id`, locked until the transaction ends.
pub(super) async fn reviews_by_author(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> Result<Vec<Review>, RepositoryError> {
    let rows = sqlx::query_as::<_, ReviewRow>(
        r#"
        SELECT id, user_id, rating, comment, destination_id, accommodation_id, activity_id, created_at
        FROM reviews
        WHERE user_id = $1
        ORDER BY created_at
        FOR UPDATE
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut **tx)
    .await?;

    rows.into_iter().map(into_review).collect()
}

/// Full re-scan of the target's reviews. The target row is locked first so
/// concurrent recomputes of the same entity serialize.
pub(super) async fn recompute_average(
    tx: &mut Transaction<'_, Postgres>,
    target: ReviewTarget,
) -> Result<AverageUpdate, RepositoryError> {
    let (table, column) = target_columns(target);

    let exists: Option<Uuid> = sqlx::query_scalar(&format!("SELECT id FROM {table} WHERE id = $1 FOR UPDATE"))
        .bind(target.id())
        .fetch_optional(&mut **tx)
        .await?;

    if exists.is_none() {
        return Ok(AverageUpdate::missing(target));
    }

    let stored: Vec<Option<i16>> = sqlx::query_scalar(&format!("SELECT rating FROM reviews WHERE {column} = $1"))
        .bind(target.id())
        .fetch_all(&mut **tx)
        .await?;

    let ratings = stored
        .into_iter()
        .map(|value| value.map(Rating::new).transpose())
        .collect::<Result<Vec<Option<Rating>>, _>>()
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

    let update = AverageUpdate::updated(target, &ratings);

    sqlx::query(&format!("UPDATE {table} SET average_rating = $2 WHERE id = $1"))
        .bind(target.id())
        .bind(update.average())
        .execute(&mut **tx)
        .await?;

    tracing::debug!(target = %target, average = ?update.average(), "average recomputed");
    Ok(update)
}

impl ReviewRepository for PostgresReviewRepository {
    #[tracing::instrument(skip(self), fields(review_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, RepositoryError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT id, user_id, rating, comment, destination_id, accommodation_id, activity_id, created_at
            FROM reviews
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(into_review).transpose()
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, target = %target))]
    async fn find_by_user_and_target(
        &self,
        user_id: Uuid,
        target: ReviewTarget,
    ) -> Result<Option<Review>, RepositoryError> {
        let (_, column) = target_columns(target);

        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            r#"
            SELECT id, user_id, rating, comment, destination_id, accommodation_id, activity_id, created_at
            FROM reviews
            WHERE user_id = $1 AND {column} = $2
            "#
        ))
        .bind(user_id)
        .bind(target.id())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(into_review).transpose()
    }

    #[tracing::instrument(skip(self), fields(target = %target))]
    async fn find_by_target(&self, target: ReviewTarget) -> Result<Vec<ReviewWithAuthor>, RepositoryError> {
        let (_, column) = target_columns(target);

        let rows = sqlx::query_as::<_, ReviewWithAuthorRow>(&format!(
            r#"
            SELECT r.id, r.user_id, r.rating, r.comment, r.destination_id, r.accommodation_id,
                   r.activity_id, r.created_at, u.name AS author_name
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            WHERE r.{column} = $1
            ORDER BY r.created_at DESC
            "#
        ))
        .bind(target.id())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        into_reviews_with_author(rows)
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<ReviewWithAuthor>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewWithAuthorRow>(
            r#"
            SELECT r.id, r.user_id, r.rating, r.comment, r.destination_id, r.accommodation_id,
                   r.activity_id, r.created_at, u.name AS author_name
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            ORDER BY r.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        into_reviews_with_author(rows)
    }

    #[tracing::instrument(skip(self), fields(target = %target))]
    async fn target_exists(&self, target: ReviewTarget) -> Result<bool, RepositoryError> {
        let (table, _) = target_columns(target);

        let exists: bool = sqlx::query_scalar(&format!("SELECT EXISTS (SELECT 1 FROM {table} WHERE id = $1)"))
            .bind(target.id())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(exists)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn reviewed_destination_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepositoryError> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT destination_id
            FROM reviews
            WHERE user_id = $1 AND destination_id IS NOT NULL
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(ids)
    }

    #[tracing::instrument(
        skip(self, changes),
        fields(saved = changes.saved.len(), removed = changes.removed.len())
    )]
    async fn apply(&self, changes: &ReviewChangeSet) -> Result<Vec<AverageUpdate>, RepositoryError> {
        tracing::debug!("applying review changes");

        if changes.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await?;

        for review in &changes.saved {
            save_review(&mut tx, review).await?;
        }

        for review in &changes.removed {
            sqlx::query("DELETE FROM reviews WHERE id = $1")
                .bind(review.id)
                .execute(&mut *tx)
                .await?;
        }

        let mut updates = Vec::new();
        for target in changes.affected_targets() {
            updates.push(recompute_average(&mut tx, target).await?);
        }

        tx.commit().await?;

        tracing::debug!(targets = updates.len(), "review changes committed");
        Ok(updates)
    }
}
