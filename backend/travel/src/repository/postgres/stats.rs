use sqlx::PgPool;

use crate::domain::review::Rating;
use crate::domain::stats::{CityDestinationCount, CityReview, DestinationRating, ReviewerCount};
use crate::repository::errors::RepositoryError;
use crate::usecase::contracts::StatsRepository;

// Users without reviews still count, with zero
const TOP_REVIEWERS_QUERY: &str = r#"
    SELECT u.name AS user_name, COUNT(r.id) AS review_count
    FROM users u
    LEFT JOIN reviews r ON r.user_id = u.id
    GROUP BY u.id, u.name
    ORDER BY review_count DESC, u.name
    LIMIT $1
"#;

const CITY_REVIEWS_QUERY: &str = r#"
    SELECT c.name AS city_name, r.rating
    FROM destinations d
    JOIN cities c ON c.id = d.city_id
    LEFT JOIN reviews r ON r.destination_id = d.id
    ORDER BY c.name
"#;

#[derive(sqlx::FromRow)]
struct CityReviewRow {
    city_name: String,
    rating: Option<i16>,
}

pub struct PostgresStatsRepository {
    pool: PgPool,
}

impl PostgresStatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl StatsRepository for PostgresStatsRepository {
    #[tracing::instrument(skip(self))]
    async fn destinations_per_city(&self) -> Result<Vec<CityDestinationCount>, RepositoryError> {
        let counts = sqlx::query_as::<_, CityDestinationCount>(
            r#"
            SELECT c.name AS city_name, COUNT(d.id) AS count
            FROM cities c
            LEFT JOIN destinations d ON d.city_id = c.id
            GROUP BY c.id, c.name
            ORDER BY count DESC, c.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(counts)
    }

    #[tracing::instrument(skip(self))]
    async fn top_reviewers(&self, limit: i64) -> Result<Vec<ReviewerCount>, RepositoryError> {
        let reviewers = sqlx::query_as::<_, ReviewerCount>(TOP_REVIEWERS_QUERY)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(reviewers)
    }

    #[tracing::instrument(skip(self))]
    async fn city_reviews(&self) -> Result<Vec<CityReview>, RepositoryError> {
        let rows = sqlx::query_as::<_, CityReviewRow>(CITY_REVIEWS_QUERY)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                let rating = row
                    .rating
                    .map(Rating::new)
                    .transpose()
                    .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
                Ok(CityReview {
                    city_name: row.city_name,
                    rating,
                })
            })
            .collect()
    }

    #[tracing::instrument(skip(self))]
    async fn destination_ratings(&self) -> Result<Vec<DestinationRating>, RepositoryError> {
        let ratings = sqlx::query_as::<_, DestinationRating>(
            r#"
            SELECT name AS destination_name, average_rating
            FROM destinations
            ORDER BY average_rating DESC NULLS LAST, name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(ratings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_reviewers_keeps_users_without_reviews() {
        let query = TOP_REVIEWERS_QUERY.to_lowercase();

        assert!(query.contains("left join reviews"));
        assert!(query.contains("count(r.id)"));
    }

    #[test]
    fn test_city_reviews_keep_unreviewed_destinations() {
        let query = CITY_REVIEWS_QUERY.to_lowercase();

        assert!(query.contains("left join reviews"));
        assert!(!query.contains("avg("));
    }
}
