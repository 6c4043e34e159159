use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::preference::Preference;
use crate::domain::rating::{AverageUpdate, ReviewChangeSet};
use crate::domain::user::User;
use crate::repository::errors::RepositoryError;
use super::reviews::{recompute_average, reviews_by_author};
use crate::usecase::contracts::{PreferenceRepository, UserRepository};

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PostgresUserRepository {
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        tracing::debug!("creating user");

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, is_admin, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(user_id = %user.id, "user created successfully");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(user_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, is_admin, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(user)
    }

    #[tracing::instrument(skip(self, email))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        tracing::debug!("finding user by email");

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, is_admin, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(user)
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, is_admin, created_at, updated_at
            FROM users
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(count = users.len(), "found users");
        Ok(users)
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: &User) -> Result<(), RepositoryError> {
        tracing::debug!("updating user");

        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, email = $3, password_hash = $4, is_admin = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Removes the user together with their reviews, and recomputes the
    /// averages of everything those reviews rated.
    #[tracing::instrument(skip(self), fields(user_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<Vec<AverageUpdate>, RepositoryError> {
        tracing::debug!("deleting user");

        let mut tx = self.pool.begin().await?;

        let removed = reviews_by_author(&mut tx, id).await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        // reviews went with the user through the cascade
        let changes = ReviewChangeSet {
            removed,
            ..ReviewChangeSet::default()
        };
        let mut updates = Vec::new();
        for target in changes.affected_targets() {
            updates.push(recompute_average(&mut tx, target).await?);
        }

        tx.commit().await?;

        tracing::debug!(user_id = %id, targets = updates.len(), "user deleted successfully");
        Ok(updates)
    }
}

pub struct PostgresPreferenceRepository {
    pool: PgPool,
}

impl PostgresPreferenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PreferenceRepository for PostgresPreferenceRepository {
    #[tracing::instrument(skip(self, preference), fields(preference_id = %preference.id))]
    async fn create(&self, preference: &Preference) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO preferences (id, content) VALUES ($1, $2)")
            .bind(preference.id)
            .bind(&preference.content)
            .execute(&self.pool)
            .await?;

        tracing::debug!(content = %preference.content, "preference created");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(preference_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Preference>, RepositoryError> {
        let preference = sqlx::query_as::<_, Preference>(
            "SELECT id, content FROM preferences WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(preference)
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Preference>, RepositoryError> {
        let preferences = sqlx::query_as::<_, Preference>(
            "SELECT id, content FROM preferences ORDER BY content",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(preferences)
    }

    #[tracing::instrument(skip(self, preference), fields(preference_id = %preference.id))]
    async fn update(&self, preference: &Preference) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE preferences SET content = $2 WHERE id = $1")
            .bind(preference.id)
            .bind(&preference.content)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(preference_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM preferences WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Preference>, RepositoryError> {
        let preferences = sqlx::query_as::<_, Preference>(
            r#"
            SELECT p.id, p.content
            FROM preferences p
            JOIN user_preferences up ON up.preference_id = p.id
            WHERE up.user_id = $1
            ORDER BY p.content
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(count = preferences.len(), "found user preferences");
        Ok(preferences)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, preference_id = %preference_id))]
    async fn add_to_user(&self, user_id: Uuid, preference_id: Uuid) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO user_preferences (user_id, preference_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(preference_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, preference_id = %preference_id))]
    async fn remove_from_user(&self, user_id: Uuid, preference_id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM user_preferences WHERE user_id = $1 AND preference_id = $2",
        )
        .bind(user_id)
        .bind(preference_id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
