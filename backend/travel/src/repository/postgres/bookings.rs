use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::booking::{Booking, Reservation};
use crate::repository::errors::RepositoryError;
use crate::usecase::contracts::BookingRepository;

pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl BookingRepository for PostgresBookingRepository {
    #[tracing::instrument(
        skip(self, booking),
        fields(booking_id = %booking.id, user_id = %booking.user_id, accommodation_id = %booking.accommodation_id)
    )]
    async fn reserve(&self, booking: &Booking) -> Result<Reservation, RepositoryError> {
        tracing::debug!("reserving accommodation");

        let mut tx = self.pool.begin().await?;

        // row lock serializes concurrent reservations of the same accommodation
        let availability: Option<bool> = sqlx::query_scalar(
            "SELECT availability FROM accommodations WHERE id = $1 FOR UPDATE",
        )
        .bind(booking.accommodation_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(available) = availability else {
            return Ok(Reservation::AccommodationMissing);
        };

        let already_booked: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM bookings WHERE user_id = $1 AND accommodation_id = $2
            )
            "#,
        )
        .bind(booking.user_id)
        .bind(booking.accommodation_id)
        .fetch_one(&mut *tx)
        .await?;

        if already_booked {
            return Ok(Reservation::AlreadyBooked);
        }
        if !available {
            return Ok(Reservation::Unavailable);
        }

        sqlx::query(
            r#"
            INSERT INTO bookings (id, user_id, accommodation_id, start_date, end_date, booked_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(booking.id)
        .bind(booking.user_id)
        .bind(booking.accommodation_id)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.booked_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE accommodations SET availability = FALSE WHERE id = $1")
            .bind(booking.accommodation_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(booking_id = %booking.id, "booking stored");
        Ok(Reservation::Created(booking.clone()))
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, accommodation_id = %accommodation_id))]
    async fn find_by_user_and_accommodation(
        &self,
        user_id: Uuid,
        accommodation_id: Uuid,
    ) -> Result<Option<Booking>, RepositoryError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, user_id, accommodation_id, start_date, end_date, booked_at
            FROM bookings
            WHERE user_id = $1 AND accommodation_id = $2
            "#,
        )
        .bind(user_id)
        .bind(accommodation_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(booking)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>, RepositoryError> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, user_id, accommodation_id, start_date, end_date, booked_at
            FROM bookings
            WHERE user_id = $1
            ORDER BY start_date
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(bookings)
    }

    #[tracing::instrument(skip(self), fields(today = %today))]
    async fn archive_expired(&self, today: NaiveDate) -> Result<u64, RepositoryError> {
        tracing::debug!("archiving expired bookings");

        let mut tx = self.pool.begin().await?;

        let expired: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM bookings WHERE end_date < $1 FOR UPDATE",
        )
        .bind(today)
        .fetch_all(&mut *tx)
        .await?;

        if expired.is_empty() {
            return Ok(0);
        }

        sqlx::query(
            r#"
            INSERT INTO bookings_history (id, user_id, accommodation_id, start_date, end_date, booked_at)
            SELECT id, user_id, accommodation_id, start_date, end_date, booked_at
            FROM bookings
            WHERE id = ANY($1)
            "#,
        )
        .bind(&expired)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE accommodations
            SET availability = TRUE
            WHERE id IN (SELECT accommodation_id FROM bookings WHERE id = ANY($1))
            "#,
        )
        .bind(&expired)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM bookings WHERE id = ANY($1)")
            .bind(&expired)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(archived = result.rows_affected(), "expired bookings archived");
        Ok(result.rows_affected())
    }
}
