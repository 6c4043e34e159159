use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq)]
pub enum BookingError {
    #[error("Duration must be at least one day")]
    InvalidDuration,
    #[error("Booking dates are out of range")]
    DateOutOfRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub accommodation_id: Uuid,
    pub start_date: NaiveDate,
    /// Check-out day, always after `start_date`.
    pub end_date: NaiveDate,
    pub booked_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        user_id: Uuid,
        accommodation_id: Uuid,
        start_date: NaiveDate,
        duration_days: u32,
    ) -> Result<Self, BookingError> {
        if duration_days == 0 {
            return Err(BookingError::InvalidDuration);
        }
        let end_date = start_date
            .checked_add_days(Days::new(u64::from(duration_days)))
            .ok_or(BookingError::DateOutOfRange)?;

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            accommodation_id,
            start_date,
            end_date,
            booked_at: Utc::now(),
        })
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.end_date < today
    }
}

/// Result of the atomic check-then-insert performed by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Reservation {
    Created(Booking),
    AlreadyBooked,
    Unavailable,
    AccommodationMissing,
}
