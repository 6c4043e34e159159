use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::booking::{Booking, Reservation};
use crate::repository::errors::RepositoryError;
use crate::usecase::contracts::BookingRepository;
use crate::usecase::error::UsecaseError;

pub struct BookingsUseCase<B>
where
    B: BookingRepository,
{
    booking_repository: B,
}

impl<B> BookingsUseCase<B>
where
    B: BookingRepository,
{
    pub fn new(booking_repository: B) -> Self {
        Self { booking_repository }
    }

    /// Books `accommodation_id` for `duration_days` nights starting at `start_date`.
    #[tracing::instrument(skip(self), fields(user_id = %user_id, accommodation_id = %accommodation_id))]
    pub async fn make_booking(
        &self,
        user_id: Uuid,
        accommodation_id: Uuid,
        start_date: NaiveDate,
        duration_days: u32,
    ) -> Result<Booking, UsecaseError> {
        tracing::debug!(%start_date, duration_days, "making booking");

        let booking = Booking::new(user_id, accommodation_id, start_date, duration_days)?;

        let reservation = match self.booking_repository.reserve(&booking).await {
            Ok(reservation) => reservation,
            Err(RepositoryError::Conflict(_)) => Reservation::AlreadyBooked,
            Err(e) => return Err(e.into()),
        };

        match reservation {
            Reservation::Created(booking) => {
                metrics::counter!("bookings_created_total").increment(1);
                tracing::info!(booking_id = %booking.id, end_date = %booking.end_date, "booking created");
                Ok(booking)
            }
            Reservation::AlreadyBooked => {
                reject("already_booked");
                Err(UsecaseError::Conflict(
                    "You have already booked this accommodation".to_string(),
                ))
            }
            Reservation::Unavailable => {
                reject("unavailable");
                Err(UsecaseError::Conflict("Accommodation is not available".to_string()))
            }
            Reservation::AccommodationMissing => {
                reject("missing");
                Err(UsecaseError::NotFound("Accommodation".to_string()))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_bookings(&self, user_id: Uuid) -> Result<Vec<Booking>, UsecaseError> {
        Ok(self.booking_repository.find_by_user(user_id).await?)
    }

    /// Moves bookings that ended before `today` into history and frees their
    /// accommodations.
    #[tracing::instrument(skip(self), fields(today = %today))]
    pub async fn archive_expired(&self, today: NaiveDate) -> Result<u64, UsecaseError> {
        let archived = self.booking_repository.archive_expired(today).await?;

        tracing::info!(archived, "expired bookings archived");
        Ok(archived)
    }
}

fn reject(reason: &'static str) {
    tracing::info!(reason, "booking rejected");
    metrics::counter!("bookings_rejected_total", "reason" => reason).increment(1);
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::usecase::contracts::MockBookingRepository;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_make_booking_sets_end_date() {
        let mut mock_repo = MockBookingRepository::new();
        mock_repo
            .expect_reserve()
            .withf(|booking| booking.end_date == NaiveDate::from_ymd_opt(2025, 1, 2).unwrap())
            .times(1)
            .returning(|booking| Ok(Reservation::Created(booking.clone())));

        let usecase = BookingsUseCase::new(mock_repo);
        let booking = usecase
            .make_booking(Uuid::new_v4(), Uuid::new_v4(), date(2024, 12, 30), 3)
            .await
            .unwrap();

        assert!(booking.start_date < booking.end_date);
    }

    #[tokio::test]
    async fn test_zero_duration_never_reaches_store() {
        let mut mock_repo = MockBookingRepository::new();
        mock_repo.expect_reserve().never();

        let usecase = BookingsUseCase::new(mock_repo);
        let result = usecase
            .make_booking(Uuid::new_v4(), Uuid::new_v4(), date(2024, 12, 30), 0)
            .await;

        assert!(matches!(result, Err(UsecaseError::Validation(_))));
    }

    #[tokio::test]
    async fn test_rejections_map_to_errors() {
        let cases = [
            (Reservation::AlreadyBooked, "already booked"),
            (Reservation::Unavailable, "not available"),
            (Reservation::AccommodationMissing, "Accommodation not found"),
        ];

        for (reservation, message) in cases {
            let mut mock_repo = MockBookingRepository::new();
            mock_repo
                .expect_reserve()
                .times(1)
                .returning(move |_| Ok(reservation.clone()));

            let usecase = BookingsUseCase::new(mock_repo);
            let result = usecase
                .make_booking(Uuid::new_v4(), Uuid::new_v4(), date(2024, 12, 30), 2)
                .await;

            assert!(result.unwrap_err().to_string().contains(message));
        }
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_is_conflict() {
        let mut mock_repo = MockBookingRepository::new();
        mock_repo
            .expect_reserve()
            .returning(|_| Err(RepositoryError::Conflict("bookings_user_accommodation_key".to_string())));

        let usecase = BookingsUseCase::new(mock_repo);
        let result = usecase
            .make_booking(Uuid::new_v4(), Uuid::new_v4(), date(2024, 12, 30), 2)
            .await;

        assert!(matches!(result, Err(UsecaseError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_archive_expired() {
        let mut mock_repo = MockBookingRepository::new();
        let today = date(2025, 1, 10);
        mock_repo
            .expect_archive_expired()
            .with(eq(today))
            .times(1)
            .returning(|_| Ok(4));

        let usecase = BookingsUseCase::new(mock_repo);

        assert_eq!(usecase.archive_expired(today).await.unwrap(), 4);
    }
}
