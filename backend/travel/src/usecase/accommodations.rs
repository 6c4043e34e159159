use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::accommodation::{Accommodation, AccommodationDetails};
use crate::domain::review::ReviewTarget;
use crate::usecase::catalog::not_found;
use crate::usecase::contracts::{
    AccommodationRepository, BookingRepository, CityRepository, ReviewRepository,
};
use crate::usecase::error::UsecaseError;

#[derive(Debug, Clone)]
pub struct AccommodationInput {
    pub name: String,
    pub kind: String,
    pub location: String,
    pub price: f64,
    pub city_id: Uuid,
    pub image_path: Option<String>,
    pub amenity_ids: Vec<Uuid>,
}

pub struct AccommodationsUseCase<A, C, R, B>
where
    A: AccommodationRepository,
    C: CityRepository,
    R: ReviewRepository,
    B: BookingRepository,
{
    accommodation_repository: A,
    city_repository: C,
    review_repository: R,
    booking_repository: B,
}

impl<A, C, R, B> AccommodationsUseCase<A, C, R, B>
where
    A: AccommodationRepository,
    C: CityRepository,
    R: ReviewRepository,
    B: BookingRepository,
{
    pub fn new(
        accommodation_repository: A,
        city_repository: C,
        review_repository: R,
        booking_repository: B,
    ) -> Self {
        Self {
            accommodation_repository,
            city_repository,
            review_repository,
            booking_repository,
        }
    }

    async fn ensure_city(&self, city_id: Uuid) -> Result<(), UsecaseError> {
        self.city_repository
            .find_by_id(city_id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("City".to_string()))?;
        Ok(())
    }

    #[tracing::instrument(skip(self, input), fields(name = %input.name, city_id = %input.city_id))]
    pub async fn create_accommodation(
        &self,
        input: AccommodationInput,
    ) -> Result<Accommodation, UsecaseError> {
        self.ensure_city(input.city_id).await?;

        let accommodation = Accommodation::new(
            input.name,
            input.kind,
            input.location,
            input.price,
            input.city_id,
            input.image_path.unwrap_or_default(),
        );
        self.accommodation_repository
            .create(&accommodation, &input.amenity_ids)
            .await?;

        tracing::info!(accommodation_id = %accommodation.id, "accommodation created");
        Ok(accommodation)
    }

    #[tracing::instrument(skip(self), fields(accommodation_id = %id))]
    pub async fn get_accommodation(&self, id: Uuid) -> Result<Accommodation, UsecaseError> {
        self.accommodation_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Accommodation".to_string()))
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_accommodations(&self) -> Result<Vec<Accommodation>, UsecaseError> {
        Ok(self.accommodation_repository.find_all().await?)
    }

    #[tracing::instrument(skip(self, input), fields(accommodation_id = %id))]
    pub async fn update_accommodation(
        &self,
        id: Uuid,
        input: AccommodationInput,
    ) -> Result<Accommodation, UsecaseError> {
        let mut accommodation = self.get_accommodation(id).await?;
        if accommodation.city_id != input.city_id {
            self.ensure_city(input.city_id).await?;
        }

        accommodation.name = input.name;
        accommodation.kind = input.kind;
        accommodation.location = input.location;
        accommodation.price = input.price;
        accommodation.city_id = input.city_id;
        if let Some(path) = input.image_path {
            accommodation.image_path = path;
        }

        self.accommodation_repository
            .update(&accommodation, &input.amenity_ids)
            .await
            .map_err(not_found("Accommodation"))?;

        tracing::info!(accommodation_id = %id, "accommodation updated");
        Ok(accommodation)
    }

    #[tracing::instrument(skip(self), fields(accommodation_id = %id))]
    pub async fn delete_accommodation(&self, id: Uuid) -> Result<(), UsecaseError> {
        self.accommodation_repository
            .delete(id)
            .await
            .map_err(not_found("Accommodation"))?;

        tracing::info!(accommodation_id = %id, "accommodation deleted");
        Ok(())
    }

    pub async fn details(&self, user_id: Uuid, id: Uuid) -> Result<AccommodationDetails, UsecaseError> {
        self.details_on(user_id, id, Utc::now().date_naive()).await
    }

    #[tracing::instrument(skip(self), fields(accommodation_id = %id, user_id = %user_id))]
    pub async fn details_on(
        &self,
        user_id: Uuid,
        id: Uuid,
        today: NaiveDate,
    ) -> Result<AccommodationDetails, UsecaseError> {
        tracing::debug!("loading accommodation details");

        let accommodation = self.get_accommodation(id).await?;
        let city = self
            .city_repository
            .find_by_id(accommodation.city_id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("City".to_string()))?;

        let amenities = self.accommodation_repository.find_amenities(id).await?;
        let reviews = self
            .review_repository
            .find_by_target(ReviewTarget::Accommodation(id))
            .await?;
        let has_reviewed = reviews.iter().any(|r| r.review.user_id == user_id);

        let active_booking = self
            .booking_repository
            .find_by_user_and_accommodation(user_id, id)
            .await?
            // not archived yet, but already over
            .filter(|booking| !booking.is_expired(today));
        let days_remaining = active_booking
            .as_ref()
            .map(|booking| AccommodationDetails::days_until(booking.end_date, today));

        Ok(AccommodationDetails {
            accommodation,
            city,
            amenities,
            reviews,
            active_booking,
            days_remaining,
            has_reviewed,
        })
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::booking::Booking;
    use crate::domain::city::City;
    use crate::usecase::contracts::{
        MockAccommodationRepository, MockBookingRepository, MockCityRepository, MockReviewRepository,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_details_report_days_remaining_of_booking() {
        let mut accommodations = MockAccommodationRepository::new();
        let mut cities = MockCityRepository::new();
        let mut reviews = MockReviewRepository::new();
        let mut bookings = MockBookingRepository::new();

        let city = City::new("Porto".to_string(), "Portugal".to_string(), None, None, 900.0);
        let accommodation = Accommodation::new(
            "River Inn".to_string(),
            "Hotel".to_string(),
            "Ribeira".to_string(),
            80.0,
            city.id,
            String::new(),
        );
        let accommodation_id = accommodation.id;
        let user_id = Uuid::new_v4();
        let booking = Booking::new(user_id, accommodation_id, date(2024, 12, 26), 5).unwrap();

        accommodations
            .expect_find_by_id()
            .with(eq(accommodation_id))
            .returning(move |_| Ok(Some(accommodation.clone())));
        accommodations.expect_find_amenities().returning(|_| Ok(vec![]));
        cities
            .expect_find_by_id()
            .returning(move |_| Ok(Some(city.clone())));
        reviews.expect_find_by_target().returning(|_| Ok(vec![]));
        bookings
            .expect_find_by_user_and_accommodation()
            .with(eq(user_id), eq(accommodation_id))
            .times(1)
            .returning(move |_, _| Ok(Some(booking.clone())));

        let usecase = AccommodationsUseCase::new(accommodations, cities, reviews, bookings);
        let details = usecase
            .details_on(user_id, accommodation_id, date(2024, 12, 28))
            .await
            .unwrap();

        assert_eq!(details.days_remaining, Some(3));
        assert!(!details.has_reviewed);
    }

    #[tokio::test]
    async fn test_details_hide_expired_booking() {
        let mut accommodations = MockAccommodationRepository::new();
        let mut cities = MockCityRepository::new();
        let mut reviews = MockReviewRepository::new();
        let mut bookings = MockBookingRepository::new();

        let city = City::new("Porto".to_string(), "Portugal".to_string(), None, None, 900.0);
        let accommodation = Accommodation::new(
            "River Inn".to_string(),
            "Hotel".to_string(),
            "Ribeira".to_string(),
            80.0,
            city.id,
            String::new(),
        );
        let accommodation_id = accommodation.id;
        let user_id = Uuid::new_v4();
        let booking = Booking::new(user_id, accommodation_id, date(2024, 12, 1), 2).unwrap();

        accommodations
            .expect_find_by_id()
            .returning(move |_| Ok(Some(accommodation.clone())));
        accommodations.expect_find_amenities().returning(|_| Ok(vec![]));
        cities
            .expect_find_by_id()
            .returning(move |_| Ok(Some(city.clone())));
        reviews.expect_find_by_target().returning(|_| Ok(vec![]));
        bookings
            .expect_find_by_user_and_accommodation()
            .returning(move |_, _| Ok(Some(booking.clone())));

        let usecase = AccommodationsUseCase::new(accommodations, cities, reviews, bookings);
        let details = usecase
            .details_on(user_id, accommodation_id, date(2024, 12, 28))
            .await
            .unwrap();

        assert!(details.active_booking.is_none());
        assert_eq!(details.days_remaining, None);
    }

    #[tokio::test]
    async fn test_update_missing_accommodation() {
        let mut accommodations = MockAccommodationRepository::new();
        accommodations.expect_find_by_id().returning(|_| Ok(None));
        accommodations.expect_update().never();

        let usecase = AccommodationsUseCase::new(
            accommodations,
            MockCityRepository::new(),
            MockReviewRepository::new(),
            MockBookingRepository::new(),
        );
        let result = usecase
            .update_accommodation(
                Uuid::new_v4(),
                AccommodationInput {
                    name: "Loft".to_string(),
                    kind: "Apartment".to_string(),
                    location: "Centre".to_string(),
                    price: 50.0,
                    city_id: Uuid::new_v4(),
                    image_path: None,
                    amenity_ids: vec![],
                },
            )
            .await;

        assert!(matches!(result, Err(UsecaseError::NotFound(what)) if what == "Accommodation"));
    }
}
