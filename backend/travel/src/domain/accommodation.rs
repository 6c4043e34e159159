use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::booking::Booking;
use crate::domain::city::City;
use crate::domain::review::ReviewWithAuthor;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Accommodation {
    pub id: Uuid,
    pub name: String,
    pub kind: String,
    pub location: String,
    pub price: f64,
    pub availability: bool,
    pub city_id: Uuid,
    pub image_path: String,
    pub average_rating: Option<f64>,
}

impl Accommodation {
    pub fn new(
        name: String,
        kind: String,
        location: String,
        price: f64,
        city_id: Uuid,
        image_path: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            kind,
            location,
            price,
            availability: true,
            city_id,
            image_path,
            average_rating: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Amenity {
    pub id: Uuid,
    pub name: String,
}

impl Amenity {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AccommodationDetails {
    #[serde(flatten)]
    pub accommodation: Accommodation,
    pub city: City,
    pub amenities: Vec<Amenity>,
    pub reviews: Vec<ReviewWithAuthor>,
    pub active_booking: Option<Booking>,
    pub days_remaining: Option<i64>,
    pub has_reviewed: bool,
}

impl AccommodationDetails {
    /// Whole days from `today` until the booking ends, never negative.
    pub fn days_until(end_date: NaiveDate, today: NaiveDate) -> i64 {
        (end_date - today).num_days().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accommodation_is_available_and_unrated() {
        let accommodation = Accommodation::new(
            "Harbour Inn".to_string(),
            "Hotel".to_string(),
            "Seafront".to_string(),
            120.0,
            Uuid::new_v4(),
            String::new(),
        );

        assert!(accommodation.availability);
        assert!(accommodation.average_rating.is_none());
    }

    #[test]
    fn test_days_until() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 27).unwrap();

        assert_eq!(
            AccommodationDetails::days_until(NaiveDate::from_ymd_opt(2024, 12, 30).unwrap(), today),
            3
        );
        assert_eq!(
            AccommodationDetails::days_until(NaiveDate::from_ymd_opt(2024, 12, 20).unwrap(), today),
            0
        );
    }
}
