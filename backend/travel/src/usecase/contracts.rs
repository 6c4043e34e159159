use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::accommodation::{Accommodation, Amenity};
use crate::domain::activity::Activity;
use crate::domain::booking::{Booking, Reservation};
use crate::domain::city::City;
use crate::domain::destination::Destination;
use crate::domain::favorite::Favorite;
use crate::domain::preference::Preference;
use crate::domain::ranking::{AccommodationListing, DestinationListing};
use crate::domain::rating::{AverageUpdate, ReviewChangeSet};
use crate::domain::review::{Review, ReviewTarget, ReviewWithAuthor};
use crate::domain::stats::{CityDestinationCount, CityReview, DestinationRating, ReviewerCount};
use crate::domain::user::User;
use crate::domain::visit::Visit;
use crate::repository::errors::RepositoryError;

#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    async fn find_all(&self) -> Result<Vec<User>, RepositoryError>;
    async fn update(&self, user: &User) -> Result<(), RepositoryError>;
    /// Also drops the user's reviews and returns the recomputed averages.
    async fn delete(&self, id: Uuid) -> Result<Vec<AverageUpdate>, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait PreferenceRepository: Send + Sync {
    async fn create(&self, preference: &Preference) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Preference>, RepositoryError>;
    async fn find_all(&self) -> Result<Vec<Preference>, RepositoryError>;
    async fn update(&self, preference: &Preference) -> Result<(), RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Preference>, RepositoryError>;
    async fn add_to_user(&self, user_id: Uuid, preference_id: Uuid) -> Result<(), RepositoryError>;
    async fn remove_from_user(&self, user_id: Uuid, preference_id: Uuid) -> Result<(), RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait AmenityRepository: Send + Sync {
    async fn create(&self, amenity: &Amenity) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Amenity>, RepositoryError>;
    async fn find_all(&self) -> Result<Vec<Amenity>, RepositoryError>;
    async fn update(&self, amenity: &Amenity) -> Result<(), RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait CityRepository: Send + Sync {
    async fn create(&self, city: &City) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<City>, RepositoryError>;
    async fn find_all(&self) -> Result<Vec<City>, RepositoryError>;
    async fn update(&self, city: &City) -> Result<(), RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait DestinationRepository: Send + Sync {
    async fn create(&self, destination: &Destination, attraction_ids: &[Uuid]) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Destination>, RepositoryError>;
    async fn find_all(&self) -> Result<Vec<Destination>, RepositoryError>;
    async fn update(&self, destination: &Destination, attraction_ids: &[Uuid]) -> Result<(), RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
    async fn find_attractions(&self, destination_id: Uuid) -> Result<Vec<Preference>, RepositoryError>;
    async fn find_activities(&self, destination_id: Uuid) -> Result<Vec<Activity>, RepositoryError>;
    async fn list_for_ranking(&self) -> Result<Vec<DestinationListing>, RepositoryError>;
    async fn search(&self, query: &str) -> Result<Vec<Destination>, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait AccommodationRepository: Send + Sync {
    async fn create(&self, accommodation: &Accommodation, amenity_ids: &[Uuid]) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Accommodation>, RepositoryError>;
    async fn find_all(&self) -> Result<Vec<Accommodation>, RepositoryError>;
    async fn update(&self, accommodation: &Accommodation, amenity_ids: &[Uuid]) -> Result<(), RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
    async fn find_amenities(&self, accommodation_id: Uuid) -> Result<Vec<Amenity>, RepositoryError>;
    async fn list_for_ranking(&self) -> Result<Vec<AccommodationListing>, RepositoryError>;
    async fn search(&self, query: &str) -> Result<Vec<Accommodation>, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait ActivityRepository: Send + Sync {
    async fn create(&self, activity: &Activity, destination_ids: &[Uuid]) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Activity>, RepositoryError>;
    async fn find_all(&self) -> Result<Vec<Activity>, RepositoryError>;
    async fn update(&self, activity: &Activity, destination_ids: &[Uuid]) -> Result<(), RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait ReviewRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, RepositoryError>;
    async fn find_by_user_and_target(
        &self,
        user_id: Uuid,
        target: ReviewTarget,
    ) -> Result<Option<Review>, RepositoryError>;
    async fn find_by_target(&self, target: ReviewTarget) -> Result<Vec<ReviewWithAuthor>, RepositoryError>;
    async fn find_all(&self) -> Result<Vec<ReviewWithAuthor>, RepositoryError>;
    async fn target_exists(&self, target: ReviewTarget) -> Result<bool, RepositoryError>;
    async fn reviewed_destination_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepositoryError>;
    /// Persists the change set and recomputes every affected average in one transaction.
    async fn apply(&self, changes: &ReviewChangeSet) -> Result<Vec<AverageUpdate>, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait EngagementRepository: Send + Sync {
    async fn add_favorite(&self, favorite: &Favorite) -> Result<(), RepositoryError>;
    async fn remove_favorite(&self, user_id: Uuid, destination_id: Uuid) -> Result<(), RepositoryError>;
    async fn is_favorite(&self, user_id: Uuid, destination_id: Uuid) -> Result<bool, RepositoryError>;
    async fn favorite_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepositoryError>;
    async fn favorite_destinations(&self, user_id: Uuid) -> Result<Vec<Destination>, RepositoryError>;
    async fn add_visit(&self, visit: &Visit) -> Result<(), RepositoryError>;
    async fn has_visited(&self, user_id: Uuid, destination_id: Uuid) -> Result<bool, RepositoryError>;
    async fn visited_destinations(&self, user_id: Uuid) -> Result<Vec<Destination>, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait BookingRepository: Send + Sync {
    /// Locks the accommodation, checks for an existing booking and availability,
    /// then inserts and marks the accommodation unavailable, atomically.
    async fn reserve(&self, booking: &Booking) -> Result<Reservation, RepositoryError>;
    async fn find_by_user_and_accommodation(
        &self,
        user_id: Uuid,
        accommodation_id: Uuid,
    ) -> Result<Option<Booking>, RepositoryError>;
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>, RepositoryError>;
    /// Moves bookings ending before `today` to the history table. Returns how many moved.
    async fn archive_expired(&self, today: NaiveDate) -> Result<u64, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait StatsRepository: Send + Sync {
    async fn destinations_per_city(&self) -> Result<Vec<CityDestinationCount>, RepositoryError>;
    async fn top_reviewers(&self, limit: i64) -> Result<Vec<ReviewerCount>, RepositoryError>;
    /// Every review of every destination, tagged with the destination's city.
    async fn city_reviews(&self) -> Result<Vec<CityReview>, RepositoryError>;
    /// Cached destination averages, best first.
    async fn destination_ratings(&self) -> Result<Vec<DestinationRating>, RepositoryError>;
}
