mod bookings;
mod catalog;
mod engagement;
mod reviews;
mod stats;
mod users;

use sqlx::{postgres::PgPoolOptions, PgPool};

pub use bookings::PostgresBookingRepository;
pub use catalog::{
    PostgresAccommodationRepository, PostgresActivityRepository, PostgresAmenityRepository,
    PostgresCityRepository, PostgresDestinationRepository,
};
pub use engagement::PostgresEngagementRepository;
pub use reviews::PostgresReviewRepository;
pub use stats::PostgresStatsRepository;
pub use users::{PostgresPreferenceRepository, PostgresUserRepository};

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
