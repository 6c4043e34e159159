use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::accommodation::{Accommodation, Amenity};
use crate::domain::activity::Activity;
use crate::domain::city::City;
use crate::domain::destination::Destination;
use crate::domain::preference::Preference;
use crate::domain::ranking::{AccommodationListing, DestinationListing};
use crate::repository::errors::RepositoryError;
use crate::usecase::contracts::{
    AccommodationRepository, ActivityRepository, AmenityRepository, CityRepository,
    DestinationRepository,
};

/// `%`, `_` and `\` in user input match literally.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Replaces the rows of a join table owned by `owner_id`.
async fn replace_links(
    tx: &mut Transaction<'_, Postgres>,
    delete_sql: &str,
    insert_sql: &str,
    owner_id: Uuid,
    linked_ids: &[Uuid],
) -> Result<(), RepositoryError> {
    sqlx::query(delete_sql)
        .bind(owner_id)
        .execute(&mut **tx)
        .await?;

    for linked_id in linked_ids {
        sqlx::query(insert_sql)
            .bind(owner_id)
            .bind(linked_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

pub struct PostgresCityRepository {
    pool: PgPool,
}

impl PostgresCityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CityRepository for PostgresCityRepository {
    #[tracing::instrument(skip(self, city), fields(city_id = %city.id))]
    async fn create(&self, city: &City) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO cities (id, name, location, climate, terrain, cost_of_living)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(city.id)
        .bind(&city.name)
        .bind(&city.location)
        .bind(&city.climate)
        .bind(&city.terrain)
        .bind(city.cost_of_living)
        .execute(&self.pool)
        .await?;

        tracing::debug!(city_id = %city.id, "city created successfully");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(city_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<City>, RepositoryError> {
        let city = sqlx::query_as::<_, City>(
            r#"
            SELECT id, name, location, climate, terrain, cost_of_living
            FROM cities
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(city)
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<City>, RepositoryError> {
        let cities = sqlx::query_as::<_, City>(
            r#"
            SELECT id, name, location, climate, terrain, cost_of_living
            FROM cities
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(cities)
    }

    #[tracing::instrument(skip(self, city), fields(city_id = %city.id))]
    async fn update(&self, city: &City) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE cities
            SET name = $2, location = $3, climate = $4, terrain = $5, cost_of_living = $6
            WHERE id = $1
            "#,
        )
        .bind(city.id)
        .bind(&city.name)
        .bind(&city.location)
        .bind(&city.climate)
        .bind(&city.terrain)
        .bind(city.cost_of_living)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(city_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        tracing::debug!("deleting city");

        let result = sqlx::query("DELETE FROM cities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tracing::debug!(city_id = %id, "city deleted successfully");
        Ok(())
    }
}

pub struct PostgresDestinationRepository {
    pool: PgPool,
}

impl PostgresDestinationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const DESTINATION_ATTRACTIONS_DELETE: &str =
    "DELETE FROM destination_attractions WHERE destination_id = $1";
const DESTINATION_ATTRACTIONS_INSERT: &str =
    "INSERT INTO destination_attractions (destination_id, preference_id) VALUES ($1, $2)";

#[derive(sqlx::FromRow)]
struct DestinationListingRow {
    #[sqlx(flatten)]
    destination: Destination,
    city_name: String,
    attraction_tags: Vec<String>,
}

impl DestinationRepository for PostgresDestinationRepository {
    #[tracing::instrument(skip(self, destination, attraction_ids), fields(destination_id = %destination.id))]
    async fn create(&self, destination: &Destination, attraction_ids: &[Uuid]) -> Result<(), RepositoryError> {
        tracing::debug!(attractions = attraction_ids.len(), "creating destination");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO destinations (id, name, description, city_id, location, image_path, average_rating)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(destination.id)
        .bind(&destination.name)
        .bind(&destination.description)
        .bind(destination.city_id)
        .bind(&destination.location)
        .bind(&destination.image_path)
        .bind(destination.average_rating)
        .execute(&mut *tx)
        .await?;

        replace_links(
            &mut tx,
            DESTINATION_ATTRACTIONS_DELETE,
            DESTINATION_ATTRACTIONS_INSERT,
            destination.id,
            attraction_ids,
        )
        .await?;

        tx.commit().await?;

        tracing::debug!(destination_id = %destination.id, "destination created successfully");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(destination_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Destination>, RepositoryError> {
        let destination = sqlx::query_as::<_, Destination>(
            r#"
            SELECT id, name, description, city_id, location, image_path, average_rating
            FROM destinations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(destination)
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Destination>, RepositoryError> {
        let destinations = sqlx::query_as::<_, Destination>(
            r#"
            SELECT id, name, description, city_id, location, image_path, average_rating
            FROM destinations
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(destinations)
    }

    /// Leaves `average_rating` alone: only the review aggregator writes it.
    #[tracing::instrument(skip(self, destination, attraction_ids), fields(destination_id = %destination.id))]
    async fn update(&self, destination: &Destination, attraction_ids: &[Uuid]) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE destinations
            SET name = $2, description = $3, city_id = $4, location = $5, image_path = $6
            WHERE id = $1
            "#,
        )
        .bind(destination.id)
        .bind(&destination.name)
        .bind(&destination.description)
        .bind(destination.city_id)
        .bind(&destination.location)
        .bind(&destination.image_path)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        replace_links(
            &mut tx,
            DESTINATION_ATTRACTIONS_DELETE,
            DESTINATION_ATTRACTIONS_INSERT,
            destination.id,
            attraction_ids,
        )
        .await?;

        tx.commit().await?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(destination_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM destinations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tracing::debug!(destination_id = %id, "destination deleted successfully");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(destination_id = %destination_id))]
    async fn find_attractions(&self, destination_id: Uuid) -> Result<Vec<Preference>, RepositoryError> {
        let attractions = sqlx::query_as::<_, Preference>(
            r#"
            SELECT p.id, p.content
            FROM preferences p
            JOIN destination_attractions da ON da.preference_id = p.id
            WHERE da.destination_id = $1
            ORDER BY p.content
            "#,
        )
        .bind(destination_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(attractions)
    }

    #[tracing::instrument(skip(self), fields(destination_id = %destination_id))]
    async fn find_activities(&self, destination_id: Uuid) -> Result<Vec<Activity>, RepositoryError> {
        let activities = sqlx::query_as::<_, Activity>(
            r#"
            SELECT a.id, a.name, a.kind, a.scheduled_at, a.price, a.requires_reservation, a.average_rating
            FROM activities a
            JOIN activity_destinations ad ON ad.activity_id = a.id
            WHERE ad.destination_id = $1
            ORDER BY a.scheduled_at NULLS LAST, a.name
            "#,
        )
        .bind(destination_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(activities)
    }

    /// Every destination with its city name and attraction tag contents,
    /// in a stable order so ranking ties are deterministic.
    #[tracing::instrument(skip(self))]
    async fn list_for_ranking(&self) -> Result<Vec<DestinationListing>, RepositoryError> {
        let rows = sqlx::query_as::<_, DestinationListingRow>(
            r#"
            SELECT d.id, d.name, d.description, d.city_id, d.location, d.image_path, d.average_rating,
                   c.name AS city_name,
                   COALESCE(
                       ARRAY_AGG(p.content ORDER BY p.content) FILTER (WHERE p.content IS NOT NULL),
                       ARRAY[]::VARCHAR[]
                   ) AS attraction_tags
            FROM destinations d
            JOIN cities c ON c.id = d.city_id
            LEFT JOIN destination_attractions da ON da.destination_id = d.id
            LEFT JOIN preferences p ON p.id = da.preference_id
            GROUP BY d.id, c.name
            ORDER BY d.name, d.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(count = rows.len(), "loaded destinations for ranking");
        Ok(rows
            .into_iter()
            .map(|row| DestinationListing {
                destination: row.destination,
                city_name: row.city_name,
                attraction_tags: row.attraction_tags,
            })
            .collect())
    }

    #[tracing::instrument(skip(self, query))]
    async fn search(&self, query: &str) -> Result<Vec<Destination>, RepositoryError> {
        let destinations = sqlx::query_as::<_, Destination>(
            r#"
            SELECT id, name, description, city_id, location, image_path, average_rating
            FROM destinations
            WHERE name ILIKE $1 OR description ILIKE $1
            ORDER BY name
            "#,
        )
        .bind(like_pattern(query))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(count = destinations.len(), "destination search finished");
        Ok(destinations)
    }
}

pub struct PostgresAccommodationRepository {
    pool: PgPool,
}

impl PostgresAccommodationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ACCOMMODATION_AMENITIES_DELETE: &str =
    "DELETE FROM accommodation_amenities WHERE accommodation_id = $1";
const ACCOMMODATION_AMENITIES_INSERT: &str =
    "INSERT INTO accommodation_amenities (accommodation_id, amenity_id) VALUES ($1, $2)";

#[derive(sqlx::FromRow)]
struct AccommodationListingRow {
    #[sqlx(flatten)]
    accommodation: Accommodation,
    city_name: String,
    amenity_names: Vec<String>,
}

impl AccommodationRepository for PostgresAccommodationRepository {
    #[tracing::instrument(skip(self, accommodation, amenity_ids), fields(accommodation_id = %accommodation.id))]
    async fn create(&self, accommodation: &Accommodation, amenity_ids: &[Uuid]) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO accommodations (id, name, kind, location, price, availability, city_id, image_path, average_rating)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(accommodation.id)
        .bind(&accommodation.name)
        .bind(&accommodation.kind)
        .bind(&accommodation.location)
        .bind(accommodation.price)
        .bind(accommodation.availability)
        .bind(accommodation.city_id)
        .bind(&accommodation.image_path)
        .bind(accommodation.average_rating)
        .execute(&mut *tx)
        .await?;

        replace_links(
            &mut tx,
            ACCOMMODATION_AMENITIES_DELETE,
            ACCOMMODATION_AMENITIES_INSERT,
            accommodation.id,
            amenity_ids,
        )
        .await?;

        tx.commit().await?;

        tracing::debug!(accommodation_id = %accommodation.id, "accommodation created successfully");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(accommodation_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Accommodation>, RepositoryError> {
        let accommodation = sqlx::query_as::<_, Accommodation>(
            r#"
            SELECT id, name, kind, location, price, availability, city_id, image_path, average_rating
            FROM accommodations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(accommodation)
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Accommodation>, RepositoryError> {
        let accommodations = sqlx::query_as::<_, Accommodation>(
            r#"
            SELECT id, name, kind, location, price, availability, city_id, image_path, average_rating
            FROM accommodations
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(accommodations)
    }

    /// Availability belongs to the booking flow and the rating to the aggregator;
    /// neither is written here.
    #[tracing::instrument(skip(self, accommodation, amenity_ids), fields(accommodation_id = %accommodation.id))]
    async fn update(&self, accommodation: &Accommodation, amenity_ids: &[Uuid]) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE accommodations
            SET name = $2, kind = $3, location = $4, price = $5, city_id = $6, image_path = $7
            WHERE id = $1
            "#,
        )
        .bind(accommodation.id)
        .bind(&accommodation.name)
        .bind(&accommodation.kind)
        .bind(&accommodation.location)
        .bind(accommodation.price)
        .bind(accommodation.city_id)
        .bind(&accommodation.image_path)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        replace_links(
            &mut tx,
            ACCOMMODATION_AMENITIES_DELETE,
            ACCOMMODATION_AMENITIES_INSERT,
            accommodation.id,
            amenity_ids,
        )
        .await?;

        tx.commit().await?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(accommodation_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM accommodations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(accommodation_id = %accommodation_id))]
    async fn find_amenities(&self, accommodation_id: Uuid) -> Result<Vec<Amenity>, RepositoryError> {
        let amenities = sqlx::query_as::<_, Amenity>(
            r#"
            SELECT am.id, am.name
            FROM amenities am
            JOIN accommodation_amenities aa ON aa.amenity_id = am.id
            WHERE aa.accommodation_id = $1
            ORDER BY am.name
            "#,
        )
        .bind(accommodation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(amenities)
    }

    #[tracing::instrument(skip(self))]
    async fn list_for_ranking(&self) -> Result<Vec<AccommodationListing>, RepositoryError> {
        let rows = sqlx::query_as::<_, AccommodationListingRow>(
            r#"
            SELECT a.id, a.name, a.kind, a.location, a.price, a.availability, a.city_id, a.image_path,
                   a.average_rating,
                   c.name AS city_name,
                   COALESCE(
                       ARRAY_AGG(am.name ORDER BY am.name) FILTER (WHERE am.name IS NOT NULL),
                       ARRAY[]::VARCHAR[]
                   ) AS amenity_names
            FROM accommodations a
            JOIN cities c ON c.id = a.city_id
            LEFT JOIN accommodation_amenities aa ON aa.accommodation_id = a.id
            LEFT JOIN amenities am ON am.id = aa.amenity_id
            GROUP BY a.id, c.name
            ORDER BY a.name, a.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(count = rows.len(), "loaded accommodations for ranking");
        Ok(rows
            .into_iter()
            .map(|row| AccommodationListing {
                accommodation: row.accommodation,
                city_name: row.city_name,
                amenity_names: row.amenity_names,
            })
            .collect())
    }

    #[tracing::instrument(skip(self, query))]
    async fn search(&self, query: &str) -> Result<Vec<Accommodation>, RepositoryError> {
        let accommodations = sqlx::query_as::<_, Accommodation>(
            r#"
            SELECT id, name, kind, location, price, availability, city_id, image_path, average_rating
            FROM accommodations
            WHERE name ILIKE $1 OR location ILIKE $1
            ORDER BY name
            "#,
        )
        .bind(like_pattern(query))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(accommodations)
    }
}

pub struct PostgresActivityRepository {
    pool: PgPool,
}

impl PostgresActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ACTIVITY_DESTINATIONS_DELETE: &str = "DELETE FROM activity_destinations WHERE activity_id = $1";
const ACTIVITY_DESTINATIONS_INSERT: &str =
    "INSERT INTO activity_destinations (activity_id, destination_id) VALUES ($1, $2)";

impl ActivityRepository for PostgresActivityRepository {
    #[tracing::instrument(skip(self, activity, destination_ids), fields(activity_id = %activity.id))]
    async fn create(&self, activity: &Activity, destination_ids: &[Uuid]) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO activities (id, name, kind, scheduled_at, price, requires_reservation, average_rating)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(activity.id)
        .bind(&activity.name)
        .bind(&activity.kind)
        .bind(activity.scheduled_at)
        .bind(activity.price)
        .bind(activity.requires_reservation)
        .bind(activity.average_rating)
        .execute(&mut *tx)
        .await?;

        replace_links(
            &mut tx,
            ACTIVITY_DESTINATIONS_DELETE,
            ACTIVITY_DESTINATIONS_INSERT,
            activity.id,
            destination_ids,
        )
        .await?;

        tx.commit().await?;

        tracing::debug!(activity_id = %activity.id, "activity created successfully");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(activity_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Activity>, RepositoryError> {
        let activity = sqlx::query_as::<_, Activity>(
            r#"
            SELECT id, name, kind, scheduled_at, price, requires_reservation, average_rating
            FROM activities
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(activity)
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Activity>, RepositoryError> {
        let activities = sqlx::query_as::<_, Activity>(
            r#"
            SELECT id, name, kind, scheduled_at, price, requires_reservation, average_rating
            FROM activities
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(activities)
    }

    #[tracing::instrument(skip(self, activity, destination_ids), fields(activity_id = %activity.id))]
    async fn update(&self, activity: &Activity, destination_ids: &[Uuid]) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE activities
            SET name = $2, kind = $3, scheduled_at = $4, price = $5, requires_reservation = $6
            WHERE id = $1
            "#,
        )
        .bind(activity.id)
        .bind(&activity.name)
        .bind(&activity.kind)
        .bind(activity.scheduled_at)
        .bind(activity.price)
        .bind(activity.requires_reservation)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        replace_links(
            &mut tx,
            ACTIVITY_DESTINATIONS_DELETE,
            ACTIVITY_DESTINATIONS_INSERT,
            activity.id,
            destination_ids,
        )
        .await?;

        tx.commit().await?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(activity_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM activities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

pub struct PostgresAmenityRepository {
    pool: PgPool,
}

impl PostgresAmenityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl AmenityRepository for PostgresAmenityRepository {
    #[tracing::instrument(skip(self, amenity), fields(amenity_id = %amenity.id))]
    async fn create(&self, amenity: &Amenity) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO amenities (id, name) VALUES ($1, $2)")
            .bind(amenity.id)
            .bind(&amenity.name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(amenity_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Amenity>, RepositoryError> {
        let amenity = sqlx::query_as::<_, Amenity>("SELECT id, name FROM amenities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(amenity)
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Amenity>, RepositoryError> {
        let amenities = sqlx::query_as::<_, Amenity>("SELECT id, name FROM amenities ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(amenities)
    }

    #[tracing::instrument(skip(self, amenity), fields(amenity_id = %amenity.id))]
    async fn update(&self, amenity: &Amenity) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE amenities SET name = $2 WHERE id = $1")
            .bind(amenity.id)
            .bind(&amenity.name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(amenity_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM amenities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
