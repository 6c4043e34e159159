//! Administration of cities, activities and amenities.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::accommodation::Amenity;
use crate::domain::activity::Activity;
use crate::domain::city::City;
use crate::repository::errors::RepositoryError;
use crate::usecase::contracts::{ActivityRepository, AmenityRepository, CityRepository};
use crate::usecase::error::UsecaseError;

pub(crate) fn not_found(entity: &'static str) -> impl Fn(RepositoryError) -> UsecaseError {
    move |e| match e {
        RepositoryError::NotFound => UsecaseError::NotFound(entity.to_string()),
        other => other.into(),
    }
}

#[derive(Debug, Clone)]
pub struct CityInput {
    pub name: String,
    pub location: String,
    pub climate: Option<String>,
    pub terrain: Option<String>,
    pub cost_of_living: f64,
}

pub struct CitiesUseCase<C>
where
    C: CityRepository,
{
    city_repository: C,
}

impl<C> CitiesUseCase<C>
where
    C: CityRepository,
{
    pub fn new(city_repository: C) -> Self {
        Self { city_repository }
    }

    #[tracing::instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_city(&self, input: CityInput) -> Result<City, UsecaseError> {
        let city = City::new(
            input.name,
            input.location,
            input.climate,
            input.terrain,
            input.cost_of_living,
        );
        self.city_repository.create(&city).await?;

        tracing::info!(city_id = %city.id, "city created");
        Ok(city)
    }

    #[tracing::instrument(skip(self), fields(city_id = %id))]
    pub async fn get_city(&self, id: Uuid) -> Result<City, UsecaseError> {
        self.city_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("City".to_string()))
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_cities(&self) -> Result<Vec<City>, UsecaseError> {
        Ok(self.city_repository.find_all().await?)
    }

    #[tracing::instrument(skip(self, input), fields(city_id = %id))]
    pub async fn update_city(&self, id: Uuid, input: CityInput) -> Result<City, UsecaseError> {
        let mut city = self.get_city(id).await?;
        city.name = input.name;
        city.location = input.location;
        city.climate = input.climate;
        city.terrain = input.terrain;
        city.cost_of_living = input.cost_of_living;

        self.city_repository
            .update(&city)
            .await
            .map_err(not_found("City"))?;

        tracing::info!(city_id = %id, "city updated");
        Ok(city)
    }

    /// Removes the city together with its destinations and accommodations.
    #[tracing::instrument(skip(self), fields(city_id = %id))]
    pub async fn delete_city(&self, id: Uuid) -> Result<(), UsecaseError> {
        self.city_repository
            .delete(id)
            .await
            .map_err(not_found("City"))?;

        tracing::info!(city_id = %id, "city deleted");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ActivityInput {
    pub name: String,
    pub kind: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub price: f64,
    pub requires_reservation: bool,
    pub destination_ids: Vec<Uuid>,
}

pub struct ActivitiesUseCase<A>
where
    A: ActivityRepository,
{
    activity_repository: A,
}

impl<A> ActivitiesUseCase<A>
where
    A: ActivityRepository,
{
    pub fn new(activity_repository: A) -> Self {
        Self { activity_repository }
    }

    #[tracing::instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_activity(&self, input: ActivityInput) -> Result<Activity, UsecaseError> {
        let activity = Activity::new(
            input.name,
            input.kind,
            input.scheduled_at,
            input.price,
            input.requires_reservation,
        );
        self.activity_repository
            .create(&activity, &input.destination_ids)
            .await?;

        tracing::info!(activity_id = %activity.id, "activity created");
        Ok(activity)
    }

    #[tracing::instrument(skip(self), fields(activity_id = %id))]
    pub async fn get_activity(&self, id: Uuid) -> Result<Activity, UsecaseError> {
        self.activity_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Activity".to_string()))
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_activities(&self) -> Result<Vec<Activity>, UsecaseError> {
        Ok(self.activity_repository.find_all().await?)
    }

    #[tracing::instrument(skip(self, input), fields(activity_id = %id))]
    pub async fn update_activity(&self, id: Uuid, input: ActivityInput) -> Result<Activity, UsecaseError> {
        let mut activity = self.get_activity(id).await?;
        activity.name = input.name;
        activity.kind = input.kind;
        activity.scheduled_at = input.scheduled_at;
        activity.price = input.price;
        activity.requires_reservation = input.requires_reservation;

        self.activity_repository
            .update(&activity, &input.destination_ids)
            .await
            .map_err(not_found("Activity"))?;

        tracing::info!(activity_id = %id, "activity updated");
        Ok(activity)
    }

    #[tracing::instrument(skip(self), fields(activity_id = %id))]
    pub async fn delete_activity(&self, id: Uuid) -> Result<(), UsecaseError> {
        self.activity_repository
            .delete(id)
            .await
            .map_err(not_found("Activity"))?;

        tracing::info!(activity_id = %id, "activity deleted");
        Ok(())
    }
}

pub struct AmenitiesUseCase<M>
where
    M: AmenityRepository,
{
    amenity_repository: M,
}

impl<M> AmenitiesUseCase<M>
where
    M: AmenityRepository,
{
    pub fn new(amenity_repository: M) -> Self {
        Self { amenity_repository }
    }

    #[tracing::instrument(skip(self))]
    pub async fn create_amenity(&self, name: String) -> Result<Amenity, UsecaseError> {
        let amenity = Amenity::new(name.trim().to_string());
        self.amenity_repository.create(&amenity).await?;

        tracing::info!(amenity_id = %amenity.id, "amenity created");
        Ok(amenity)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_amenities(&self) -> Result<Vec<Amenity>, UsecaseError> {
        Ok(self.amenity_repository.find_all().await?)
    }

    #[tracing::instrument(skip(self), fields(amenity_id = %id))]
    pub async fn update_amenity(&self, id: Uuid, name: String) -> Result<Amenity, UsecaseError> {
        let mut amenity = self
            .amenity_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Amenity".to_string()))?;
        amenity.name = name.trim().to_string();

        self.amenity_repository
            .update(&amenity)
            .await
            .map_err(not_found("Amenity"))?;
        Ok(amenity)
    }

    #[tracing::instrument(skip(self), fields(amenity_id = %id))]
    pub async fn delete_amenity(&self, id: Uuid) -> Result<(), UsecaseError> {
        self.amenity_repository
            .delete(id)
            .await
            .map_err(not_found("Amenity"))?;

        tracing::info!(amenity_id = %id, "amenity deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::usecase::contracts::{MockActivityRepository, MockAmenityRepository, MockCityRepository};

    fn city_input(name: &str) -> CityInput {
        CityInput {
            name: name.to_string(),
            location: "Coast".to_string(),
            climate: Some("Mild".to_string()),
            terrain: None,
            cost_of_living: 1200.0,
        }
    }

    #[tokio::test]
    async fn test_create_city() {
        let mut mock_repo = MockCityRepository::new();
        mock_repo
            .expect_create()
            .withf(|city| city.name == "Lisbon")
            .times(1)
            .returning(|_| Ok(()));

        let usecase = CitiesUseCase::new(mock_repo);
        let city = usecase.create_city(city_input("Lisbon")).await.unwrap();

        assert_eq!(city.climate.as_deref(), Some("Mild"));
    }

    #[tokio::test]
    async fn test_update_missing_city() {
        let mut mock_repo = MockCityRepository::new();
        mock_repo.expect_find_by_id().returning(|_| Ok(None));
        mock_repo.expect_update().never();

        let usecase = CitiesUseCase::new(mock_repo);
        let result = usecase.update_city(Uuid::new_v4(), city_input("Porto")).await;

        assert!(result.unwrap_err().to_string().contains("City not found"));
    }

    #[tokio::test]
    async fn test_delete_city_maps_not_found() {
        let mut mock_repo = MockCityRepository::new();
        let id = Uuid::new_v4();
        mock_repo
            .expect_delete()
            .with(eq(id))
            .times(1)
            .returning(|_| Err(RepositoryError::NotFound));

        let usecase = CitiesUseCase::new(mock_repo);
        let result = usecase.delete_city(id).await;

        assert!(matches!(result, Err(UsecaseError::NotFound(what)) if what == "City"));
    }

    #[tokio::test]
    async fn test_create_activity_links_destinations() {
        let mut mock_repo = MockActivityRepository::new();
        let destination_id = Uuid::new_v4();
        mock_repo
            .expect_create()
            .withf(move |activity, ids| activity.name == "Kayaking" && ids.len() == 1 && ids[0] == destination_id)
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase = ActivitiesUseCase::new(mock_repo);
        let activity = usecase
            .create_activity(ActivityInput {
                name: "Kayaking".to_string(),
                kind: "Outdoor".to_string(),
                scheduled_at: None,
                price: 35.0,
                requires_reservation: true,
                destination_ids: vec![destination_id],
            })
            .await
            .unwrap();

        assert!(activity.average_rating.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_amenity_is_conflict() {
        let mut mock_repo = MockAmenityRepository::new();
        mock_repo
            .expect_create()
            .returning(|_| Err(RepositoryError::Conflict("amenities_pkey".to_string())));

        let usecase = AmenitiesUseCase::new(mock_repo);
        let result = usecase.create_amenity("Wifi".to_string()).await;

        assert!(matches!(result, Err(UsecaseError::Conflict(_))));
    }
}
