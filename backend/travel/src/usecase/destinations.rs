use uuid::Uuid;

use crate::domain::destination::{Destination, DestinationDetails};
use crate::domain::review::ReviewTarget;
use crate::usecase::catalog::not_found;
use crate::usecase::contracts::{
    CityRepository, DestinationRepository, EngagementRepository, ReviewRepository,
};
use crate::usecase::error::UsecaseError;

#[derive(Debug, Clone)]
pub struct DestinationInput {
    pub name: String,
    pub description: Option<String>,
    pub city_id: Uuid,
    pub location: String,
    pub image_path: Option<String>,
    pub attraction_ids: Vec<Uuid>,
}

pub struct DestinationsUseCase<D, C, R, E>
where
    D: DestinationRepository,
    C: CityRepository,
    R: ReviewRepository,
    E: EngagementRepository,
{
    destination_repository: D,
    city_repository: C,
    review_repository: R,
    engagement_repository: E,
}

impl<D, C, R, E> DestinationsUseCase<D, C, R, E>
where
    D: DestinationRepository,
    C: CityRepository,
    R: ReviewRepository,
    E: EngagementRepository,
{
    pub fn new(
        destination_repository: D,
        city_repository: C,
        review_repository: R,
        engagement_repository: E,
    ) -> Self {
        Self {
            destination_repository,
            city_repository,
            review_repository,
            engagement_repository,
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
    pub async fn create_destination(&self, input: DestinationInput) -> Result<Destination, UsecaseError> {
        tracing::debug!("creating destination");

        self.ensure_city(input.city_id).await?;

        let destination = Destination::new(
            input.name,
            input.description,
            input.city_id,
            input.location,
            input.image_path.unwrap_or_default(),
        );
        self.destination_repository
            .create(&destination, &input.attraction_ids)
            .await?;

        tracing::info!(destination_id = %destination.id, "destination created");
        Ok(destination)
    }

    #[tracing::instrument(skip(self), fields(destination_id = %id))]
    pub async fn get_destination(&self, id: Uuid) -> Result<Destination, UsecaseError> {
        self.destination_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Destination".to_string()))
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_destinations(&self) -> Result<Vec<Destination>, UsecaseError> {
        Ok(self.destination_repository.find_all().await?)
    }

    #[tracing::instrument(skip(self, input), fields(destination_id = %id))]
    pub async fn update_destination(
        &self,
        id: Uuid,
        input: DestinationInput,
    ) -> Result<Destination, UsecaseError> {
        let mut destination = self.get_destination(id).await?;
        if destination.city_id != input.city_id {
            self.ensure_city(input.city_id).await?;
        }

        destination.update(
            input.name,
            input.description,
            input.city_id,
            input.location,
            input.image_path,
        );
        self.destination_repository
            .update(&destination, &input.attraction_ids)
            .await
            .map_err(not_found("Destination"))?;

        tracing::info!(destination_id = %id, "destination updated");
        Ok(destination)
    }

    #[tracing::instrument(skip(self), fields(destination_id = %id))]
    pub async fn delete_destination(&self, id: Uuid) -> Result<(), UsecaseError> {
        self.destination_repository
            .delete(id)
            .await
            .map_err(not_found("Destination"))?;

        tracing::info!(destination_id = %id, "destination deleted");
        Ok(())
    }

    /// The destination page as seen by `user_id`.
    #[tracing::instrument(skip(self), fields(destination_id = %id, user_id = %user_id))]
    pub async fn details(&self, user_id: Uuid, id: Uuid) -> Result<DestinationDetails, UsecaseError> {
        tracing::debug!("loading destination details");

        let destination = self.get_destination(id).await?;
        let city = self
            .city_repository
            .find_by_id(destination.city_id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("City".to_string()))?;

        let target = ReviewTarget::Destination(id);
        let attractions = self.destination_repository.find_attractions(id).await?;
        let activities = self.destination_repository.find_activities(id).await?;
        let reviews = self.review_repository.find_by_target(target).await?;

        let visited = self.engagement_repository.has_visited(user_id, id).await?;
        let is_favorited = self.engagement_repository.is_favorite(user_id, id).await?;
        let has_reviewed = reviews.iter().any(|r| r.review.user_id == user_id);

        Ok(DestinationDetails {
            destination,
            city,
            attractions,
            activities,
            reviews,
            visited,
            has_reviewed,
            is_favorited,
            can_leave_review: visited && !has_reviewed,
        })
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::city::City;
    use crate::domain::review::{Rating, Review, ReviewWithAuthor};
    use crate::usecase::contracts::{
        MockCityRepository, MockDestinationRepository, MockEngagementRepository, MockReviewRepository,
    };

    struct Mocks {
        destinations: MockDestinationRepository,
        cities: MockCityRepository,
        reviews: MockReviewRepository,
        engagement: MockEngagementRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                destinations: MockDestinationRepository::new(),
                cities: MockCityRepository::new(),
                reviews: MockReviewRepository::new(),
                engagement: MockEngagementRepository::new(),
            }
        }

        fn into_usecase(
            self,
        ) -> DestinationsUseCase<
            MockDestinationRepository,
            MockCityRepository,
            MockReviewRepository,
            MockEngagementRepository,
        > {
            DestinationsUseCase::new(self.destinations, self.cities, self.reviews, self.engagement)
        }
    }

    fn city() -> City {
        City::new("Lisbon".to_string(), "Portugal".to_string(), None, None, 1500.0)
    }

    fn input(city_id: Uuid) -> DestinationInput {
        DestinationInput {
            name: "Belem Tower".to_string(),
            description: Some("Fortified tower".to_string()),
            city_id,
            location: "Belem".to_string(),
            image_path: None,
            attraction_ids: vec![Uuid::new_v4()],
        }
    }

    /// Wires a destination page where the user has or has not visited and reviewed.
    fn details_mocks(user_id: Uuid, visited: bool, reviewed: bool) -> (Mocks, Uuid) {
        let mut mocks = Mocks::new();
        let city = city();
        let destination = Destination::new(
            "Belem Tower".to_string(),
            None,
            city.id,
            "Belem".to_string(),
            String::new(),
        );
        let destination_id = destination.id;
        let author = if reviewed { user_id } else { Uuid::new_v4() };

        mocks
            .destinations
            .expect_find_by_id()
            .with(eq(destination_id))
            .returning(move |_| Ok(Some(destination.clone())));
        mocks
            .cities
            .expect_find_by_id()
            .returning(move |_| Ok(Some(city.clone())));
        mocks.destinations.expect_find_attractions().returning(|_| Ok(vec![]));
        mocks.destinations.expect_find_activities().returning(|_| Ok(vec![]));
        mocks.reviews.expect_find_by_target().returning(move |target| {
            Ok(vec![ReviewWithAuthor {
                review: Review::new(author, target, Rating::new(5).ok(), None).unwrap(),
                author_name: "Someone".to_string(),
            }])
        });
        mocks
            .engagement
            .expect_has_visited()
            .with(eq(user_id), eq(destination_id))
            .returning(move |_, _| Ok(visited));
        mocks.engagement.expect_is_favorite().returning(|_, _| Ok(true));

        (mocks, destination_id)
    }

    #[tokio::test]
    async fn test_create_destination_requires_city() {
        let mut mocks = Mocks::new();
        mocks.cities.expect_find_by_id().returning(|_| Ok(None));
        mocks.destinations.expect_create().never();

        let result = mocks.into_usecase().create_destination(input(Uuid::new_v4())).await;

        assert!(matches!(result, Err(UsecaseError::NotFound(what)) if what == "City"));
    }

    #[tokio::test]
    async fn test_create_destination_starts_unrated() {
        let mut mocks = Mocks::new();
        let city = city();
        let city_id = city.id;
        mocks
            .cities
            .expect_find_by_id()
            .with(eq(city_id))
            .returning(move |_| Ok(Some(city.clone())));
        mocks
            .destinations
            .expect_create()
            .withf(|destination, attractions| {
                destination.average_rating.is_none() && attractions.len() == 1
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let destination = mocks.into_usecase().create_destination(input(city_id)).await.unwrap();

        assert_eq!(destination.name, "Belem Tower");
        assert_eq!(destination.image_path, "");
    }

    #[tokio::test]
    async fn test_visitor_without_review_can_leave_one() {
        let user_id = Uuid::new_v4();
        let (mocks, destination_id) = details_mocks(user_id, true, false);

        let details = mocks.into_usecase().details(user_id, destination_id).await.unwrap();

        assert!(details.visited);
        assert!(!details.has_reviewed);
        assert!(details.is_favorited);
        assert!(details.can_leave_review);
    }

    #[tokio::test]
    async fn test_reviewer_cannot_leave_another_review() {
        let user_id = Uuid::new_v4();
        let (mocks, destination_id) = details_mocks(user_id, true, true);

        let details = mocks.into_usecase().details(user_id, destination_id).await.unwrap();

        assert!(details.has_reviewed);
        assert!(!details.can_leave_review);
    }

    #[tokio::test]
    async fn test_unvisited_destination_cannot_be_reviewed() {
        let user_id = Uuid::new_v4();
        let (mocks, destination_id) = details_mocks(user_id, false, false);

        let details = mocks.into_usecase().details(user_id, destination_id).await.unwrap();

        assert!(!details.can_leave_review);
    }

    #[tokio::test]
    async fn test_details_of_missing_destination() {
        let mut mocks = Mocks::new();
        mocks.destinations.expect_find_by_id().returning(|_| Ok(None));

        let result = mocks.into_usecase().details(Uuid::new_v4(), Uuid::new_v4()).await;

        assert!(result.unwrap_err().to_string().contains("Destination not found"));
    }
}
