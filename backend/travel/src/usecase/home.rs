use serde::Serialize;
use uuid::Uuid;

use crate::domain::accommodation::Accommodation;
use crate::domain::destination::Destination;
use crate::domain::ranking::{
    rank_accommodations, rank_destinations, RankedAccommodation, RankedDestination, UserProfile,
};
use crate::domain::stats::{city_ratings, HomeStats};
use crate::usecase::contracts::{
    AccommodationRepository, DestinationRepository, EngagementRepository, PreferenceRepository,
    StatsRepository,
};
use crate::usecase::error::UsecaseError;

/// Users shown in the top reviewers table.
pub const TOP_REVIEWERS: i64 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub destinations: Vec<RankedDestination>,
    pub accommodations: Vec<RankedAccommodation>,
    pub favorite_ids: Vec<Uuid>,
    pub stats: HomeStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub destinations: Vec<Destination>,
    pub accommodations: Vec<Accommodation>,
}

pub struct HomeUseCase<D, A, P, E, S>
where
    D: DestinationRepository,
    A: AccommodationRepository,
    P: PreferenceRepository,
    E: EngagementRepository,
    S: StatsRepository,
{
    destination_repository: D,
    accommodation_repository: A,
    preference_repository: P,
    engagement_repository: E,
    stats_repository: S,
}

impl<D, A, P, E, S> HomeUseCase<D, A, P, E, S>
where
    D: DestinationRepository,
    A: AccommodationRepository,
    P: PreferenceRepository,
    E: EngagementRepository,
    S: StatsRepository,
{
    pub fn new(
        destination_repository: D,
        accommodation_repository: A,
        preference_repository: P,
        engagement_repository: E,
        stats_repository: S,
    ) -> Self {
        Self {
            destination_repository,
            accommodation_repository,
            preference_repository,
            engagement_repository,
            stats_repository,
        }
    }

    async fn profile(&self, user_id: Uuid) -> Result<(UserProfile, Vec<Uuid>), UsecaseError> {
        let preferences = self.preference_repository.find_by_user(user_id).await?;
        let favorite_ids = self.engagement_repository.favorite_ids(user_id).await?;

        let profile = UserProfile::new(
            preferences.into_iter().map(|p| p.content),
            favorite_ids.iter().copied(),
        );
        Ok((profile, favorite_ids))
    }

    /// Personalised home page for `user_id`.
    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn home(&self, user_id: Uuid) -> Result<HomePage, UsecaseError> {
        tracing::debug!("building home page");

        let (profile, favorite_ids) = self.profile(user_id).await?;

        let destinations = rank_destinations(
            &profile,
            self.destination_repository.list_for_ranking().await?,
        );
        let accommodations = rank_accommodations(
            &profile,
            self.accommodation_repository.list_for_ranking().await?,
        );

        let stats = HomeStats {
            destinations_per_city: self.stats_repository.destinations_per_city().await?,
            top_reviewers: self.stats_repository.top_reviewers(TOP_REVIEWERS).await?,
            city_ratings: city_ratings(self.stats_repository.city_reviews().await?),
            destination_ratings: self.stats_repository.destination_ratings().await?,
        };

        tracing::debug!(
            preferences = profile.preferences.len(),
            destinations = destinations.len(),
            accommodations = accommodations.len(),
            "home page ranked"
        );
        Ok(HomePage {
            destinations,
            accommodations,
            favorite_ids,
            stats,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<SearchResults, UsecaseError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchResults {
                query: String::new(),
                destinations: Vec::new(),
                accommodations: Vec::new(),
            });
        }

        let destinations = self.destination_repository.search(query).await?;
        let accommodations = self.accommodation_repository.search(query).await?;

        tracing::debug!(
            destinations = destinations.len(),
            accommodations = accommodations.len(),
            "search finished"
        );
        Ok(SearchResults {
            query: query.to_string(),
            destinations,
            accommodations,
        })
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::preference::Preference;
    use crate::domain::ranking::{AccommodationListing, DestinationListing};
    use crate::domain::review::Rating;
    use crate::domain::stats::{CityReview, DestinationRating, ReviewerCount};
    use crate::usecase::contracts::{
        MockAccommodationRepository, MockDestinationRepository, MockEngagementRepository,
        MockPreferenceRepository, MockStatsRepository,
    };

    fn listing(name: &str, average_rating: Option<f64>, tags: &[&str]) -> DestinationListing {
        let mut destination = Destination::new(
            name.to_string(),
            None,
            Uuid::new_v4(),
            "Somewhere".to_string(),
            String::new(),
        );
        destination.average_rating = average_rating;
        DestinationListing {
            destination,
            city_name: "City".to_string(),
            attraction_tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn stay(name: &str, amenities: &[&str]) -> AccommodationListing {
        AccommodationListing {
            accommodation: Accommodation::new(
                name.to_string(),
                "Hotel".to_string(),
                "Somewhere".to_string(),
                90.0,
                Uuid::new_v4(),
                String::new(),
            ),
            city_name: "City".to_string(),
            amenity_names: amenities.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn empty_stats() -> MockStatsRepository {
        let mut stats = MockStatsRepository::new();
        stats.expect_destinations_per_city().returning(|| Ok(vec![]));
        stats.expect_top_reviewers().returning(|_| Ok(vec![]));
        stats.expect_city_reviews().returning(|| Ok(vec![]));
        stats.expect_destination_ratings().returning(|| Ok(vec![]));
        stats
    }

    #[tokio::test]
    async fn test_home_ranks_by_preferences_favorites_and_rating() {
        let mut destinations = MockDestinationRepository::new();
        let mut accommodations = MockAccommodationRepository::new();
        let mut preferences = MockPreferenceRepository::new();
        let mut engagement = MockEngagementRepository::new();
        let user_id = Uuid::new_v4();

        let a = listing("A", Some(4.0), &["a", "b", "c"]);
        let b = listing("B", Some(4.5), &["a", "b", "c"]);
        let c = listing("C", Some(1.0), &["a", "b"]);
        let favorite = c.destination.id;
        let listings = vec![a, b, c];
        let stays = vec![stay("plain", &["parking"]), stay("spa", &["a", "b"])];

        preferences
            .expect_find_by_user()
            .with(eq(user_id))
            .times(1)
            .returning(|_| {
                Ok(["a", "b", "c"]
                    .iter()
                    .map(|t| Preference::new(t.to_string()))
                    .collect())
            });
        engagement
            .expect_favorite_ids()
            .with(eq(user_id))
            .times(1)
            .returning(move |_| Ok(vec![favorite]));
        destinations
            .expect_list_for_ranking()
            .times(1)
            .returning(move || Ok(listings.clone()));
        accommodations
            .expect_list_for_ranking()
            .times(1)
            .returning(move || Ok(stays.clone()));

        let usecase = HomeUseCase::new(destinations, accommodations, preferences, engagement, empty_stats());
        let page = usecase.home(user_id).await.unwrap();

        let order: Vec<&str> = page.destinations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(order, vec!["C", "B", "A"]);
        assert_eq!(page.destinations[0].priority, 7);
        assert_eq!(page.favorite_ids, vec![favorite]);

        let stay_order: Vec<&str> = page.accommodations.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(stay_order, vec!["spa", "plain"]);
    }

    #[tokio::test]
    async fn test_home_stats_top_reviewers_and_ratings() {
        let mut destinations = MockDestinationRepository::new();
        let mut accommodations = MockAccommodationRepository::new();
        let mut preferences = MockPreferenceRepository::new();
        let mut engagement = MockEngagementRepository::new();
        let mut stats = MockStatsRepository::new();

        preferences.expect_find_by_user().returning(|_| Ok(vec![]));
        engagement.expect_favorite_ids().returning(|_| Ok(vec![]));
        destinations.expect_list_for_ranking().returning(|| Ok(vec![]));
        accommodations.expect_list_for_ranking().returning(|| Ok(vec![]));
        stats.expect_destinations_per_city().returning(|| Ok(vec![]));
        stats
            .expect_top_reviewers()
            .with(eq(TOP_REVIEWERS))
            .times(1)
            .returning(|_| {
                Ok(vec![
                    ReviewerCount {
                        user_name: "Ada".to_string(),
                        review_count: 12,
                    },
                    ReviewerCount {
                        user_name: "Bo".to_string(),
                        review_count: 0,
                    },
                ])
            });
        stats.expect_city_reviews().times(1).returning(|| {
            let review = |city: &str, rating: i16| CityReview {
                city_name: city.to_string(),
                rating: Some(Rating::new(rating).unwrap()),
            };
            Ok(vec![
                review("Porto", 5),
                review("Porto", 1),
                review("Porto", 1),
                review("Porto", 1),
                review("Braga", 3),
            ])
        });
        stats.expect_destination_ratings().times(1).returning(|| {
            Ok(vec![
                DestinationRating {
                    destination_name: "Ribeira".to_string(),
                    average_rating: Some(5.0),
                },
                DestinationRating {
                    destination_name: "Foz".to_string(),
                    average_rating: None,
                },
            ])
        });

        let usecase = HomeUseCase::new(destinations, accommodations, preferences, engagement, stats);
        let page = usecase.home(Uuid::new_v4()).await.unwrap();

        assert!(page.destinations.is_empty());
        assert_eq!(page.stats.top_reviewers.len(), 2);
        assert_eq!(page.stats.top_reviewers[0].review_count, 12);
        assert_eq!(page.stats.top_reviewers[1].review_count, 0);

        assert_eq!(page.stats.city_ratings[0].city_name, "Braga");
        assert_eq!(page.stats.city_ratings[0].average_rating, Some(3.0));
        assert_eq!(page.stats.city_ratings[1].city_name, "Porto");
        assert_eq!(page.stats.city_ratings[1].average_rating, Some(2.0));

        assert_eq!(page.stats.destination_ratings.len(), 2);
        assert_eq!(page.stats.destination_ratings[0].destination_name, "Ribeira");
        assert_eq!(page.stats.destination_ratings[1].average_rating, None);
    }

    #[tokio::test]
    async fn test_blank_search_skips_store() {
        let mut destinations = MockDestinationRepository::new();
        let mut accommodations = MockAccommodationRepository::new();
        destinations.expect_search().never();
        accommodations.expect_search().never();

        let usecase = HomeUseCase::new(
            destinations,
            accommodations,
            MockPreferenceRepository::new(),
            MockEngagementRepository::new(),
            MockStatsRepository::new(),
        );
        let results = usecase.search("   ").await.unwrap();

        assert!(results.destinations.is_empty());
        assert!(results.accommodations.is_empty());
    }

    #[tokio::test]
    async fn test_search_queries_both_catalogs() {
        let mut destinations = MockDestinationRepository::new();
        let mut accommodations = MockAccommodationRepository::new();
        destinations
            .expect_search()
            .withf(|query| query == "sea")
            .times(1)
            .returning(|_| Ok(vec![listing("Seaside", None, &[]).destination]));
        accommodations
            .expect_search()
            .withf(|query| query == "sea")
            .times(1)
            .returning(|_| Ok(vec![]));

        let usecase = HomeUseCase::new(
            destinations,
            accommodations,
            MockPreferenceRepository::new(),
            MockEngagementRepository::new(),
            MockStatsRepository::new(),
        );
        let results = usecase.search(" sea ").await.unwrap();

        assert_eq!(results.query, "sea");
        assert_eq!(results.destinations[0].name, "Seaside");
    }
}
