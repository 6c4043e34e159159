use serde::Serialize;

use crate::domain::rating::average_rating;
use crate::domain::ranking::compare_average;
use crate::domain::review::Rating;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct CityDestinationCount {
    pub city_name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ReviewerCount {
    pub user_name: String,
    pub review_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityRating {
    pub city_name: String,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct DestinationRating {
    pub destination_name: String,
    pub average_rating: Option<f64>,
}

/// One review left on a destination of `city_name`. Destinations nobody
/// reviewed contribute a single entry with no rating.
#[derive(Debug, Clone, PartialEq)]
pub struct CityReview {
    pub city_name: String,
    pub rating: Option<Rating>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HomeStats {
    pub destinations_per_city: Vec<CityDestinationCount>,
    pub top_reviewers: Vec<ReviewerCount>,
    pub city_ratings: Vec<CityRating>,
    pub destination_ratings: Vec<DestinationRating>,
}

/// Averages every review of each city's destinations, so a destination with
/// many reviews weighs more than one with a single review. Best rated first,
/// unrated cities last.
pub fn city_ratings<I>(reviews: I) -> Vec<CityRating>
where
    I: IntoIterator<Item = CityReview>,
{
    let mut grouped: Vec<(String, Vec<Option<Rating>>)> = Vec::new();
    for review in reviews {
        match grouped.iter_mut().find(|(name, _)| *name == review.city_name) {
            Some((_, ratings)) => ratings.push(review.rating),
            None => grouped.push((review.city_name, vec![review.rating])),
        }
    }

    let mut ratings: Vec<CityRating> = grouped
        .into_iter()
        .map(|(city_name, ratings)| CityRating {
            city_name,
            average_rating: average_rating(ratings),
        })
        .collect();
    ratings.sort_by(|a, b| {
        compare_average(b.average_rating, a.average_rating)
            .then_with(|| a.city_name.cmp(&b.city_name))
    });
    ratings
}
