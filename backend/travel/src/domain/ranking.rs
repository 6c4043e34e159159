//! Home page ordering of destinations and accommodations for one user.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::accommodation::Accommodation;
use crate::domain::destination::Destination;

/// Added to a destination's priority when the user has favorited it.
pub const FAVORITE_BONUS: u32 = 5;
/// Number of destinations kept on the home page.
pub const TOP_DESTINATIONS: usize = 10;

/// What the ranker needs to know about the current user.
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub preferences: HashSet<String>,
    pub favorites: HashSet<Uuid>,
}

impl UserProfile {
    pub fn new<P, F>(preferences: P, favorites: F) -> Self
    where
        P: IntoIterator<Item = String>,
        F: IntoIterator<Item = Uuid>,
    {
        Self {
            preferences: preferences.into_iter().collect(),
            favorites: favorites.into_iter().collect(),
        }
    }

    /// Number of `tags` equal to one of the user's preference contents.
    fn matching<'a, I>(&self, tags: I) -> u32
    where
        I: IntoIterator<Item = &'a String>,
    {
        tags.into_iter()
            .filter(|tag| self.preferences.contains(tag.as_str()))
            .count() as u32
    }
}

/// A destination with its attraction tag contents.
#[derive(Debug, Clone)]
pub struct DestinationListing {
    pub destination: Destination,
    pub city_name: String,
    pub attraction_tags: Vec<String>,
}

/// An accommodation with its amenity names.
#[derive(Debug, Clone)]
pub struct AccommodationListing {
    pub accommodation: Accommodation,
    pub city_name: String,
    pub amenity_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedDestination {
    pub id: Uuid,
    pub name: String,
    pub city_name: String,
    pub description: Option<String>,
    pub location: String,
    pub image_path: String,
    pub average_rating: Option<f64>,
    pub priority: u32,
    pub is_favorited: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedAccommodation {
    pub id: Uuid,
    pub name: String,
    pub city_name: String,
    pub price: f64,
    pub image_path: String,
    pub average_rating: Option<f64>,
    pub priority: u32,
}

/// Unrated entities sort below every rated one, including a rated 0.0.
pub(crate) fn compare_average(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Orders destinations by preference overlap plus favorite bonus, then by
/// average rating, and keeps the first [`TOP_DESTINATIONS`].
pub fn rank_destinations(
    profile: &UserProfile,
    listings: Vec<DestinationListing>,
) -> Vec<RankedDestination> {
    let mut ranked: Vec<RankedDestination> = listings
        .into_iter()
        .map(|listing| {
            let destination = listing.destination;
            let is_favorited = profile.favorites.contains(&destination.id);
            let mut priority = profile.matching(&listing.attraction_tags);
            if is_favorited {
                priority += FAVORITE_BONUS;
            }

            RankedDestination {
                id: destination.id,
                name: destination.name,
                city_name: listing.city_name,
                description: destination.description,
                location: destination.location,
                image_path: destination.image_path,
                average_rating: destination.average_rating,
                priority,
                is_favorited,
            }
        })
        .collect();

    // sort_by is stable: equal keys keep input order
    ranked.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| compare_average(b.average_rating, a.average_rating))
    });
    ranked.truncate(TOP_DESTINATIONS);
    ranked
}

/// Orders accommodations by the number of amenities matching a preference.
/// Rating plays no part and nothing is dropped.
pub fn rank_accommodations(
    profile: &UserProfile,
    listings: Vec<AccommodationListing>,
) -> Vec<RankedAccommodation> {
    let mut ranked: Vec<RankedAccommodation> = listings
        .into_iter()
        .map(|listing| {
            let accommodation = listing.accommodation;
            RankedAccommodation {
                id: accommodation.id,
                name: accommodation.name,
                city_name: listing.city_name,
                price: accommodation.price,
                image_path: accommodation.image_path,
                average_rating: accommodation.average_rating,
                priority: profile.matching(&listing.amenity_names),
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.priority.cmp(&a.priority));
    ranked
}
