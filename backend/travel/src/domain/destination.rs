use serde::Serialize;
use uuid::Uuid;

use crate::domain::activity::Activity;
use crate::domain::city::City;
use crate::domain::preference::Preference;
use crate::domain::review::ReviewWithAuthor;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Destination {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub city_id: Uuid,
    pub location: String,
    pub image_path: String,
    pub average_rating: Option<f64>,
}

impl Destination {
    pub fn new(
        name: String,
        description: Option<String>,
        city_id: Uuid,
        location: String,
        image_path: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            city_id,
            location,
            image_path,
            average_rating: None,
        }
    }

    pub fn update(
        &mut self,
        name: String,
        description: Option<String>,
        city_id: Uuid,
        location: String,
        image_path: Option<String>,
    ) {
        self.name = name;
        self.description = description;
        self.city_id = city_id;
        self.location = location;
        if let Some(path) = image_path {
            self.image_path = path;
        }
    }
}

/// Everything the destination page shows, including the viewer's state.
#[derive(Debug, Clone, Serialize)]
pub struct DestinationDetails {
    #[serde(flatten)]
    pub destination: Destination,
    pub city: City,
    pub attractions: Vec<Preference>,
    pub activities: Vec<Activity>,
    pub reviews: Vec<ReviewWithAuthor>,
    pub visited: bool,
    pub has_reviewed: bool,
    pub is_favorited: bool,
    pub can_leave_review: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_starts_unrated() {
        let destination = Destination::new(
            "Old Town".to_string(),
            Some("Cobbled streets".to_string()),
            Uuid::new_v4(),
            "Centre".to_string(),
            String::new(),
        );

        assert!(destination.average_rating.is_none());
        assert_eq!(destination.name, "Old Town");
    }

    #[test]
    fn test_update_keeps_image_when_not_given() {
        let city_id = Uuid::new_v4();
        let mut destination = Destination::new(
            "Pier".to_string(),
            None,
            city_id,
            "Harbour".to_string(),
            "/images/pier.png".to_string(),
        );

        destination.update("Pier 39".to_string(), None, city_id, "Harbour".to_string(), None);

        assert_eq!(destination.name, "Pier 39");
        assert_eq!(destination.image_path, "/images/pier.png");
    }
}
