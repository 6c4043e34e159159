use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct City {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub climate: Option<String>,
    pub terrain: Option<String>,
    pub cost_of_living: f64,
}

impl City {
    pub fn new(
        name: String,
        location: String,
        climate: Option<String>,
        terrain: Option<String>,
        cost_of_living: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            location,
            climate,
            terrain,
            cost_of_living,
        }
    }
}
