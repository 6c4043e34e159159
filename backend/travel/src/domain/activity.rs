use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Activity {
    pub id: Uuid,
    pub name: String,
    pub kind: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub price: f64,
    pub requires_reservation: bool,
    pub average_rating: Option<f64>,
}

impl Activity {
    pub fn new(
        name: String,
        kind: String,
        scheduled_at: Option<DateTime<Utc>>,
        price: f64,
        requires_reservation: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            kind,
            scheduled_at,
            price,
            requires_reservation,
            average_rating: None,
        }
    }
}
