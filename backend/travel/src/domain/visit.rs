use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::destination::Destination;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Visit {
    pub user_id: Uuid,
    pub destination_id: Uuid,
    pub visited_at: DateTime<Utc>,
}

impl Visit {
    pub fn new(user_id: Uuid, destination_id: Uuid) -> Self {
        Self {
            user_id,
            destination_id,
            visited_at: Utc::now(),
        }
    }
}

/// A user's travel history: visited destinations and which of them were reviewed.
#[derive(Debug, Clone, Serialize)]
pub struct PastTravels {
    pub destinations: Vec<Destination>,
    pub reviewed_destination_ids: Vec<Uuid>,
}
