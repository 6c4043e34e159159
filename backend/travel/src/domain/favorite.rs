use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Favorite {
    pub user_id: Uuid,
    pub destination_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    pub fn new(user_id: Uuid, destination_id: Uuid) -> Self {
        Self {
            user_id,
            destination_id,
            created_at: Utc::now(),
        }
    }
}
