use serde::Serialize;
use uuid::Uuid;

/// An interest tag such as "hiking". Unique by content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, sqlx::FromRow)]
pub struct Preference {
    pub id: Uuid,
    pub content: String,
}

impl Preference {
    pub fn new(content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PreferenceOverview {
    pub selected: Vec<Preference>,
    pub available: Vec<Preference>,
}

impl PreferenceOverview {
    /// Splits `all` into the ones the user picked and the rest.
    pub fn split(all: Vec<Preference>, selected: Vec<Preference>) -> Self {
        let available = all
            .into_iter()
            .filter(|p| !selected.iter().any(|s| s.id == p.id))
            .collect();
        Self { selected, available }
    }
}
