use uuid::Uuid;

use crate::domain::preference::{Preference, PreferenceOverview};
use crate::repository::errors::RepositoryError;
use crate::usecase::catalog::not_found;
use crate::usecase::contracts::PreferenceRepository;
use crate::usecase::error::UsecaseError;

pub struct PreferencesUseCase<P>
where
    P: PreferenceRepository,
{
    preference_repository: P,
}

impl<P> PreferencesUseCase<P>
where
    P: PreferenceRepository,
{
    pub fn new(preference_repository: P) -> Self {
        Self { preference_repository }
    }

    #[tracing::instrument(skip(self))]
    pub async fn create_preference(&self, content: String) -> Result<Preference, UsecaseError> {
        let preference = Preference::new(content);
        if preference.content.is_empty() {
            return Err(UsecaseError::Validation("Preference cannot be empty".to_string()));
        }

        self.preference_repository
            .create(&preference)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    UsecaseError::Conflict("This preference already exists".to_string())
                }
                other => other.into(),
            })?;

        tracing::info!(preference_id = %preference.id, "preference created");
        Ok(preference)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_preferences(&self) -> Result<Vec<Preference>, UsecaseError> {
        Ok(self.preference_repository.find_all().await?)
    }

    #[tracing::instrument(skip(self), fields(preference_id = %id))]
    pub async fn update_preference(&self, id: Uuid, content: String) -> Result<Preference, UsecaseError> {
        let mut preference = self
            .preference_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Preference".to_string()))?;
        preference.content = content.trim().to_string();

        self.preference_repository.update(&preference).await?;
        Ok(preference)
    }

    #[tracing::instrument(skip(self), fields(preference_id = %id))]
    pub async fn delete_preference(&self, id: Uuid) -> Result<(), UsecaseError> {
        self.preference_repository
            .delete(id)
            .await
            .map_err(not_found("Preference"))?;

        tracing::info!(preference_id = %id, "preference deleted");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn overview(&self, user_id: Uuid) -> Result<PreferenceOverview, UsecaseError> {
        let all = self.preference_repository.find_all().await?;
        let selected = self.preference_repository.find_by_user(user_id).await?;
        Ok(PreferenceOverview::split(all, selected))
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, preference_id = %preference_id))]
    pub async fn add_to_user(&self, user_id: Uuid, preference_id: Uuid) -> Result<(), UsecaseError> {
        tracing::debug!("adding preference to user");

        self.preference_repository
            .find_by_id(preference_id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Preference".to_string()))?;

        self.preference_repository
            .add_to_user(user_id, preference_id)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    UsecaseError::Conflict("Preference already added".to_string())
                }
                other => other.into(),
            })?;

        tracing::info!(user_id = %user_id, preference_id = %preference_id, "preference added");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, preference_id = %preference_id))]
    pub async fn remove_from_user(&self, user_id: Uuid, preference_id: Uuid) -> Result<(), UsecaseError> {
        self.preference_repository
            .remove_from_user(user_id, preference_id)
            .await
            .map_err(not_found("Preference"))?;

        tracing::info!(user_id = %user_id, preference_id = %preference_id, "preference removed");
        Ok(())
    }
}
