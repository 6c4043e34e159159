use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::delivery::http::v1::middleware::{require_admin, AuthenticatedUser};
use crate::usecase::error::UsecaseError;
use crate::AppState;

#[derive(Deserialize, Validate)]
pub struct PreferenceRequest {
    #[validate(length(min = 1, max = 50))]
    pub content: String,
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn overview(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, UsecaseError> {
    let overview = state.preferences_usecase.overview(user.user_id).await?;
    Ok((StatusCode::OK, Json(overview)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn add_to_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(preference_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    state
        .preferences_usecase
        .add_to_user(user.user_id, preference_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn remove_from_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(preference_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    state
        .preferences_usecase
        .remove_from_user(user.user_id, preference_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn list_preferences(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    let preferences = state.preferences_usecase.list_preferences().await?;
    Ok((StatusCode::OK, Json(preferences)))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn create_preference(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<PreferenceRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    if let Err(validation_errors) = payload.validate() {
        tracing::warn!(?validation_errors, "validation failed");
        return Err(UsecaseError::Validation(format!("{:?}", validation_errors)));
    }

    let preference = state
        .preferences_usecase
        .create_preference(payload.content)
        .await?;
    Ok((StatusCode::CREATED, Json(preference)))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn update_preference(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(preference_id): Path<Uuid>,
    Json(payload): Json<PreferenceRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    if let Err(validation_errors) = payload.validate() {
        tracing::warn!(?validation_errors, "validation failed");
        return Err(UsecaseError::Validation(format!("{:?}", validation_errors)));
    }

    let preference = state
        .preferences_usecase
        .update_preference(preference_id, payload.content)
        .await?;
    Ok((StatusCode::OK, Json(preference)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn delete_preference(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(preference_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    state
        .preferences_usecase
        .delete_preference(preference_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
