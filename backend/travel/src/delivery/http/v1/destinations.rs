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
use crate::usecase::destinations::DestinationInput;
use crate::usecase::error::UsecaseError;
use crate::AppState;

#[derive(Deserialize, Validate)]
pub struct DestinationRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub city_id: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub location: String,
    #[validate(length(max = 500))]
    pub image_path: Option<String>,
    #[serde(default)]
    pub attraction_ids: Vec<Uuid>,
}

impl From<DestinationRequest> for DestinationInput {
    fn from(request: DestinationRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            city_id: request.city_id,
            location: request.location,
            image_path: request.image_path,
            attraction_ids: request.attraction_ids,
        }
    }
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn list_destinations(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, UsecaseError> {
    let destinations = state.destinations_usecase.list_destinations().await?;

    tracing::debug!(count = destinations.len(), "destinations listed");
    Ok((StatusCode::OK, Json(destinations)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn get_destination(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(destination_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!(%destination_id, "handling destination details request");

    let details = state
        .destinations_usecase
        .details(user.user_id, destination_id)
        .await?;
    Ok((StatusCode::OK, Json(details)))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn create_destination(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<DestinationRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    if let Err(validation_errors) = payload.validate() {
        tracing::warn!(?validation_errors, "validation failed");
        return Err(UsecaseError::Validation(format!("{:?}", validation_errors)));
    }

    let destination = state
        .destinations_usecase
        .create_destination(payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(destination)))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn update_destination(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(destination_id): Path<Uuid>,
    Json(payload): Json<DestinationRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    if let Err(validation_errors) = payload.validate() {
        tracing::warn!(?validation_errors, "validation failed");
        return Err(UsecaseError::Validation(format!("{:?}", validation_errors)));
    }

    let destination = state
        .destinations_usecase
        .update_destination(destination_id, payload.into())
        .await?;
    Ok((StatusCode::OK, Json(destination)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn delete_destination(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(destination_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    state
        .destinations_usecase
        .delete_destination(destination_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
