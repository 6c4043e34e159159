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
use crate::usecase::accommodations::AccommodationInput;
use crate::usecase::error::UsecaseError;
use crate::AppState;

#[derive(Deserialize, Validate)]
pub struct AccommodationRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub kind: String,
    #[validate(length(min = 1, max = 100))]
    pub location: String,
    #[validate(range(min = 0.0, max = 99_999_999.99))]
    pub price: f64,
    pub city_id: Uuid,
    #[validate(length(max = 500))]
    pub image_path: Option<String>,
    #[serde(default)]
    pub amenity_ids: Vec<Uuid>,
}

impl From<AccommodationRequest> for AccommodationInput {
    fn from(request: AccommodationRequest) -> Self {
        Self {
            name: request.name,
            kind: request.kind,
            location: request.location,
            price: request.price,
            city_id: request.city_id,
            image_path: request.image_path,
            amenity_ids: request.amenity_ids,
        }
    }
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn list_accommodations(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, UsecaseError> {
    let accommodations = state.accommodations_usecase.list_accommodations().await?;
    Ok((StatusCode::OK, Json(accommodations)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn get_accommodation(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(accommodation_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!(%accommodation_id, "handling accommodation details request");

    let details = state
        .accommodations_usecase
        .details(user.user_id, accommodation_id)
        .await?;
    Ok((StatusCode::OK, Json(details)))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn create_accommodation(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<AccommodationRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    if let Err(validation_errors) = payload.validate() {
        tracing::warn!(?validation_errors, "validation failed");
        return Err(UsecaseError::Validation(format!("{:?}", validation_errors)));
    }

    let accommodation = state
        .accommodations_usecase
        .create_accommodation(payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(accommodation)))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn update_accommodation(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(accommodation_id): Path<Uuid>,
    Json(payload): Json<AccommodationRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    if let Err(validation_errors) = payload.validate() {
        tracing::warn!(?validation_errors, "validation failed");
        return Err(UsecaseError::Validation(format!("{:?}", validation_errors)));
    }

    let accommodation = state
        .accommodations_usecase
        .update_accommodation(accommodation_id, payload.into())
        .await?;
    Ok((StatusCode::OK, Json(accommodation)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn delete_accommodation(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(accommodation_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    state
        .accommodations_usecase
        .delete_accommodation(accommodation_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
