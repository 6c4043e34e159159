use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::delivery::http::v1::middleware::{require_admin, AuthenticatedUser};
use crate::domain::user::UserProfileView;
use crate::usecase::catalog::{ActivityInput, CityInput};
use crate::usecase::error::UsecaseError;
use crate::AppState;

#[derive(Deserialize, Validate)]
pub struct CityRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub location: String,
    #[validate(length(max = 50))]
    pub climate: Option<String>,
    #[validate(length(max = 50))]
    pub terrain: Option<String>,
    #[validate(range(min = 0.0))]
    pub cost_of_living: f64,
}

impl From<CityRequest> for CityInput {
    fn from(request: CityRequest) -> Self {
        Self {
            name: request.name,
            location: request.location,
            climate: request.climate,
            terrain: request.terrain,
            cost_of_living: request.cost_of_living,
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct ActivityRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub kind: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default)]
    pub requires_reservation: bool,
    #[serde(default)]
    pub destination_ids: Vec<Uuid>,
}

impl From<ActivityRequest> for ActivityInput {
    fn from(request: ActivityRequest) -> Self {
        Self {
            name: request.name,
            kind: request.kind,
            scheduled_at: request.scheduled_at,
            price: request.price,
            requires_reservation: request.requires_reservation,
            destination_ids: request.destination_ids,
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct AmenityRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
}

#[derive(Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email, length(max = 100))]
    pub email: String,
    #[validate(length(min = 8, max = 255))]
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

fn validated<T: Validate>(payload: T) -> Result<T, UsecaseError> {
    if let Err(validation_errors) = payload.validate() {
        tracing::warn!(?validation_errors, "validation failed");
        return Err(UsecaseError::Validation(format!("{:?}", validation_errors)));
    }
    Ok(payload)
}

// Cities

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn list_cities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    let cities = state.cities_usecase.list_cities().await?;
    Ok((StatusCode::OK, Json(cities)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn get_city(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(city_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    let city = state.cities_usecase.get_city(city_id).await?;
    Ok((StatusCode::OK, Json(city)))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn create_city(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<CityRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;
    let payload = validated(payload)?;

    let city = state.cities_usecase.create_city(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(city)))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn update_city(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(city_id): Path<Uuid>,
    Json(payload): Json<CityRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;
    let payload = validated(payload)?;

    let city = state
        .cities_usecase
        .update_city(city_id, payload.into())
        .await?;
    Ok((StatusCode::OK, Json(city)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn delete_city(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(city_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    state.cities_usecase.delete_city(city_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Activities

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn list_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    let activities = state.activities_usecase.list_activities().await?;
    Ok((StatusCode::OK, Json(activities)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn get_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(activity_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    let activity = state.activities_usecase.get_activity(activity_id).await?;
    Ok((StatusCode::OK, Json(activity)))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn create_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<ActivityRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;
    let payload = validated(payload)?;

    let activity = state
        .activities_usecase
        .create_activity(payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(activity)))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn update_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(activity_id): Path<Uuid>,
    Json(payload): Json<ActivityRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;
    let payload = validated(payload)?;

    let activity = state
        .activities_usecase
        .update_activity(activity_id, payload.into())
        .await?;
    Ok((StatusCode::OK, Json(activity)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(activity_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    state.activities_usecase.delete_activity(activity_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Amenities

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn list_amenities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    let amenities = state.amenities_usecase.list_amenities().await?;
    Ok((StatusCode::OK, Json(amenities)))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn create_amenity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<AmenityRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;
    let payload = validated(payload)?;

    let amenity = state.amenities_usecase.create_amenity(payload.name).await?;
    Ok((StatusCode::CREATED, Json(amenity)))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn update_amenity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(amenity_id): Path<Uuid>,
    Json(payload): Json<AmenityRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;
    let payload = validated(payload)?;

    let amenity = state
        .amenities_usecase
        .update_amenity(amenity_id, payload.name)
        .await?;
    Ok((StatusCode::OK, Json(amenity)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn delete_amenity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(amenity_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    state.amenities_usecase.delete_amenity(amenity_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Users

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    let users: Vec<UserProfileView> = state
        .auth_usecase
        .list_users()
        .await?
        .into_iter()
        .map(UserProfileView::from)
        .collect();
    Ok((StatusCode::OK, Json(users)))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;
    let payload = validated(payload)?;

    let created = state
        .auth_usecase
        .create_user(payload.name, payload.email, payload.password, payload.is_admin)
        .await?;
    Ok((StatusCode::CREATED, Json(UserProfileView::from(created))))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(target_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    let averages = state.auth_usecase.delete_user(user.user_id, target_id).await?;
    Ok((StatusCode::OK, Json(averages)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_rejects_negative_cost_of_living() {
        let request = CityRequest {
            name: "Lisbon".to_string(),
            location: "Portugal".to_string(),
            climate: None,
            terrain: None,
            cost_of_living: -1.0,
        };

        assert!(matches!(validated(request), Err(UsecaseError::Validation(_))));
    }

    #[test]
    fn test_activity_request_defaults() {
        let request: ActivityRequest = serde_json::from_value(serde_json::json!({
            "name": "Kayaking",
            "kind": "outdoor",
            "price": 30.0
        }))
        .unwrap();

        assert!(!request.requires_reservation);
        assert!(request.destination_ids.is_empty());
        assert!(request.scheduled_at.is_none());

        let input = ActivityInput::from(validated(request).unwrap());
        assert_eq!(input.name, "Kayaking");
    }
}
