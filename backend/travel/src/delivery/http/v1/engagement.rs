use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

use crate::delivery::http::v1::middleware::AuthenticatedUser;
use crate::usecase::error::UsecaseError;
use crate::AppState;

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, UsecaseError> {
    let favorites = state.engagement_usecase.list_favorites(user.user_id).await?;
    Ok((StatusCode::OK, Json(favorites)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(destination_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!(%destination_id, "handling add favorite request");

    let favorite = state
        .engagement_usecase
        .add_favorite(user.user_id, destination_id)
        .await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(destination_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    state
        .engagement_usecase
        .remove_favorite(user.user_id, destination_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn mark_visited(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(destination_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!(%destination_id, "handling mark visited request");

    let visit = state
        .engagement_usecase
        .mark_visited(user.user_id, destination_id)
        .await?;
    Ok((StatusCode::CREATED, Json(visit)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn past_travels(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, UsecaseError> {
    let travels = state.engagement_usecase.past_travels(user.user_id).await?;
    Ok((StatusCode::OK, Json(travels)))
}
