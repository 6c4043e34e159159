use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::delivery::http::v1::middleware::{require_admin, AuthenticatedUser};
use crate::usecase::error::UsecaseError;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct BookingRequest {
    pub accommodation_id: Uuid,
    pub start_date: NaiveDate,
    #[validate(range(min = 1, max = 365))]
    pub duration_days: u32,
}

#[derive(Serialize)]
pub struct ArchiveResponse {
    pub archived: u64,
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn make_booking(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<BookingRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!(accommodation_id = %payload.accommodation_id, "handling booking request");

    if let Err(validation_errors) = payload.validate() {
        tracing::warn!(?validation_errors, "validation failed");
        return Err(UsecaseError::Validation(format!("{:?}", validation_errors)));
    }

    if payload.start_date < Utc::now().date_naive() {
        return Err(UsecaseError::Validation(
            "Start date cannot be in the past".to_string(),
        ));
    }

    let booking = state
        .bookings_usecase
        .make_booking(
            user.user_id,
            payload.accommodation_id,
            payload.start_date,
            payload.duration_days,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, UsecaseError> {
    let bookings = state.bookings_usecase.list_bookings(user.user_id).await?;
    Ok((StatusCode::OK, Json(bookings)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn archive_expired(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    let archived = state
        .bookings_usecase
        .archive_expired(Utc::now().date_naive())
        .await?;
    Ok((StatusCode::OK, Json(ArchiveResponse { archived })))
}
