use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::delivery::http::v1::middleware::{require_admin, AuthenticatedUser};
use crate::domain::rating::AverageUpdate;
use crate::domain::review::{Rating, Review, ReviewTarget};
use crate::usecase::error::UsecaseError;
use crate::usecase::reviews::ReviewSubmission;
use crate::AppState;

#[derive(Deserialize, Validate)]
pub struct ReviewRequest {
    #[validate(length(min = 1, max = 20))]
    pub target_type: String,
    pub target_id: Uuid,
    #[validate(range(min = 0, max = 5))]
    pub rating: Option<i16>,
    #[validate(length(max = 1000))]
    pub comment: Option<String>,
}

#[derive(Deserialize)]
pub struct AdminReviewRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub review: ReviewRequest,
}

#[derive(Serialize)]
pub struct ReviewResponse {
    pub review: Review,
    pub average_rating: Option<f64>,
}

#[derive(Serialize)]
pub struct ReviewChangeResponse {
    pub review: Review,
    pub averages: Vec<AverageUpdate>,
}

type ParsedReview = (ReviewTarget, Option<Rating>, Option<String>);

impl ReviewRequest {
    fn parse(self) -> Result<ParsedReview, UsecaseError> {
        if let Err(validation_errors) = self.validate() {
            tracing::warn!(?validation_errors, "validation failed");
            return Err(UsecaseError::Validation(format!("{:?}", validation_errors)));
        }

        let target = ReviewTarget::from_kind(&self.target_type, self.target_id)?;
        let rating = self.rating.map(Rating::new).transpose()?;
        let comment = self
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok((target, rating, comment))
    }
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn submit_review(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<ReviewRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling review submission");

    let (target, rating, comment) = payload.parse()?;

    let response = match state
        .reviews_usecase
        .record_review(user.user_id, target, rating, comment)
        .await?
    {
        ReviewSubmission::Recorded { review, average } => (
            StatusCode::CREATED,
            Json(json!(ReviewResponse {
                review,
                average_rating: average,
            })),
        ),
        ReviewSubmission::AlreadyReviewed => (
            StatusCode::CONFLICT,
            Json(json!({ "message": "You have already reviewed this." })),
        ),
    };

    Ok(response)
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    let reviews = state.reviews_usecase.list_reviews().await?;
    Ok((StatusCode::OK, Json(reviews)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn get_review(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(review_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    let review = state.reviews_usecase.get_review(review_id).await?;
    Ok((StatusCode::OK, Json(review)))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<AdminReviewRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    let author = payload.user_id;
    let (target, rating, comment) = payload.review.parse()?;

    let (review, averages) = state
        .reviews_usecase
        .create_review(author, target, rating, comment)
        .await?;
    Ok((StatusCode::CREATED, Json(ReviewChangeResponse { review, averages })))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn update_review(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(review_id): Path<Uuid>,
    Json(payload): Json<AdminReviewRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    let author = payload.user_id;
    let (target, rating, comment) = payload.review.parse()?;

    let (review, averages) = state
        .reviews_usecase
        .update_review(review_id, author, target, rating, comment)
        .await?;
    Ok((StatusCode::OK, Json(ReviewChangeResponse { review, averages })))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(review_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    require_admin(&user)?;

    let averages = state.reviews_usecase.delete_review(review_id).await?;
    Ok((StatusCode::OK, Json(averages)))
}
