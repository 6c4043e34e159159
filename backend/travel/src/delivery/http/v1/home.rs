use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;

use crate::delivery::http::v1::middleware::AuthenticatedUser;
use crate::usecase::error::UsecaseError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn home(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling home request");

    let page = state.home_usecase.home(user.user_id).await?;
    Ok((StatusCode::OK, Json(page)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, UsecaseError> {
    if params.q.chars().count() > 100 {
        return Err(UsecaseError::Validation("Search query is too long".to_string()));
    }

    let results = state.home_usecase.search(&params.q).await?;
    Ok((StatusCode::OK, Json(results)))
}
