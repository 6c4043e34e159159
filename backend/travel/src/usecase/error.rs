use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

use crate::domain::booking::BookingError;
use crate::domain::review::ReviewError;
use crate::repository::errors::RepositoryError;
use crate::usecase::jwt::JwtError;
use crate::usecase::password::PasswordError;

#[derive(Debug, Error)]
pub enum UsecaseError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl From<RepositoryError> for UsecaseError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => UsecaseError::NotFound("Resource".to_string()),
            RepositoryError::Conflict(constraint) => {
                UsecaseError::Conflict(format!("Already exists ({constraint})"))
            }
            RepositoryError::UnknownReference(constraint) => {
                UsecaseError::Validation(format!("Referenced record does not exist ({constraint})"))
            }
            RepositoryError::DatabaseError(msg) => UsecaseError::Internal(msg),
        }
    }
}

impl From<ReviewError> for UsecaseError {
    fn from(e: ReviewError) -> Self {
        UsecaseError::Validation(e.to_string())
    }
}

impl From<BookingError> for UsecaseError {
    fn from(e: BookingError) -> Self {
        UsecaseError::Validation(e.to_string())
    }
}

impl From<PasswordError> for UsecaseError {
    fn from(e: PasswordError) -> Self {
        UsecaseError::Internal(e.to_string())
    }
}

impl From<JwtError> for UsecaseError {
    fn from(e: JwtError) -> Self {
        match e {
            JwtError::TokenGenerationError(msg) => UsecaseError::Internal(msg),
            other => UsecaseError::Unauthorized(other.to_string()),
        }
    }
}

impl IntoResponse for UsecaseError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            UsecaseError::NotFound(_) => StatusCode::NOT_FOUND,
            UsecaseError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            UsecaseError::Forbidden(_) => StatusCode::FORBIDDEN,
            UsecaseError::Validation(_) => StatusCode::BAD_REQUEST,
            UsecaseError::Conflict(_) => StatusCode::CONFLICT,
            UsecaseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match &self {
            UsecaseError::Internal(_) => {
                tracing::error!(error = %self, "internal error");
            }
            UsecaseError::NotFound(_) => {
                tracing::warn!(error = %self, "resource not found");
            }
            UsecaseError::Forbidden(_) | UsecaseError::Unauthorized(_) => {
                tracing::warn!(error = %self, "access denied");
            }
            _ => {
                tracing::debug!(error = %self);
            }
        }

        let body = match &self {
            // Database details stay in the logs
            UsecaseError::Internal(_) => "An error occurred while processing your request.".to_string(),
            _ => self.to_string(),
        };

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (UsecaseError::NotFound("Destination".to_string()), StatusCode::NOT_FOUND),
            (UsecaseError::Unauthorized("no".to_string()), StatusCode::UNAUTHORIZED),
            (UsecaseError::Forbidden("no".to_string()), StatusCode::FORBIDDEN),
            (UsecaseError::Validation("bad".to_string()), StatusCode::BAD_REQUEST),
            (UsecaseError::Conflict("dup".to_string()), StatusCode::CONFLICT),
            (UsecaseError::Internal("boom".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_repository_conflict_maps_to_conflict() {
        let error = UsecaseError::from(RepositoryError::Conflict("users_email_key".to_string()));
        assert!(matches!(error, UsecaseError::Conflict(_)));
    }

    #[test]
    fn test_unknown_reference_is_bad_request() {
        let error = UsecaseError::from(RepositoryError::UnknownReference(
            "accommodation_amenities_amenity_id_fkey".to_string(),
        ));

        assert!(matches!(&error, UsecaseError::Validation(msg) if msg.contains("amenity_id_fkey")));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_review_error_is_validation() {
        let error = UsecaseError::from(ReviewError::RatingOutOfRange);
        assert!(matches!(error, UsecaseError::Validation(_)));
    }
}
