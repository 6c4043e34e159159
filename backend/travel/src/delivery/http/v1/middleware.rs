use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::usecase::error::UsecaseError;
use crate::usecase::jwt::Claims;
use crate::AppState;

/// Name of the HttpOnly cookie carrying the access token.
pub const SESSION_COOKIE: &str = "session";

#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl TryFrom<Claims> for AuthenticatedUser {
    type Error = UsecaseError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
            tracing::warn!(?e, "failed to parse user_id from token");
            UsecaseError::Unauthorized("Invalid user ID in token".to_string())
        })?;

        Ok(Self {
            user_id,
            is_admin: claims.is_admin,
        })
    }
}

/// Bearer header first, then the session cookie.
pub(crate) fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, UsecaseError> {
    let Some(token) = extract_token(request.headers()) else {
        tracing::warn!("missing bearer token and session cookie");
        return Err(UsecaseError::Unauthorized("Authentication required".to_string()));
    };

    let claims = state.jwt_service.validate_token(&token).map_err(|e| {
        tracing::warn!(?e, "invalid token");
        UsecaseError::from(e)
    })?;

    let authenticated_user = AuthenticatedUser::try_from(claims)?;

    tracing::debug!(?authenticated_user, "user authenticated successfully");
    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}

pub(crate) fn require_admin(user: &AuthenticatedUser) -> Result<(), UsecaseError> {
    if !user.is_admin {
        tracing::warn!(user_id = %user.user_id, "non-admin access attempt to admin endpoint");
        return Err(UsecaseError::Forbidden("Admin access required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;
    use crate::usecase::jwt::JwtService;

    #[test]
    fn test_bearer_token_is_preferred() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("session=xyz"));

        assert_eq!(extract_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn test_session_cookie_is_accepted() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; session=xyz"));

        assert_eq!(extract_token(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_no_credentials() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="));

        assert_eq!(extract_token(&headers), None);
    }

    #[test]
    fn test_require_admin() {
        let mut user = AuthenticatedUser {
            user_id: Uuid::new_v4(),
            is_admin: false,
        };
        assert!(matches!(require_admin(&user), Err(UsecaseError::Forbidden(_))));

        user.is_admin = true;
        assert!(require_admin(&user).is_ok());
    }

    #[test]
    fn test_authenticated_user_from_token_claims() {
        let jwt = JwtService::new("test_secret".to_string(), 60);
        let user_id = Uuid::new_v4();
        let token = jwt
            .generate_token(user_id, "ada@example.com".to_string(), true)
            .unwrap();
        let claims = jwt.validate_token(&token).unwrap();

        let user = AuthenticatedUser::try_from(claims).unwrap();

        assert_eq!(user.user_id, user_id);
        assert!(user.is_admin);
    }

    #[test]
    fn test_malformed_subject_is_unauthorized() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            email: "ada@example.com".to_string(),
            is_admin: false,
            exp: 0,
            iat: 0,
        };

        let result = AuthenticatedUser::try_from(claims);

        assert!(matches!(result, Err(UsecaseError::Unauthorized(_))));
    }
}
