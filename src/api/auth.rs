use axum::{
    Json,
    extract::{FromRequestParts, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;

use super::validation::validate_new_user;
use super::{ApiError, AppState, LoginRequest, RegisterRequest, TokenResponse};
use crate::models::user::NewUser;
use crate::services::{AuthError, Claims};

// ============================================================================
// Extractor
// ============================================================================

/// Verified claims from an `Authorization: Bearer <token>` header.
///
/// Rejects with 401 when the header is missing or the token does not verify.
pub struct AuthUser(pub Claims);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::from(AuthError::Unauthenticated))?;

        let claims = state.tokens().verify(token)?;
        tracing::Span::current().record("user_id", claims.username.as_str());

        Ok(Self(claims))
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();

    (!token.is_empty()).then_some(token)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/token
/// Exchange username and password for a token
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(payload) = payload?;

    if payload.username.is_empty() {
        return Err(ApiError::validation("username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("password is required"));
    }

    let user = state
        .users()
        .authenticate(&payload.username, &payload.password)
        .await?;

    let token = state.tokens().issue(&user.username, user.is_admin)?;
    Ok(Json(TokenResponse { token }))
}

/// POST /auth/register
/// Self-service signup; always creates a non-admin account
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let Json(payload) = payload?;

    let new_user = NewUser {
        username: payload.username,
        password: payload.password,
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        is_admin: false,
    };
    validate_new_user(&new_user)?;

    let user = state.users().register(new_user).await?;
    let token = state.tokens().issue(&user.username, user.is_admin)?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_bearer_token(&headers("bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_bearer_token(&headers("Basic dXNlcjpwdw==")), None);
        assert_eq!(extract_bearer_token(&headers("Bearer ")), None);
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }
}
