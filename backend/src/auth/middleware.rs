//! Authentication extractor
//!
//! Handlers that need an identity take an [`AuthUser`] argument. The
//! extractor reads `Authorization: Bearer <token>`, verifies the token with
//! the pre-computed keys in `AppState`, and rejects with 401 otherwise.

use crate::auth::JwtService;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts},
};
use job_tracker_shared::AuthError;

/// Authenticated user extracted from a verified bearer token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
}

/// Verify a bearer token and recover the username
///
/// Any token failure surfaces as `Unauthorized`.
pub fn authenticate_request(jwt: &JwtService, token: &str) -> Result<String, ApiError> {
    jwt.verify_access_token(token).map_err(ApiError::from)
}

/// Pull the token out of an `Authorization` header value
fn bearer_token(header_value: Option<&str>) -> Result<&str, ApiError> {
    let value = header_value.ok_or(AuthError::MissingToken)?;
    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_string()))?;

    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(ApiError::Unauthorized(
            "Invalid authorization format".to_string(),
        ));
    }
    Ok(token.trim())
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let header_value = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        let token = bearer_token(header_value)?;

        let username = authenticate_request(app_state.jwt(), token)?;

        Ok(AuthUser { username })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::Algorithm;

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert_eq!(bearer_token(Some("bearer abc")).unwrap(), "abc");
        assert!(bearer_token(None).is_err());
        assert!(bearer_token(Some("Basic dXNlcjpwYXNz")).is_err());
        assert!(bearer_token(Some("Bearer ")).is_err());
        assert!(bearer_token(Some("abc.def.ghi")).is_err());
    }

    #[test]
    fn test_authenticate_request_maps_to_unauthorized() {
        let jwt = JwtService::new("secret", Algorithm::HS256, Duration::minutes(30));
        let token = jwt.issue_access_token("alicej").unwrap();

        assert_eq!(authenticate_request(&jwt, &token).unwrap(), "alicej");
        assert!(matches!(
            authenticate_request(&jwt, "garbage"),
            Err(ApiError::Unauthorized(_))
        ));
    }
}
