use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;
use crate::utils::object_id::ObjectId;

/// Authenticated actor extracted from the `Authorization: Bearer <token>` header.
///
/// Take `AuthUser` to require authentication, or `Option<AuthUser>` for routes
/// where an anonymous viewer is allowed (a present but invalid token is still
/// rejected).
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: ObjectId,
    pub username: String,
}

impl AuthUser {
    fn from_header(parts: &Parts, secret: &str) -> Result<Option<Self>, AppError> {
        let Some(header) = parts.headers.get("Authorization") else {
            return Ok(None);
        };
        let header = header.to_str().map_err(|_| AppError::TokenInvalid)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims = jwt::verify(token, secret).map_err(|_| AppError::TokenInvalid)?;
        let user_id = ObjectId::parse(&claims.uid).ok_or(AppError::TokenInvalid)?;

        Ok(Some(AuthUser {
            user_id,
            username: claims.sub,
        }))
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        AuthUser::from_header(parts, &state.config.auth.jwt_secret)?.ok_or(AppError::TokenMissing)
    }
}

impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        AuthUser::from_header(parts, &state.config.auth.jwt_secret)
    }
}
