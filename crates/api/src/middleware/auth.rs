//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use roadwatch_core::error::CoreError;
use roadwatch_core::identity::UserIdentity;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The current user, resolved from a JWT Bearer token in the `Authorization`
/// header.
///
/// The account is loaded once here, so handlers pass the identity (and its
/// email) straight to the reporting workflow without another lookup.
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserIdentity);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        let account = state
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| unauthorized("User no longer exists"))?;

        Ok(AuthUser(UserIdentity::from(&account)))
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.to_string()))
}
