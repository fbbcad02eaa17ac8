//! Handlers for the `/auth` resource (register, login, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use roadwatch_core::error::CoreError;
use roadwatch_core::identity::{NewUser, UserIdentity};
use roadwatch_core::types::DbId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    pub password: String,
    /// Where accident summaries are sent. Blank counts as absent.
    #[validate(email, length(max = 100))]
    pub email: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful authentication response returned by login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info (no password hash).
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub email: Option<String>,
}

impl From<UserIdentity> for UserInfo {
    fn from(identity: UserIdentity) -> Self {
        Self {
            id: identity.id,
            username: identity.username,
            email: identity.email,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account. Returns 201 with the new user, 409 if the username is taken.
pub async fn register(
    State(state): State<AppState>,
    AppJson(mut input): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserInfo>>)> {
    input.username = input.username.trim().to_string();
    input.email = input
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());
    input.validate()?;
    validate_password_strength(&input.password, state.config.password_min_length)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let account = state
        .users
        .create(&NewUser {
            username: input.username,
            email: input.email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = account.id, username = %account.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserIdentity::from(&account).into(),
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. Returns an access token.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let account = state
        .users
        .find_by_username(input.username.trim())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid username. Please register first.".into(),
            ))
        })?;

    let password_valid = verify_password(&input.password, &account.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        tracing::info!(username = %account.username, "Login rejected: wrong password");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        )));
    }

    let access_token = generate_access_token(account.id, &account.username, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = account.id, "User logged in");

    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.expires_in_secs(),
        user: UserIdentity::from(&account).into(),
    }))
}

/// GET /api/v1/auth/me
///
/// The account the bearer token belongs to.
pub async fn me(AuthUser(identity): AuthUser) -> Json<DataResponse<UserInfo>> {
    Json(DataResponse {
        data: identity.into(),
    })
}
