pub mod accident;
pub mod auth;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                register (public)
/// /auth/login                   login (public)
/// /auth/me                      current user (requires auth)
///
/// /accidents                    submit (POST), list by ?route= (GET)
/// /accidents/notify             lookup + email summary (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/accidents", accident::router())
}
