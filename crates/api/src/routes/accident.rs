//! Route definitions for the `/accidents` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::accident;
use crate::state::AppState;

/// Routes mounted at `/accidents`. All require auth.
///
/// ```text
/// POST /         -> submit
/// GET  /?route=  -> list_by_route
/// POST /notify   -> notify
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(accident::list_by_route).post(accident::submit))
        .route("/notify", post(accident::notify))
}
