//! Handlers for the `/accidents` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use roadwatch_core::accident::{AccidentProjection, ReportSubmission};
use roadwatch_core::report::LookupReport;
use roadwatch_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// `?route=` query for listing, and the body of `POST /accidents/notify`.
#[derive(Debug, Deserialize)]
pub struct RouteParams {
    pub route: String,
}

/// Response body for a stored report.
#[derive(Debug, Serialize)]
pub struct CreatedAccident {
    pub id: DbId,
}

/// POST /api/v1/accidents
///
/// Submit a report. Malformed date, time or casualties yield 400 and nothing
/// is stored.
pub async fn submit(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppJson(input): AppJson<ReportSubmission>,
) -> AppResult<(StatusCode, Json<DataResponse<CreatedAccident>>)> {
    let id = state.reports.submit_report(&input).await?;
    tracing::debug!(id, reporter = %user.username, "Report submitted");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedAccident { id },
        }),
    ))
}

/// GET /api/v1/accidents?route=
///
/// Accidents on a route, without sending an email.
pub async fn list_by_route(
    State(state): State<AppState>,
    _user: AuthUser,
    AppQuery(params): AppQuery<RouteParams>,
) -> AppResult<Json<DataResponse<Vec<AccidentProjection>>>> {
    let route = required_route(&params)?;
    let accidents = state.reports.lookup(route).await?;
    Ok(Json(DataResponse { data: accidents }))
}

/// POST /api/v1/accidents/notify
///
/// Accidents on a route, also emailed to the current user. The delivery
/// outcome is reported in `data.notification`.
pub async fn notify(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppJson(params): AppJson<RouteParams>,
) -> AppResult<Json<DataResponse<LookupReport>>> {
    let route = required_route(&params)?;
    let report = state.reports.lookup_and_notify(route, &user).await?;
    Ok(Json(DataResponse { data: report }))
}

fn required_route(params: &RouteParams) -> AppResult<&str> {
    let route = params.route.trim();
    if route.is_empty() {
        return Err(AppError::BadRequest("'route' must not be empty".into()));
    }
    Ok(route)
}
