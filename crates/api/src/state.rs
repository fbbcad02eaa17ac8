use std::sync::Arc;

use roadwatch_core::ports::UserStore;
use roadwatch_core::report::ReportService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Built once in `main` and cloned per request (everything is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (JWT settings, password policy).
    pub config: Arc<ServerConfig>,
    /// Accident intake, lookup and notification workflow.
    pub reports: Arc<ReportService>,
    /// User accounts, for registration, login and token resolution.
    pub users: Arc<dyn UserStore>,
}
