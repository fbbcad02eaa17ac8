//! PostgreSQL implementations of the core storage ports.

use async_trait::async_trait;
use roadwatch_core::accident::{AccidentRecord, NewAccident};
use roadwatch_core::error::CoreError;
use roadwatch_core::identity::{NewUser, UserAccount};
use roadwatch_core::ports::{AccidentStore, UserStore};
use roadwatch_core::types::DbId;

use crate::repositories::{AccidentRepo, UserRepo};
use crate::DbPool;

/// PostgreSQL error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// [`AccidentStore`] backed by the `accidents` table.
#[derive(Clone)]
pub struct PgAccidentStore {
    pool: DbPool,
}

impl PgAccidentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccidentStore for PgAccidentStore {
    async fn create(&self, accident: &NewAccident) -> Result<DbId, CoreError> {
        let row = AccidentRepo::create(&self.pool, accident)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.id)
    }

    async fn find_by_route(&self, route: &str) -> Result<Vec<AccidentRecord>, CoreError> {
        let rows = AccidentRepo::list_by_route(&self.pool, route)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(AccidentRecord::from).collect())
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(map_sqlx_error)
    }
}

/// [`UserStore`] backed by the `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: &NewUser) -> Result<UserAccount, CoreError> {
        let row = UserRepo::create(&self.pool, user)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<UserAccount>, CoreError> {
        let row = UserRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(UserAccount::from))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, CoreError> {
        let row = UserRepo::find_by_username(&self.pool, username)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(UserAccount::from))
    }
}

/// Translate a sqlx error into a [`CoreError`].
///
/// Unique violations on `uq_*` constraints become [`CoreError::Conflict`];
/// everything else is logged and reported as internal.
fn map_sqlx_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return CoreError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                ));
            }
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Internal("Database error".to_string())
}
