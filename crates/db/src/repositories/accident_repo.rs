//! Repository for the `accidents` table.

use roadwatch_core::accident::NewAccident;
use sqlx::PgPool;

use crate::models::accident::Accident;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, route, location, date, time, casualties, created_at";

/// Insert and query accident reports. Rows are never updated or deleted.
pub struct AccidentRepo;

impl AccidentRepo {
    /// Insert a new accident, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewAccident) -> Result<Accident, sqlx::Error> {
        let query = format!(
            "INSERT INTO accidents (route, location, date, time, casualties)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Accident>(&query)
            .bind(&input.route)
            .bind(&input.location)
            .bind(input.date)
            .bind(input.time)
            .bind(input.casualties)
            .fetch_one(pool)
            .await
    }

    /// All accidents on `route` (exact, case-sensitive match) in insertion order.
    pub async fn list_by_route(pool: &PgPool, route: &str) -> Result<Vec<Accident>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accidents WHERE route = $1 ORDER BY id ASC");
        sqlx::query_as::<_, Accident>(&query)
            .bind(route)
            .fetch_all(pool)
            .await
    }
}
