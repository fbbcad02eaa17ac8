//! Accident row model.

use chrono::{NaiveDate, NaiveTime};
use roadwatch_core::accident::AccidentRecord;
use roadwatch_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full row from the `accidents` table.
#[derive(Debug, Clone, FromRow)]
pub struct Accident {
    pub id: DbId,
    pub route: String,
    pub location: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub casualties: i32,
    pub created_at: Timestamp,
}

impl From<Accident> for AccidentRecord {
    fn from(row: Accident) -> Self {
        Self {
            id: row.id,
            route: row.route,
            location: row.location,
            date: row.date,
            time: row.time,
            casualties: row.casualties,
            created_at: row.created_at,
        }
    }
}
