//! Integration tests for the PostgreSQL stores.
//!
//! Each test gets a fresh database from `DATABASE_URL` with the migrations
//! applied.

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime};
use roadwatch_core::accident::NewAccident;
use roadwatch_core::error::CoreError;
use roadwatch_core::identity::NewUser;
use roadwatch_core::ports::{AccidentStore, UserStore};
use roadwatch_db::stores::{PgAccidentStore, PgUserStore};
use sqlx::PgPool;

fn accident(route: &str, location: &str) -> NewAccident {
    NewAccident {
        route: route.to_string(),
        location: location.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 1, 13).unwrap(),
        time: NaiveTime::from_hms_opt(8, 15, 0).unwrap(),
        casualties: 2,
    }
}

fn user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: Some(format!("{username}@test.com")),
        password_hash: "not-a-real-hash".to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn accidents_are_listed_by_route_in_insertion_order(pool: PgPool) {
    let store = PgAccidentStore::new(pool);
    let first = store.create(&accident("A1", "North")).await.unwrap();
    store.create(&accident("B2", "Elsewhere")).await.unwrap();
    let second = store.create(&accident("A1", "South")).await.unwrap();

    let rows = store.find_by_route("A1").await.unwrap();
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, [first, second]);
    assert_eq!(rows[0].time, NaiveTime::from_hms_opt(8, 15, 0).unwrap());

    assert!(store.find_by_route("a1").await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_username_is_a_conflict(pool: PgPool) {
    let store = PgUserStore::new(pool);
    let created = store.create(&user("alice")).await.unwrap();
    assert_eq!(created.email.as_deref(), Some("alice@test.com"));

    let err = store.create(&user("alice")).await.unwrap_err();
    assert_matches!(err, CoreError::Conflict(msg) if msg.contains("uq_users_username"));

    let found = store.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert!(store.find_by_id(created.id + 1).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn negative_casualties_are_refused_by_the_schema(pool: PgPool) {
    let store = PgAccidentStore::new(pool.clone());
    let mut input = accident("A1", "North");
    input.casualties = -1;

    let err = store.create(&input).await.unwrap_err();
    assert_matches!(err, CoreError::Internal(_));

    let raw = sqlx::query(
        "INSERT INTO accidents (route, location, date, time, casualties)
         VALUES ('A1', 'North', '2024-01-13', '08:15', -5)",
    )
    .execute(&pool)
    .await;
    let db_err = raw.unwrap_err();
    let code = db_err.as_database_error().and_then(|e| e.code());
    assert_eq!(code.as_deref(), Some("23514"));

    assert!(store.find_by_route("A1").await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_reaches_the_database(pool: PgPool) {
    roadwatch_db::health_check(&pool).await.unwrap();
    PgAccidentStore::new(pool).health_check().await.unwrap();
}
