//! Shared harness for API integration tests.
//!
//! The router is built with in-memory implementations of the storage and
//! mail ports, so these tests need no database or SMTP relay.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use roadwatch_core::accident::{AccidentRecord, NewAccident};
use roadwatch_core::error::CoreError;
use roadwatch_core::identity::{NewUser, UserAccount};
use roadwatch_core::notification::NotificationMessage;
use roadwatch_core::ports::{AccidentStore, MailError, MailTransport, UserStore};
use roadwatch_core::report::ReportService;
use roadwatch_core::types::DbId;
use tower::ServiceExt;

use roadwatch_api::auth::jwt::JwtConfig;
use roadwatch_api::config::ServerConfig;
use roadwatch_api::router::build_app_router;
use roadwatch_api::state::AppState;

pub const SENDER: &str = "alerts@roadwatch.local";

// ---------------------------------------------------------------------------
// In-memory ports
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryAccidents {
    pub rows: Mutex<Vec<AccidentRecord>>,
}

#[async_trait]
impl AccidentStore for MemoryAccidents {
    async fn create(&self, accident: &NewAccident) -> Result<DbId, CoreError> {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as DbId + 1;
        rows.push(AccidentRecord {
            id,
            route: accident.route.clone(),
            location: accident.location.clone(),
            date: accident.date,
            time: accident.time,
            casualties: accident.casualties,
            created_at: chrono::Utc::now(),
        });
        Ok(id)
    }

    async fn find_by_route(&self, route: &str) -> Result<Vec<AccidentRecord>, CoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|r| r.route == route).cloned().collect())
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    rows: Mutex<Vec<UserAccount>>,
}

#[async_trait]
impl UserStore for MemoryUsers {
    async fn create(&self, user: &NewUser) -> Result<UserAccount, CoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.username == user.username) {
            return Err(CoreError::Conflict(
                "Duplicate value violates unique constraint: uq_users_username".into(),
            ));
        }
        let account = UserAccount {
            id: rows.len() as DbId + 1,
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            created_at: chrono::Utc::now(),
        };
        rows.push(account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<UserAccount>, CoreError> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, CoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<NotificationMessage>>,
    pub fail_with: Option<MailError>,
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn send(&self, message: &NotificationMessage) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(message.clone());
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Handles to the fakes behind a test app, for assertions.
pub struct TestApp {
    pub router: Router,
    pub accidents: Arc<MemoryAccidents>,
    pub mailer: Arc<RecordingMailer>,
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        password_min_length: 8,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router over fresh in-memory ports.
pub fn build_test_app() -> TestApp {
    build_test_app_with_mailer(RecordingMailer::default())
}

pub fn build_test_app_with_mailer(mailer: RecordingMailer) -> TestApp {
    let config = test_config();
    let accidents = Arc::new(MemoryAccidents::default());
    let mailer = Arc::new(mailer);

    let transport: Arc<dyn MailTransport> = mailer.clone();
    let reports = ReportService::new(accidents.clone(), Some(transport), SENDER);
    let state = AppState {
        config: Arc::new(config.clone()),
        reports: Arc::new(reports),
        users: Arc::new(MemoryUsers::default()),
    };

    TestApp {
        router: build_app_router(state, &config).unwrap(),
        accidents,
        mailer,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, Some(token)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), Some(token)).await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Flow helpers
// ---------------------------------------------------------------------------

/// Register a user (optionally with an email) and return an access token.
pub async fn register_and_login(app: &Router, username: &str, email: Option<&str>) -> String {
    let password = "correct-horse-battery";
    let body = serde_json::json!({
        "username": username,
        "password": password,
        "email": email,
    });
    let response = post_json(app.clone(), "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);

    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(app.clone(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}
