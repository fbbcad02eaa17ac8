//! Outbound interfaces the reporting workflow depends on.
//!
//! Adapter crates provide the production implementations: PostgreSQL stores
//! in `roadwatch-db` and SMTP delivery in `roadwatch-notify`.

use async_trait::async_trait;

use crate::accident::{AccidentRecord, NewAccident};
use crate::error::CoreError;
use crate::identity::{NewUser, UserAccount};
use crate::notification::NotificationMessage;
use crate::types::DbId;

/// Durable storage for accident reports.
#[async_trait]
pub trait AccidentStore: Send + Sync {
    /// Persist a report and return its new id.
    async fn create(&self, accident: &NewAccident) -> Result<DbId, CoreError>;

    /// All reports whose route equals `route` exactly, oldest first.
    async fn find_by_route(&self, route: &str) -> Result<Vec<AccidentRecord>, CoreError>;

    /// Check that the backing store is reachable.
    async fn health_check(&self) -> Result<(), CoreError>;
}

/// Lookup and registration of user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account. A taken username yields [`CoreError::Conflict`].
    async fn create(&self, user: &NewUser) -> Result<UserAccount, CoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<UserAccount>, CoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, CoreError>;
}

/// Failure reported by a [`MailTransport`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct MailError {
    /// Whether resending the same message later could succeed.
    pub retryable: bool,
    pub reason: String,
}

impl MailError {
    pub fn transient(reason: impl Into<String>) -> Self {
        Self {
            retryable: true,
            reason: reason.into(),
        }
    }

    pub fn permanent(reason: impl Into<String>) -> Self {
        Self {
            retryable: false,
            reason: reason.into(),
        }
    }
}

/// Sends a single message through a mail relay and waits for its verdict.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &NotificationMessage) -> Result<(), MailError>;
}
