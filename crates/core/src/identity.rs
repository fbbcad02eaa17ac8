//! User identity as seen by the reporting workflow.

use crate::types::{DbId, Timestamp};

/// An authenticated user, resolved once per request by the auth layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: DbId,
    pub username: String,
    pub email: Option<String>,
}

impl UserIdentity {
    /// The address notifications should go to, if one is on file.
    ///
    /// Blank addresses count as missing.
    pub fn recipient(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}

/// Stored user account, including the password hash.
///
/// Never serialize this; convert to [`UserIdentity`] for anything outbound.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: DbId,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub created_at: Timestamp,
}

impl From<&UserAccount> for UserIdentity {
    fn from(account: &UserAccount) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
        }
    }
}

/// Input for registering a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
}
