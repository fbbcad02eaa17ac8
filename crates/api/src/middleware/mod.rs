//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the bearer token to the current user.

pub mod auth;
