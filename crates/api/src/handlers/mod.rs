//! Request handlers.
//!
//! Handlers stay thin: they extract input, call into `roadwatch_core`
//! (directly or through [`crate::state::AppState`]) and map errors via
//! [`crate::error::AppError`].

pub mod accident;
pub mod auth;
