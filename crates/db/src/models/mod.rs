//! Database row models.

pub mod accident;
pub mod user;
