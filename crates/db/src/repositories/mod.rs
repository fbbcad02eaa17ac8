//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async queries
//! that accept `&PgPool` as the first argument.

pub mod accident_repo;
pub mod user_repo;

pub use accident_repo::AccidentRepo;
pub use user_repo::UserRepo;
