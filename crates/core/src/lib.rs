//! Domain layer for the accident reporting service.
//!
//! - [`accident`] -- report intake parsing and record projections.
//! - [`notification`] -- accident summary email composition and delivery status.
//! - [`ports`] -- storage and mail-transport traits implemented by adapter crates.
//! - [`report`] -- the [`report::ReportService`] workflow tying it all together.

pub mod accident;
pub mod error;
pub mod identity;
pub mod notification;
pub mod ports;
pub mod report;
pub mod types;
