//! Outbound notification delivery.
//!
//! [`delivery::email::EmailDelivery`] implements the core `MailTransport`
//! port over an authenticated STARTTLS SMTP session.

pub mod delivery;

pub use delivery::email::{EmailConfig, EmailDelivery, EmailError};
