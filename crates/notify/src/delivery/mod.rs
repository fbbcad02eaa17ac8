//! Delivery channels for notifications.

pub mod email;
