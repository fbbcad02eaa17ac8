//! The accident reporting workflow.
//!
//! [`ReportService`] is built once at startup with its store and (optional)
//! mail transport, then shared across requests. It covers three steps:
//!
//! 1. intake: [`ReportService::submit_report`] validates and stores a report,
//! 2. lookup: [`ReportService::lookup`] returns projections for a route,
//! 3. dispatch: [`ReportService::lookup_and_notify`] also emails the result
//!    to the current user.

use std::sync::Arc;

use serde::Serialize;

use crate::accident::{normalize_route, AccidentProjection, FormatError, ReportSubmission};
use crate::error::CoreError;
use crate::identity::UserIdentity;
use crate::notification::{NotificationMessage, NotificationStatus};
use crate::ports::{AccidentStore, MailTransport};
use crate::types::DbId;

/// Why a report submission was not stored.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Store(#[from] CoreError),
}

/// Result of [`ReportService::lookup_and_notify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupReport {
    pub accidents: Vec<AccidentProjection>,
    pub notification: NotificationStatus,
}

pub struct ReportService {
    accidents: Arc<dyn AccidentStore>,
    mailer: Option<Arc<dyn MailTransport>>,
    sender: String,
}

impl ReportService {
    /// `mailer` is `None` when no relay is configured; notifications are then
    /// reported as [`NotificationStatus::Disabled`].
    pub fn new(
        accidents: Arc<dyn AccidentStore>,
        mailer: Option<Arc<dyn MailTransport>>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            accidents,
            mailer,
            sender: sender.into(),
        }
    }

    /// Validate a submission and persist it. Nothing is written on a
    /// [`FormatError`].
    pub async fn submit_report(&self, submission: &ReportSubmission) -> Result<DbId, ReportError> {
        let accident = submission.normalize()?;
        let id = self.accidents.create(&accident).await?;
        tracing::info!(
            id,
            route = %accident.route,
            date = %accident.date,
            casualties = accident.casualties,
            "Accident report stored"
        );
        Ok(id)
    }

    /// Projections of every accident on `route` (exact match, insertion order).
    ///
    /// The route goes through the same checks as on intake, so a label that
    /// could never have been stored is a validation error.
    pub async fn lookup(&self, route: &str) -> Result<Vec<AccidentProjection>, CoreError> {
        let route = normalize_route(route)?;
        let records = self.accidents.find_by_route(&route).await?;
        Ok(records.iter().map(AccidentProjection::from).collect())
    }

    /// Look up `route` and email the summary to `user`.
    ///
    /// Delivery problems never fail the call; they are reported through
    /// [`LookupReport::notification`].
    pub async fn lookup_and_notify(
        &self,
        route: &str,
        user: &UserIdentity,
    ) -> Result<LookupReport, CoreError> {
        let accidents = self.lookup(route).await?;
        let notification = self.notify(&accidents, user).await;
        Ok(LookupReport {
            accidents,
            notification,
        })
    }

    pub async fn health_check(&self) -> Result<(), CoreError> {
        self.accidents.health_check().await
    }

    async fn notify(&self, accidents: &[AccidentProjection], user: &UserIdentity) -> NotificationStatus {
        let Some(mailer) = &self.mailer else {
            tracing::debug!(user = %user.username, "Mail relay not configured, skipping summary");
            return NotificationStatus::Disabled;
        };

        let Some(recipient) = user.recipient() else {
            tracing::warn!(user = %user.username, "No email on file, accident summary not sent");
            return NotificationStatus::SkippedNoRecipient;
        };

        if accidents.is_empty() {
            tracing::info!(user = %user.username, "No accidents matched, summary not sent");
            return NotificationStatus::SkippedNoAccidents;
        }

        let message = NotificationMessage::accident_summary(&self.sender, recipient, accidents);
        match mailer.send(&message).await {
            Ok(()) => {
                tracing::info!(to = recipient, count = accidents.len(), "Accident summary sent");
                NotificationStatus::Sent {
                    recipient: recipient.to_string(),
                }
            }
            Err(err) => {
                tracing::error!(
                    to = recipient,
                    retryable = err.retryable,
                    error = %err,
                    "Accident summary delivery failed"
                );
                NotificationStatus::Failed {
                    retryable: err.retryable,
                    reason: err.reason,
                }
            }
        }
    }
}
