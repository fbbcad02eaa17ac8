//! Accident summary delivery via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport to send the
//! plain-text summaries built by the reporting workflow. Configuration is
//! loaded from environment variables; if `SMTP_HOST` is not set,
//! [`EmailConfig::from_env`] returns `None` and no mailer should be constructed.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use roadwatch_core::notification::NotificationMessage;
use roadwatch_core::ports::{MailError, MailTransport};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, relay reply).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

impl EmailError {
    /// Whether sending the same message again later could succeed.
    ///
    /// Transient relay replies (4xx), dropped connections and timeouts are
    /// retryable. Permanent replies (5xx), client-side and TLS errors, and
    /// malformed messages are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            EmailError::Transport(err) => !(err.is_permanent() || err.is_client() || err.is_tls()),
            EmailError::Address(_) | EmailError::Build(_) => false,
        }
    }
}

impl From<EmailError> for MailError {
    fn from(err: EmailError) -> Self {
        MailError {
            retryable: err.is_retryable(),
            reason: err.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
pub const DEFAULT_FROM_ADDRESS: &str = "noreply@roadwatch.local";

/// Configuration for the SMTP relay.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default                    |
    /// |-----------------|----------|----------------------------|
    /// | `SMTP_HOST`     | yes      | --                         |
    /// | `SMTP_PORT`     | no       | `587`                      |
    /// | `SMTP_FROM`     | no       | `noreply@roadwatch.local`  |
    /// | `SMTP_USER`     | no       | --                         |
    /// | `SMTP_PASSWORD` | no       | --                         |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends notification emails through a single SMTP relay.
///
/// Each send opens a STARTTLS session, authenticates when credentials are
/// configured, submits the message and waits for the relay's verdict.
pub struct EmailDelivery {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailDelivery {
    /// Create a delivery service for the relay described by `config`.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }

    /// Send a single plain-text message.
    pub async fn deliver(&self, message: &NotificationMessage) -> Result<(), EmailError> {
        let email = build_message(message)?;
        self.transport.send(email).await?;
        tracing::info!(to = %message.to, subject = %message.subject, "Notification email sent");
        Ok(())
    }
}

#[async_trait]
impl MailTransport for EmailDelivery {
    async fn send(&self, message: &NotificationMessage) -> Result<(), MailError> {
        self.deliver(message).await.map_err(MailError::from)
    }
}

/// Assemble a plain-text MIME message.
fn build_message(message: &NotificationMessage) -> Result<Message, EmailError> {
    Message::builder()
        .from(message.from.parse()?)
        .to(message.to.parse()?)
        .subject(message.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(message.body.clone())
        .map_err(|e| EmailError::Build(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
