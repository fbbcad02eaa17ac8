//! Accident summary emails: message composition and delivery status.

use std::fmt::Write as _;

use serde::Serialize;

use crate::accident::AccidentProjection;

/// Subject line of every accident summary email.
pub const SUBJECT: &str = "Accident Report";

/// First line of every accident summary body, followed by a blank line.
pub const BODY_HEADER: &str = "Accident Report:";

/// A single outbound plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl NotificationMessage {
    /// Build an accident summary addressed to `to`.
    pub fn accident_summary(from: &str, to: &str, accidents: &[AccidentProjection]) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            subject: SUBJECT.to_string(),
            body: compose_body(accidents),
        }
    }
}

/// Render the summary body.
///
/// Layout: the header line, one blank line, then one four-line block per
/// accident in the given order, each followed by exactly one blank line.
pub fn compose_body(accidents: &[AccidentProjection]) -> String {
    let mut body = format!("{BODY_HEADER}\n\n");
    for accident in accidents {
        // Writing to a String cannot fail.
        let _ = write!(
            body,
            "Location: {}\nDate: {}\nTime: {}\nCasualties: {}\n\n",
            accident.location, accident.date, accident.time, accident.casualties
        );
    }
    body
}

/// What happened to the summary email after a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotificationStatus {
    /// The relay accepted the message.
    Sent { recipient: String },
    /// The current user has no email address on file.
    SkippedNoRecipient,
    /// The lookup matched no accidents, so there was nothing to report.
    SkippedNoAccidents,
    /// No mail relay is configured for this deployment.
    Disabled,
    /// The relay or connection failed. Nothing is retried automatically.
    Failed { retryable: bool, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection(location: &str, casualties: i32) -> AccidentProjection {
        AccidentProjection {
            location: location.to_string(),
            date: "2024-01-13".to_string(),
            time: "08:15".to_string(),
            casualties,
        }
    }

    #[test]
    fn empty_list_renders_header_only() {
        assert_eq!(compose_body(&[]), "Accident Report:\n\n");
    }

    #[test]
    fn each_accident_is_a_four_line_block() {
        let accidents = [projection("Bridge", 1), projection("Tunnel", 0), projection("Ramp", 5)];
        let body = compose_body(&accidents);

        let blocks: Vec<&str> = body
            .strip_prefix("Accident Report:\n\n")
            .unwrap()
            .split_terminator("\n\n")
            .collect();
        assert_eq!(blocks.len(), 3);
        for (block, accident) in blocks.iter().zip(&accidents) {
            let lines: Vec<&str> = block.lines().collect();
            assert_eq!(
                lines,
                [
                    format!("Location: {}", accident.location),
                    "Date: 2024-01-13".to_string(),
                    "Time: 08:15".to_string(),
                    format!("Casualties: {}", accident.casualties),
                ]
            );
        }
        assert!(body.ends_with("Casualties: 5\n\n"));
        assert!(!body.ends_with("\n\n\n"));
    }

    #[test]
    fn summary_uses_fixed_subject() {
        let msg = NotificationMessage::accident_summary(
            "noreply@roadwatch.local",
            "alice@example.com",
            &[projection("Bridge", 1)],
        );
        assert_eq!(msg.subject, "Accident Report");
        assert_eq!(msg.from, "noreply@roadwatch.local");
        assert_eq!(msg.to, "alice@example.com");
        assert!(msg.body.contains("Location: Bridge\n"));
    }
}
