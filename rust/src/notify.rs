//! Outbound email notification for new feedback.
//!
//! The notifier is a no-op unless a complete mail configuration was present
//! at startup. Sends are single-shot: a failure is logged and swallowed,
//! never surfaced to the submitter, and the record is already durable by
//! the time a send is attempted.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::MailConfig;
use crate::models::FeedbackRecord;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

/// Best-effort email notifier for persisted feedback records.
pub struct Notifier {
    mailer: Option<Mailer>,
}

impl Notifier {
    /// Build a notifier from the optional mail configuration.
    ///
    /// Missing configuration yields a disabled notifier. A present but
    /// unusable configuration (bad addresses, bad host) also disables it,
    /// with a warning, rather than failing server startup.
    ///
    /// Must be called from within a Tokio runtime: the pooled SMTP
    /// transport registers with the reactor when it is built.
    pub fn from_config(config: Option<&MailConfig>) -> Self {
        let Some(config) = config else {
            return Self { mailer: None };
        };

        match Self::build_mailer(config) {
            Ok(mailer) => {
                info!("email notification enabled, sending to {}", config.to);
                Self {
                    mailer: Some(mailer),
                }
            }
            Err(err) => {
                warn!("email configuration unusable, notification disabled: {err}");
                Self { mailer: None }
            }
        }
    }

    /// Notifier that never sends anything.
    pub fn disabled() -> Self {
        Self { mailer: None }
    }

    pub fn enabled(&self) -> bool {
        self.mailer.is_some()
    }

    /// Send the notification for one saved record. No-op when disabled.
    pub async fn notify(&self, record: &FeedbackRecord) -> Result<(), NotifyError> {
        let Some(mailer) = &self.mailer else {
            return Ok(());
        };

        let message = Message::builder()
            .from(mailer.from.clone())
            .to(mailer.to.clone())
            .subject(notification_subject(record))
            .header(ContentType::TEXT_PLAIN)
            .body(notification_body(record))?;

        mailer.transport.send(message).await?;
        Ok(())
    }

    fn build_mailer(config: &MailConfig) -> Result<Mailer, NotifyError> {
        // Opportunistic STARTTLS on the submission port, as the original
        // transport was configured.
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Mailer {
            transport,
            from: config.from.parse()?,
            to: config.to.parse()?,
        })
    }
}

pub(crate) fn notification_subject(record: &FeedbackRecord) -> String {
    format!(
        "New feedback ({}) - rating {}",
        record.sentiment, record.rating
    )
}

pub(crate) fn notification_body(record: &FeedbackRecord) -> String {
    format!(
        "Name: {}\nEmail: {}\nRating: {}\nSentiment: {}\nMessage:\n{}",
        record.name,
        record.email.as_deref().unwrap_or("N/A"),
        record.rating,
        record.sentiment,
        record.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sentiment;
    use chrono::Utc;
    use uuid::Uuid;

    fn make_record(email: Option<&str>) -> FeedbackRecord {
        FeedbackRecord {
            id: Uuid::nil(),
            name: "Ada".to_string(),
            email: email.map(str::to_string),
            rating: 2,
            message: "The import kept failing".to_string(),
            metadata: serde_json::json!({}),
            sentiment: Sentiment::Negative,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn disabled_without_configuration() {
        let notifier = Notifier::from_config(None);
        assert!(!notifier.enabled());
    }

    #[tokio::test]
    async fn disabled_notifier_send_is_a_noop() {
        let notifier = Notifier::disabled();
        assert!(notifier.notify(&make_record(None)).await.is_ok());
    }

    // Building the pooled transport needs a running Tokio reactor, so the
    // constructor tests are async even though they never send anything.
    #[tokio::test]
    async fn unusable_addresses_disable_instead_of_failing() {
        let config = MailConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "user".to_string(),
            password: "pass".to_string(),
            from: "not an address".to_string(),
            to: "admin@example.com".to_string(),
        };
        let notifier = Notifier::from_config(Some(&config));
        assert!(!notifier.enabled());
    }

    #[tokio::test]
    async fn complete_configuration_enables_notifier() {
        let config = MailConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "user@example.com".to_string(),
            password: "pass".to_string(),
            from: "feedback@example.com".to_string(),
            to: "admin@example.com".to_string(),
        };
        let notifier = Notifier::from_config(Some(&config));
        assert!(notifier.enabled());
    }

    #[test]
    fn subject_encodes_sentiment_and_rating() {
        let record = make_record(None);
        assert_eq!(
            notification_subject(&record),
            "New feedback (negative) - rating 2"
        );
    }

    #[test]
    fn body_substitutes_na_for_missing_email() {
        let record = make_record(None);
        let body = notification_body(&record);
        assert!(body.contains("Email: N/A"));
        assert!(body.contains("Message:\nThe import kept failing"));

        let with_email = make_record(Some("ada@example.com"));
        assert!(notification_body(&with_email).contains("Email: ada@example.com"));
    }
}
