//! Environment configuration.
//!
//! Everything is read once at startup; handlers receive an explicit
//! [`Config`] instead of touching the environment. Mail settings are
//! all-or-nothing: notification is enabled only when every required mail
//! variable is present.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use tracing::info;

use crate::error::FeedbackError;

const DEFAULT_DATABASE_URL: &str = "postgresql://localhost:5432/feedbackdb";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_SMTP_PORT: u16 = 587;

/// Server configuration, assembled from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub admin_token: Option<String>,
    pub mail: Option<MailConfig>,
}

/// Complete outbound-mail configuration.
///
/// Only constructed when host, user, password and destination are all
/// present; `from` falls back to the authenticated user and `port` to 587.
#[derive(Debug, Clone, PartialEq)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: String,
}

impl MailConfig {
    /// Assemble mail settings from individually optional values.
    ///
    /// Returns `None` unless every required field is present, which is the
    /// single switch that enables the notifier.
    pub fn from_parts(
        host: Option<String>,
        port: Option<String>,
        username: Option<String>,
        password: Option<String>,
        from: Option<String>,
        to: Option<String>,
    ) -> Option<Self> {
        let (host, username, password, to) = match (host, username, password, to) {
            (Some(h), Some(u), Some(p), Some(t))
                if !h.is_empty() && !u.is_empty() && !p.is_empty() && !t.is_empty() =>
            {
                (h, u, p, t)
            }
            _ => return None,
        };

        let port = port
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_SMTP_PORT);
        let from = from.filter(|f| !f.is_empty()).unwrap_or_else(|| username.clone());

        Some(MailConfig {
            host,
            port,
            username,
            password,
            from,
            to,
        })
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        let config = Self {
            database_url: try_load("DATABASE_URL", DEFAULT_DATABASE_URL.to_string()),
            port: try_load("PORT", DEFAULT_PORT),
            admin_token: var("ADMIN_TOKEN"),
            mail: MailConfig::from_parts(
                var("EMAIL_HOST"),
                var("EMAIL_PORT"),
                var("EMAIL_USER"),
                var("EMAIL_PASS"),
                var("EMAIL_FROM"),
                var("EMAIL_TO"),
            ),
        };

        if config.mail.is_none() {
            info!("mail settings incomplete, email notification disabled");
        }
        if config.admin_token.is_none() {
            info!("ADMIN_TOKEN not set, admin endpoints will reject all requests");
        }

        config
    }

    /// Shared-secret gate for the admin endpoints.
    ///
    /// A server without a configured token rejects everything with a
    /// configuration error, regardless of what the caller presents.
    pub fn authorize_admin(&self, presented: Option<&str>) -> Result<(), FeedbackError> {
        let expected = self
            .admin_token
            .as_deref()
            .ok_or(FeedbackError::AdminTokenNotConfigured)?;

        match presented {
            Some(token) if token == expected => Ok(()),
            _ => Err(FeedbackError::Unauthorized),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    parse_or_default(key, var(key), default)
}

// Unparseable values fall back to the default instead of aborting startup.
fn parse_or_default<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = raw else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    match raw.parse() {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    fn full_config(admin_token: Option<&str>) -> Config {
        Config {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            port: DEFAULT_PORT,
            admin_token: admin_token.map(str::to_string),
            mail: None,
        }
    }

    #[test]
    fn mail_config_requires_every_mandatory_field() {
        assert!(MailConfig::from_parts(
            some("smtp.example.com"),
            None,
            some("user"),
            some("pass"),
            None,
            None,
        )
        .is_none());

        assert!(MailConfig::from_parts(
            None,
            some("2525"),
            some("user"),
            some("pass"),
            some("noreply@example.com"),
            some("admin@example.com"),
        )
        .is_none());
    }

    #[test]
    fn mail_config_defaults_port_and_from() {
        let mail = MailConfig::from_parts(
            some("smtp.example.com"),
            None,
            some("user@example.com"),
            some("pass"),
            None,
            some("admin@example.com"),
        )
        .unwrap();

        assert_eq!(mail.port, DEFAULT_SMTP_PORT);
        assert_eq!(mail.from, "user@example.com");
    }

    #[test]
    fn mail_config_honors_explicit_port_and_from() {
        let mail = MailConfig::from_parts(
            some("smtp.example.com"),
            some("2525"),
            some("user@example.com"),
            some("pass"),
            some("feedback@example.com"),
            some("admin@example.com"),
        )
        .unwrap();

        assert_eq!(mail.port, 2525);
        assert_eq!(mail.from, "feedback@example.com");
    }

    #[test]
    fn unparseable_value_falls_back_to_default() {
        assert_eq!(
            parse_or_default::<u16>("PORT", Some("not-a-port".to_string()), DEFAULT_PORT),
            DEFAULT_PORT
        );
        assert_eq!(
            parse_or_default::<u16>("PORT", Some("8080".to_string()), DEFAULT_PORT),
            8080
        );
        assert_eq!(
            parse_or_default::<u16>("PORT", None, DEFAULT_PORT),
            DEFAULT_PORT
        );
    }

    #[test]
    fn admin_gate_rejects_when_unconfigured() {
        let config = full_config(None);

        // Even a "correct looking" token is rejected without a server secret.
        assert!(matches!(
            config.authorize_admin(Some("secret")),
            Err(FeedbackError::AdminTokenNotConfigured)
        ));
        assert!(matches!(
            config.authorize_admin(None),
            Err(FeedbackError::AdminTokenNotConfigured)
        ));
    }

    #[test]
    fn admin_gate_matches_shared_secret() {
        let config = full_config(Some("secret"));

        assert!(config.authorize_admin(Some("secret")).is_ok());
        assert!(matches!(
            config.authorize_admin(Some("wrong")),
            Err(FeedbackError::Unauthorized)
        ));
        assert!(matches!(
            config.authorize_admin(None),
            Err(FeedbackError::Unauthorized)
        ));
    }
}
