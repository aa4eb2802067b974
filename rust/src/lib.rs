//! Feedback Hub - rated feedback collection with sentiment classification
//!
//! This crate implements the full feedback lifecycle: a public submission
//! pipeline (validate -> classify sentiment -> persist -> notify) and a
//! token-gated admin search over stored records.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use feedback_hub::config::Config;
//! use feedback_hub::notify::Notifier;
//! use feedback_hub::service::FeedbackService;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env();
//! let pool = feedback_hub::database::connect_pool(&config.database_url).await?;
//! let notifier = Notifier::from_config(config.mail.as_ref());
//! let service = FeedbackService::new(pool, notifier);
//!
//! let payload = serde_json::json!({"rating": 5, "message": "Loved it"});
//! let record = service.submit(&payload).await?;
//! assert_eq!(record.rating, 5);
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Environment configuration
pub mod config;

// Data model
pub mod models;

// Submission validation
pub mod validation;

// Lexicon sentiment scoring
pub mod sentiment;

// Outbound email notification
pub mod notify;

// Database integration
pub mod database;

// Submission pipeline and admin search
pub mod service;

pub use config::{Config, MailConfig};
pub use error::FeedbackError;
pub use models::{AdminQueryParams, FeedbackPage, FeedbackRecord, Sentiment};
pub use notify::Notifier;
pub use service::FeedbackService;
