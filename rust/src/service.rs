//! Submission pipeline and admin search orchestration.
//!
//! The pipeline is strictly sequential: validate, classify, persist,
//! notify. Validation failures stop everything before any side effect;
//! the notification runs only after the record is durable and its outcome
//! never changes the caller's result.

use serde_json::Value;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::database::{FeedbackRepository, SearchQuery};
use crate::error::FeedbackError;
use crate::models::{AdminQueryParams, FeedbackPage, FeedbackRecord};
use crate::notify::Notifier;
use crate::sentiment::SentimentAnalyzer;
use crate::validation::validate_submission;

pub struct FeedbackService {
    repository: FeedbackRepository,
    analyzer: SentimentAnalyzer,
    notifier: Notifier,
}

impl FeedbackService {
    pub fn new(pool: PgPool, notifier: Notifier) -> Self {
        Self {
            repository: FeedbackRepository::new(pool),
            analyzer: SentimentAnalyzer::new(),
            notifier,
        }
    }

    /// Accept one untrusted submission.
    pub async fn submit(&self, payload: &Value) -> Result<FeedbackRecord, FeedbackError> {
        let validated = validate_submission(payload)
            .map_err(|errors| FeedbackError::Validation(errors.join(", ")))?;

        let sentiment = self
            .analyzer
            .classify_submission(&validated.message, validated.name.as_deref().unwrap_or(""));

        let record = self.repository.insert(&validated, sentiment).await?;
        info!(id = %record.id, sentiment = %record.sentiment, "feedback stored");

        // Best effort only; the record is already durable.
        if let Err(err) = self.notifier.notify(&record).await {
            warn!("Failed to send notification email: {err}");
        }

        Ok(record)
    }

    /// Run one admin search over stored feedback.
    pub async fn search(&self, params: &AdminQueryParams) -> Result<FeedbackPage, FeedbackError> {
        let query = SearchQuery::from_params(params);
        let (total, items) = self.repository.search(&query).await?;

        Ok(FeedbackPage {
            total,
            page: query.page,
            limit: query.limit,
            items,
        })
    }
}
