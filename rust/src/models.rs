//! Core data types for the feedback store.
//!
//! `FeedbackRecord` is the sole persisted entity. Records are created by the
//! submission pipeline and are read-only afterwards; `sentiment` is computed
//! once at creation and never recomputed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Coarse sentiment label assigned to a record at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            _ => Err(()),
        }
    }
}

/// One persisted feedback submission.
///
/// Wire names keep the original camelCase timestamps (`createdAt` /
/// `updatedAt`) so existing admin clients keep working.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub rating: i32,
    pub message: String,
    pub metadata: serde_json::Value,
    pub sentiment: Sentiment,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A submission that has passed structural validation.
///
/// `name` and `email` are `None` when absent or empty after trimming;
/// persistence substitutes "Anonymous" for a missing name.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedFeedback {
    pub name: Option<String>,
    pub email: Option<String>,
    pub rating: i32,
    pub message: String,
    pub metadata: serde_json::Value,
}

/// One page of admin search results.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackPage {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub items: Vec<FeedbackRecord>,
}

/// Raw admin search parameters as they arrive on the query string.
///
/// Everything is optional text; parsing is deliberately lenient and happens
/// in the filter builder, which drops values it cannot interpret instead of
/// rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminQueryParams {
    pub q: Option<String>,
    pub sentiment: Option<String>,
    pub rating: Option<String>,
    pub ratings: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub token: Option<String>,
}
