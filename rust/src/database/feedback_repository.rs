//! Feedback repository: record creation and admin search.
//!
//! Admin filters are assembled dynamically with `sqlx::QueryBuilder`; every
//! caller-supplied value goes through `push_bind`, and the sort column is
//! resolved against a whitelist so no query-string text is ever
//! interpolated into SQL.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::models::{AdminQueryParams, FeedbackRecord, Sentiment, ValidatedFeedback};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 20;

const SELECT_COLUMNS: &str =
    "id, name, email, rating, message, metadata, sentiment, created_at, updated_at";

#[derive(Clone)]
pub struct FeedbackRepository {
    pool: PgPool,
}

impl FeedbackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert one validated submission and return the stored record with
    /// its server-assigned id and timestamps.
    pub async fn insert(
        &self,
        feedback: &ValidatedFeedback,
        sentiment: Sentiment,
    ) -> Result<FeedbackRecord, sqlx::Error> {
        let row = sqlx::query(
            r#"INSERT INTO feedback (name, email, rating, message, metadata, sentiment)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id, name, email, rating, message, metadata, sentiment,
                         created_at, updated_at"#,
        )
        .bind(feedback.name.as_deref().unwrap_or("Anonymous"))
        .bind(feedback.email.as_deref())
        .bind(feedback.rating)
        .bind(&feedback.message)
        .bind(&feedback.metadata)
        .bind(sentiment.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(record_from_row(&row))
    }

    /// Run one admin search: total count ignoring pagination, then the
    /// requested page in the requested order.
    pub async fn search(
        &self,
        query: &SearchQuery,
    ) -> Result<(i64, Vec<FeedbackRecord>), sqlx::Error> {
        let mut count_builder = build_count(query);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut select_builder = build_select(query);
        let rows = select_builder.build().fetch_all(&self.pool).await?;
        let items = rows.iter().map(record_from_row).collect();

        Ok((total, items))
    }
}

fn record_from_row(row: &PgRow) -> FeedbackRecord {
    FeedbackRecord {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        rating: row.get("rating"),
        message: row.get("message"),
        metadata: row.get("metadata"),
        sentiment: row
            .get::<String, _>("sentiment")
            .parse()
            .unwrap_or(Sentiment::Neutral),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Sort key and direction, resolved against a column whitelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    column: &'static str,
    descending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            column: "created_at",
            descending: true,
        }
    }
}

impl SortSpec {
    /// Parse a `sort` parameter such as `-createdAt` or `rating`. A leading
    /// `-` means descending. Unrecognized keys fall back to the default
    /// (newest first) instead of reaching the database.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };

        let (key, descending) = match raw.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };

        let column = match key {
            "createdAt" => "created_at",
            "rating" => "rating",
            "name" => "name",
            "sentiment" => "sentiment",
            _ => return Self::default(),
        };

        Self { column, descending }
    }

    fn sql(&self) -> String {
        format!(
            "{} {}",
            self.column,
            if self.descending { "DESC" } else { "ASC" }
        )
    }
}

/// Parsed admin search parameters.
///
/// Parsing is lenient on purpose: values that cannot be interpreted are
/// dropped per-field rather than failing the request, matching the
/// documented admin endpoint behavior (an unrecognized `sentiment` or an
/// unparseable date bound is silently ignored).
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub sentiment: Option<Sentiment>,
    pub rating: Option<i32>,
    pub ratings: Vec<i32>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub page: i64,
    pub limit: i64,
    pub sort: SortSpec,
}

impl SearchQuery {
    pub fn from_params(params: &AdminQueryParams) -> Self {
        Self {
            q: params.q.clone().filter(|q| !q.is_empty()),
            sentiment: params
                .sentiment
                .as_deref()
                .and_then(|s| s.parse::<Sentiment>().ok()),
            rating: params.rating.as_deref().and_then(|r| r.trim().parse().ok()),
            ratings: params
                .ratings
                .as_deref()
                .map(parse_ratings)
                .unwrap_or_default(),
            from: params.from.as_deref().and_then(parse_date_bound),
            to: params.to.as_deref().and_then(parse_date_bound),
            page: params
                .page
                .as_deref()
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(DEFAULT_PAGE)
                .max(1),
            limit: params
                .limit
                .as_deref()
                .and_then(|l| l.trim().parse().ok())
                .unwrap_or(DEFAULT_LIMIT)
                .max(0),
            sort: SortSpec::parse(params.sort.as_deref()),
        }
    }

    // Saturating: page and limit are caller-supplied and may sit at the
    // far end of i64; an out-of-range page is just an empty page.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

fn parse_ratings(raw: &str) -> Vec<i32> {
    raw.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

// RFC 3339, or a bare date taken as midnight UTC.
fn parse_date_bound(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn build_count(query: &SearchQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM feedback WHERE 1=1");
    push_filters(&mut builder, query);
    builder
}

fn build_select(query: &SearchQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "SELECT {SELECT_COLUMNS} FROM feedback WHERE 1=1"
    ));
    push_filters(&mut builder, query);

    builder.push(" ORDER BY ");
    builder.push(query.sort.sql());
    builder.push(" LIMIT ");
    builder.push_bind(query.limit);
    builder.push(" OFFSET ");
    builder.push_bind(query.offset());
    builder
}

fn push_filters(builder: &mut QueryBuilder<'static, Postgres>, query: &SearchQuery) {
    if let Some(q) = &query.q {
        let pattern = format!("%{}%", escape_like(q));
        builder.push(" AND (message ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR name ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR email ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }

    if let Some(sentiment) = query.sentiment {
        builder.push(" AND sentiment = ");
        builder.push_bind(sentiment.as_str());
    }

    // An exact rating wins over a ratings list when both are supplied.
    if let Some(rating) = query.rating {
        builder.push(" AND rating = ");
        builder.push_bind(rating);
    } else if !query.ratings.is_empty() {
        builder.push(" AND rating = ANY(");
        builder.push_bind(query.ratings.clone());
        builder.push(")");
    }

    if let Some(from) = query.from {
        builder.push(" AND created_at >= ");
        builder.push_bind(from);
    }
    if let Some(to) = query.to {
        builder.push(" AND created_at <= ");
        builder.push_bind(to);
    }
}

// Escape LIKE wildcards so `q` stays a literal substring match.
fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
