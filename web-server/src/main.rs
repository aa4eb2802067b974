use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{any, get, post},
    Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};

use feedback_hub::{
    config::Config, models::AdminQueryParams, models::FeedbackPage, models::FeedbackRecord,
    notify::Notifier, service::FeedbackService, FeedbackError,
};

// Application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<FeedbackService>,
    pub config: Arc<Config>,
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub message: String,
    pub feedback: FeedbackRecord,
}

// Error -> HTTP mapping. Backend detail is logged, never sent to the caller.
struct ApiError(FeedbackError);

impl From<FeedbackError> for ApiError {
    fn from(err: FeedbackError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            FeedbackError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            FeedbackError::Unauthorized => (StatusCode::UNAUTHORIZED, self.0.to_string()),
            FeedbackError::AdminTokenNotConfigured => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string())
            }
            FeedbackError::Database(err) => {
                warn!("backend failure: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "feedback_hub=info,feedback_hub_web_server=info,tower_http=info".into()
            }),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    let pool = feedback_hub::database::connect_pool(&config.database_url).await?;

    let notifier = Notifier::from_config(config.mail.as_ref());
    let service = Arc::new(FeedbackService::new(pool, notifier));

    let state = AppState {
        service,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_router(state: AppState) -> Router {
    Router::new()
        // API routes
        .route("/api/health", get(health_check))
        .route("/api/feedback", post(submit_feedback))
        .route("/api/admin/feedback", get(admin_search))
        // Unknown API paths get a JSON 404 instead of the SPA
        .route("/api/*rest", any(api_not_found))
        // Everything else serves the SPA with an index.html fallback
        .fallback_service(
            ServeDir::new("public").not_found_service(ServeFile::new("public/index.html")),
        )
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

// Health check endpoint
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// POST /api/feedback
/// body: { name?, email?, rating, message, metadata? }
async fn submit_feedback(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let feedback = state.service.submit(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: "Feedback received".to_string(),
            feedback,
        }),
    ))
}

/// GET /api/admin/feedback
/// query: q, sentiment, rating, ratings, from, to, page, limit, sort
/// auth: x-admin-token header or token query parameter
async fn admin_search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<AdminQueryParams>,
) -> Result<Json<FeedbackPage>, ApiError> {
    state
        .config
        .authorize_admin(presented_token(&headers, &params))?;

    let page = state.service.search(&params).await?;
    Ok(Json(page))
}

async fn api_not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "API route not found" })),
    )
}

// Header wins over query parameter when both are present.
fn presented_token<'a>(headers: &'a HeaderMap, params: &'a AdminQueryParams) -> Option<&'a str> {
    headers
        .get("x-admin-token")
        .and_then(|v| v.to_str().ok())
        .or(params.token.as_deref())
}
