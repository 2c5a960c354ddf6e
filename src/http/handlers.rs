use super::state::AppState;
use crate::collector::{InboundEvent, Ingest};
use crate::error::InsightError;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordEntryRequest {
    /// Chat the note belongs to (must be the allow-listed one)
    pub chat_id: i64,

    /// Note text
    pub text: String,

    /// Receipt time (defaults to now)
    pub received_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Chat issuing the command
    pub chat_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub retryable: bool,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, retryable: bool) -> Json<Self> {
        Json(Self {
            error: error.into(),
            retryable,
        })
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Reject requests without the configured bearer token
///
/// The `chat_id` in a request body is only trusted once the caller has
/// proven it holds the token. With no token configured every request passes.
pub async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.auth_token.as_deref() else {
        return next.run(request).await;
    };

    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if presented == Some(expected) {
        return next.run(request).await;
    }

    warn!(
        "Rejected unauthenticated {} {}",
        request.method(),
        request.uri().path()
    );
    (
        StatusCode::UNAUTHORIZED,
        ErrorResponse::new("Missing or invalid bearer token", false),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /buffer
/// Statistics for today's buffer
pub async fn get_buffer(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.orchestrator.stats().await;
    (StatusCode::OK, Json(stats))
}

/// POST /entries
/// Record a note for the allow-listed chat
pub async fn record_entry(
    State(state): State<AppState>,
    Json(req): Json<RecordEntryRequest>,
) -> impl IntoResponse {
    let event = InboundEvent {
        chat_id: req.chat_id,
        text: req.text,
        received_at: req.received_at.unwrap_or_else(Utc::now),
    };

    match state.collector.ingest(&event).await {
        outcome @ Ingest::Recorded { .. } => (StatusCode::ACCEPTED, Json(outcome)).into_response(),
        outcome @ Ingest::Ignored => (StatusCode::OK, Json(outcome)).into_response(),
        Ingest::ForeignChat => {
            warn!("Rejected entry from chat {}", req.chat_id);
            (
                StatusCode::FORBIDDEN,
                ErrorResponse::new(format!("Chat {} is not allowed", req.chat_id), false),
            )
                .into_response()
        }
    }
}

/// POST /analyze
/// Analyze and flush today's notes
pub async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    info!("Analyze requested over HTTP by chat {}", req.chat_id);

    match state.orchestrator.handle_analyze(req.chat_id).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e @ InsightError::Permission(_)) => {
            (StatusCode::FORBIDDEN, ErrorResponse::new(e.to_string(), false)).into_response()
        }
        Err(e @ InsightError::Analysis(_)) => {
            error!("Analysis failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                ErrorResponse::new(e.to_string(), e.is_retryable()),
            )
                .into_response()
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
