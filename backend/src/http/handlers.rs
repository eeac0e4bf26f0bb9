//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer for business logic.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{HealthResponse, ResolveRequest, ResolveResponse, WaitlistResponse};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::models::CourseKey;
use crate::services::{self, proposals_to_csv, report_file_name};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Verify the service is running and the repository is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let repo_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        repository: repo_status,
    }))
}

// =============================================================================
// Waitlist Resolution
// =============================================================================

/// POST /v1/waitlist/resolve
///
/// Propose overflow slots for a course's waitlisted students.
pub async fn resolve_waitlist(
    State(state): State<AppState>,
    payload: Result<Json<ResolveRequest>, JsonRejection>,
) -> HandlerResult<ResolveResponse> {
    let Json(request) = payload?;
    tracing::info!(
        subject = %request.subject,
        catalog = %request.catalog,
        students = request.students.len(),
        "Resolving waitlist"
    );

    let outcome = services::resolve_waitlist(
        state.repository.as_ref(),
        state.engine.clone(),
        &state.proposals,
        request,
    )
    .await
    .inspect_err(|e| tracing::warn!("Waitlist resolution failed: {}", e))?;

    Ok(Json(ResolveResponse::from(&outcome.resolution)))
}

// =============================================================================
// Support Queries
// =============================================================================

/// GET /v1/courses/{subject}/{catalog}/waitlist
///
/// Waitlisted students of a course, in registration order.
pub async fn get_course_waitlist(
    State(state): State<AppState>,
    Path((subject, catalog)): Path<(String, String)>,
) -> HandlerResult<WaitlistResponse> {
    let (key, students) =
        services::course_waitlist(state.repository.as_ref(), &subject, &catalog).await?;
    Ok(Json(WaitlistResponse::new(key, students)))
}

/// GET /v1/courses/{subject}/{catalog}/proposals/export
///
/// Download the last computed proposals of a course as CSV.
pub async fn export_proposals(
    State(state): State<AppState>,
    Path((subject, catalog)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let key = CourseKey::new(&subject, &catalog)
        .ok_or_else(|| AppError::BadRequest("subject and catalog are required".to_string()))?;
    let stored = state
        .proposals
        .get(&key)
        .ok_or_else(|| AppError::NotFound(format!("No proposals computed for {}", key)))?;

    let body = proposals_to_csv(&stored)?;
    let disposition = format!("attachment; filename=\"{}\"", report_file_name(&stored));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
