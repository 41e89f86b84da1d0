//! Corruption report endpoints.

use axum::extract::State;
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthUser};
use crate::db::repository::report;
use crate::models::enums::{ReportSeverity, ReportStatus};
use crate::models::CorruptionReport;

#[derive(Deserialize)]
pub struct CreateReportRequest {
    pub title: String,
    pub content: String,
    pub severity: ReportSeverity,
}

#[derive(Serialize)]
pub struct ReportListResponse {
    pub reports: Vec<CorruptionReport>,
}

/// `POST /api/reports` — file a corruption report. New reports always enter
/// as pending_review.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(request): Json<CreateReportRequest>,
) -> Result<Json<CorruptionReport>, ApiError> {
    if request.title.trim().is_empty() || request.content.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Title and content must not be empty".into(),
        ));
    }

    let record = CorruptionReport {
        id: Uuid::new_v4(),
        user_id,
        title: request.title,
        content: request.content,
        severity: request.severity,
        status: ReportStatus::PendingReview,
        created_at: crate::db::repository::now(),
    };
    {
        let conn = ctx
            .db
            .lock()
            .map_err(|_| ApiError::Internal("db lock".into()))?;
        report::insert_report(&conn, &record)?;
    }

    tracing::info!(report_id = %record.id, severity = record.severity.as_str(), "Corruption report filed");
    Ok(Json(record))
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ReportStatus,
}

/// `PATCH /api/reports/:id/status` — advance a report's status.
pub async fn update_status(
    State(ctx): State<ApiContext>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    axum::extract::Path(id): axum::extract::Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<CorruptionReport>, ApiError> {
    let conn = ctx
        .db
        .lock()
        .map_err(|_| ApiError::Internal("db lock".into()))?;

    // A foreign report is indistinguishable from a missing one
    let owned = report::get_report(&conn, &id)?
        .map(|r| r.user_id == user_id)
        .unwrap_or(false);
    if !owned {
        return Err(ApiError::NotFound("Report not found".into()));
    }

    report::update_report_status(&conn, &id, request.status)?;
    let updated = report::get_report(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("Report not found".into()))?;
    Ok(Json(updated))
}

/// `GET /api/reports` — list the caller's reports, newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<ReportListResponse>, ApiError> {
    let conn = ctx
        .db
        .lock()
        .map_err(|_| ApiError::Internal("db lock".into()))?;
    let reports = report::get_reports_for_user(&conn, &user_id)?;
    Ok(Json(ReportListResponse { reports }))
}
