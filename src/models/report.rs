use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{ReportSeverity, ReportStatus};

/// A user-filed corruption report. Independent of the review workflow;
/// status moves pending_review → under_investigation → resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorruptionReport {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub severity: ReportSeverity,
    pub status: ReportStatus,
    pub created_at: NaiveDateTime,
}
