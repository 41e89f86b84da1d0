use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::ContractStatus;

/// An uploaded contract file and its review lifecycle.
///
/// `status` is owned by the review workflow: pending → in_review → completed,
/// reverting to pending when a review attempt fails partway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    /// Object-store key, `{user_id}/{random}.{ext}`.
    pub file_path: String,
    /// MIME type as uploaded.
    pub file_type: String,
    pub file_size: u64,
    pub status: ContractStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// The persisted output of an AI review. Written once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractReview {
    pub id: Uuid,
    pub contract_id: Uuid,
    /// Report text from the review adapter, stored verbatim.
    pub content: String,
    pub created_at: NaiveDateTime,
}
