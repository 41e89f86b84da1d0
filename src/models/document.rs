use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::DocumentType;

/// A generated legal document. Produced by the document-generation flow,
/// unrelated to the contract review lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Generated markdown body.
    pub content: String,
    pub document_type: DocumentType,
    pub jurisdiction: Option<String>,
    pub effective_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
