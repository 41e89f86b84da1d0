//! Legal document generation endpoints.

use axum::extract::State;
use axum::Extension;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthUser};
use crate::db::repository::document;
use crate::documents::DocumentRequest;
use crate::models::Document;

#[derive(Serialize)]
pub struct DocumentListResponse {
    pub documents: Vec<Document>,
}

/// `POST /api/documents` — generate and persist a legal document.
pub async fn generate(
    State(ctx): State<ApiContext>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(request): Json<DocumentRequest>,
) -> Result<Json<Document>, ApiError> {
    if request.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title must not be empty".into()));
    }
    let doc = ctx.documents.generate(&user_id, request).await?;
    Ok(Json(doc))
}

/// `GET /api/documents` — list the caller's generated documents.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<DocumentListResponse>, ApiError> {
    let conn = ctx
        .db
        .lock()
        .map_err(|_| ApiError::Internal("db lock".into()))?;
    let documents = document::get_documents_for_user(&conn, &user_id)?;
    Ok(Json(DocumentListResponse { documents }))
}
