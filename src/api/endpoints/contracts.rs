//! Contract upload, listing and review endpoints.

use axum::extract::{Multipart, Path, Query, State};
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthUser};
use crate::config::{ACCEPTED_UPLOAD_TYPES, MAX_UPLOAD_BYTES};
use crate::db::repository::{contract, review};
use crate::models::enums::ContractStatus;
use crate::models::{Contract, ContractReview};

#[derive(Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
}

#[derive(Serialize)]
pub struct ContractListResponse {
    pub contracts: Vec<Contract>,
}

#[derive(Serialize)]
pub struct ReviewResponse {
    pub contract_id: Uuid,
    pub content: String,
}

/// `POST /api/contracts` — upload a contract file (multipart).
///
/// The size and MIME gates run before anything touches the object store
/// or the database; a rejected upload leaves no trace.
pub async fn upload(
    State(ctx): State<ApiContext>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<Json<Contract>, ApiError> {
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::BadRequest("File part needs a filename".into()))?;
        let content_type = field
            .content_type()
            .map(str::to_string)
            .ok_or_else(|| ApiError::BadRequest("File part needs a content type".into()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Could not read file part: {e}")))?;
        file = Some((file_name, content_type, bytes.to_vec()));
    }

    let (file_name, content_type, bytes) =
        file.ok_or_else(|| ApiError::BadRequest("Missing file part".into()))?;

    if !ACCEPTED_UPLOAD_TYPES.contains(&content_type.as_str()) {
        return Err(ApiError::UnsupportedFileType(content_type));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::FileTooLarge);
    }

    let key = ctx.store.store(&user_id, &file_name, &bytes)?;

    let now = crate::db::repository::now();
    let record = Contract {
        id: Uuid::new_v4(),
        user_id,
        file_name,
        file_path: key,
        file_type: content_type,
        file_size: bytes.len() as u64,
        status: ContractStatus::Pending,
        created_at: now,
        updated_at: now,
    };
    {
        let conn = ctx
            .db
            .lock()
            .map_err(|_| ApiError::Internal("db lock".into()))?;
        contract::insert_contract(&conn, &record)?;
    }

    tracing::info!(contract_id = %record.id, user_id = %user_id, size = record.file_size, "Contract uploaded");
    Ok(Json(record))
}

/// `GET /api/contracts` — list the caller's contracts, optionally filtered
/// by a case-insensitive file-name search.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Query(params): Query<ListParams>,
) -> Result<Json<ContractListResponse>, ApiError> {
    let conn = ctx
        .db
        .lock()
        .map_err(|_| ApiError::Internal("db lock".into()))?;
    let contracts = match params.search.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => contract::search_contracts(&conn, &user_id, q)?,
        _ => contract::get_contracts_for_user(&conn, &user_id)?,
    };
    Ok(Json(ContractListResponse { contracts }))
}

/// `POST /api/contracts/:id/review` — run (or replay) the review workflow.
pub async fn start_review(
    State(ctx): State<ApiContext>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewResponse>, ApiError> {
    require_ownership(&ctx, &user_id, &id)?;

    let content = ctx.workflow.review_contract(&id).await?;
    Ok(Json(ReviewResponse {
        contract_id: id,
        content,
    }))
}

/// `GET /api/contracts/:id/review` — fetch the stored review, if any.
pub async fn get_review(
    State(ctx): State<ApiContext>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContractReview>, ApiError> {
    require_ownership(&ctx, &user_id, &id)?;

    let conn = ctx
        .db
        .lock()
        .map_err(|_| ApiError::Internal("db lock".into()))?;
    let stored = review::get_review_for_contract(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("No review for this contract".into()))?;
    Ok(Json(stored))
}

// Another user's contract is indistinguishable from a missing one.
fn require_ownership(ctx: &ApiContext, user_id: &Uuid, id: &Uuid) -> Result<(), ApiError> {
    let conn = ctx
        .db
        .lock()
        .map_err(|_| ApiError::Internal("db lock".into()))?;
    let owned = contract::get_contract(&conn, id)?
        .map(|c| c.user_id == *user_id)
        .unwrap_or(false);
    if !owned {
        return Err(ApiError::NotFound("Contract not found".into()));
    }
    Ok(())
}
