//! Signed-URL file delivery.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

/// `GET /files/signed/:token` — fetch a stored object through a signed URL.
///
/// No bearer auth here; the token is the credential. Expired and unknown
/// tokens fail with 410 and 404 respectively.
pub async fn fetch_signed(
    State(ctx): State<ApiContext>,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    let (key, bytes) = ctx.store.resolve_signed_entry(&token)?;
    let content_type = mime_guess::from_path(&key).first_or_octet_stream();

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        bytes,
    )
        .into_response())
}
