//! Bearer-token session records.
//!
//! Only token hashes are stored; the cleartext token exists solely in the
//! response that hands it to the client. Identity provisioning itself
//! (signup, password flows) lives outside this service.

use base64::Engine;
use rusqlite::{params, Connection};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::db::DatabaseError;

/// Hash a bearer token with SHA-256, hex-encoded for storage.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Generate a random bearer token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Create a session for `user_id` and return the cleartext bearer token.
pub fn create_session(conn: &Connection, user_id: &Uuid) -> Result<String, DatabaseError> {
    let token = generate_token();
    conn.execute(
        "INSERT INTO sessions (token_hash, user_id, created_at) VALUES (?1, ?2, ?3)",
        params![
            hash_token(&token),
            user_id.to_string(),
            super::now().to_string(),
        ],
    )?;
    Ok(token)
}

/// Resolve a bearer token to its user. `None` for unknown tokens.
pub fn resolve_token(conn: &Connection, token: &str) -> Result<Option<Uuid>, DatabaseError> {
    let result = conn.query_row(
        "SELECT user_id FROM sessions WHERE token_hash = ?1",
        params![hash_token(token)],
        |row| row.get::<_, String>(0),
    );
    match result {
        Ok(user_id) => Ok(Some(Uuid::parse_str(&user_id).map_err(|e| {
            DatabaseError::ConstraintViolation(e.to_string())
        })?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
