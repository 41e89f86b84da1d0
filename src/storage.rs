//! Filesystem-backed object store for uploaded contract files.
//!
//! Objects are keyed `{user_id}/{random}.{ext}` under a base directory.
//! Reads from outside the service go through signed URLs: opaque random
//! tokens mapped to an object key with a fixed expiry. The review workflow
//! resolves the same tokens, so the signed-URL validity bounds how long
//! extraction may take.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use base64::Engine;
use rand::Rng;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Signed URL is unknown")]
    UnknownToken,

    #[error("Signed URL has expired")]
    UrlExpired,

    #[error("Internal lock error")]
    LockPoisoned,
}

/// A time-limited grant of read access to one stored object.
#[derive(Debug, Clone)]
pub struct SignedUrl {
    pub token: String,
    /// Path clients fetch, relative to the API root.
    pub url: String,
    pub expires_in_secs: u64,
}

struct SignedEntry {
    key: String,
    expires_at: Instant,
}

/// Filesystem object store with in-memory signed-URL issuance.
pub struct ObjectStore {
    base_dir: PathBuf,
    signed: Mutex<HashMap<String, SignedEntry>>,
}

impl ObjectStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            signed: Mutex::new(HashMap::new()),
        }
    }

    /// Store `bytes` for `user_id`, deriving the extension from `file_name`.
    /// Returns the object key.
    pub fn store(
        &self,
        user_id: &Uuid,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin")
            .to_ascii_lowercase();
        let random: String = rand::thread_rng()
            .sample_iter(rand::distributions::Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();
        let key = format!("{user_id}/{random}.{ext}");

        let full = self.full_path(&key)?;
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full, bytes)?;
        tracing::debug!(key = %key, size = bytes.len(), "Stored object");
        Ok(key)
    }

    /// Read an object directly by key. Internal use; external reads go
    /// through signed URLs.
    pub fn read(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let full = self.full_path(key)?;
        match std::fs::read(&full) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Issue a signed URL for `key`, valid for `ttl_secs` seconds.
    pub fn create_signed_url(&self, key: &str, ttl_secs: u64) -> Result<SignedUrl, StorageError> {
        // Fail fast on dangling keys rather than minting a URL to nothing
        let full = self.full_path(key)?;
        if !full.exists() {
            return Err(StorageError::NotFound(key.to_string()));
        }

        let bytes: [u8; 24] = rand::random();
        let token = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes);

        let mut signed = self.signed.lock().map_err(|_| StorageError::LockPoisoned)?;
        signed.insert(
            token.clone(),
            SignedEntry {
                key: key.to_string(),
                expires_at: Instant::now() + Duration::from_secs(ttl_secs),
            },
        );

        Ok(SignedUrl {
            url: format!("/files/signed/{token}"),
            token,
            expires_in_secs: ttl_secs,
        })
    }

    /// Resolve a signed-URL token to the object's bytes, enforcing expiry.
    /// Expired entries are evicted here; there is no background sweeper.
    pub fn resolve_signed(&self, token: &str) -> Result<Vec<u8>, StorageError> {
        self.resolve_signed_entry(token).map(|(_, bytes)| bytes)
    }

    /// Like [`resolve_signed`](Self::resolve_signed), but also returns the
    /// object key so callers can derive a content type from the extension.
    pub fn resolve_signed_entry(&self, token: &str) -> Result<(String, Vec<u8>), StorageError> {
        let key = {
            let mut signed = self.signed.lock().map_err(|_| StorageError::LockPoisoned)?;
            let entry = signed.get(token).ok_or(StorageError::UnknownToken)?;
            if Instant::now() >= entry.expires_at {
                signed.remove(token);
                return Err(StorageError::UrlExpired);
            }
            entry.key.clone()
        };
        let bytes = self.read(&key)?;
        Ok((key, bytes))
    }

    // Reject traversal components so a key can never escape the base dir.
    fn full_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let rel = Path::new(key);
        let ok = rel.components().all(|c| matches!(c, Component::Normal(_)));
        if !ok || key.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.base_dir.join(rel))
    }
}
