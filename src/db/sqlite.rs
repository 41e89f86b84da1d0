use std::path::Path;

use rusqlite::Connection;

use super::DatabaseError;

/// Current schema version, written to `PRAGMA user_version`.
const SCHEMA_VERSION: i64 = 1;

/// Open (and if necessary create) the legalis database at `path`.
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?;
    }
    let conn = Connection::open(path)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Open an in-memory database with the full schema. Test helper.
pub fn open_in_memory() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

fn init_schema(conn: &Connection) -> Result<(), DatabaseError> {
    conn.pragma_update(None, "foreign_keys", "ON")?;

    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version >= SCHEMA_VERSION {
        return Ok(());
    }

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS contracts (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL,
            file_name   TEXT NOT NULL,
            file_path   TEXT NOT NULL,
            file_type   TEXT NOT NULL,
            file_size   INTEGER NOT NULL,
            status      TEXT NOT NULL DEFAULT 'pending',
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_contracts_user ON contracts(user_id, created_at DESC);

        CREATE TABLE IF NOT EXISTS contract_reviews (
            id          TEXT PRIMARY KEY,
            contract_id TEXT NOT NULL REFERENCES contracts(id),
            content     TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_reviews_contract ON contract_reviews(contract_id);

        CREATE TABLE IF NOT EXISTS documents (
            id             TEXT PRIMARY KEY,
            user_id        TEXT NOT NULL,
            title          TEXT NOT NULL,
            description    TEXT,
            content        TEXT NOT NULL,
            document_type  TEXT NOT NULL,
            jurisdiction   TEXT,
            effective_date TEXT,
            created_at     TEXT NOT NULL,
            updated_at     TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_documents_user ON documents(user_id, created_at DESC);

        CREATE TABLE IF NOT EXISTS corruption_reports (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL,
            title       TEXT NOT NULL,
            content     TEXT NOT NULL,
            severity    TEXT NOT NULL,
            status      TEXT NOT NULL DEFAULT 'pending_review',
            created_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_reports_user ON corruption_reports(user_id, created_at DESC);

        CREATE TABLE IF NOT EXISTS sessions (
            token_hash  TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );",
    )?;

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_schema_initializes() {
        let conn = open_in_memory().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(count >= 5, "expected all tables, got {count}");
    }

    #[test]
    fn schema_init_is_idempotent() {
        let conn = open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn open_database_creates_parent_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested/dir/legalis.db");
        let conn = open_database(&path).unwrap();
        drop(conn);
        assert!(path.exists());
    }
}
