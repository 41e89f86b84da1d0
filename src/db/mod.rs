pub mod repository;
pub mod sqlite;

pub use repository::*;
pub use sqlite::*;

use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Shared connection handle. Guards are held only for individual statements,
/// never across an await point.
pub type Db = Arc<Mutex<rusqlite::Connection>>;

/// Wrap a connection for shared use.
pub fn shared(conn: rusqlite::Connection) -> Db {
    Arc::new(Mutex::new(conn))
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),
}
