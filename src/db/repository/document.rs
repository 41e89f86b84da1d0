use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::DocumentType;
use crate::models::Document;

const SELECT_COLS: &str = "id, user_id, title, description, content, document_type, jurisdiction,
     effective_date, created_at, updated_at";

pub fn insert_document(conn: &Connection, doc: &Document) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO documents (id, user_id, title, description, content, document_type,
         jurisdiction, effective_date, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            doc.id.to_string(),
            doc.user_id.to_string(),
            doc.title,
            doc.description,
            doc.content,
            doc.document_type.as_str(),
            doc.jurisdiction,
            doc.effective_date.map(|d| d.to_string()),
            doc.created_at.to_string(),
            doc.updated_at.to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_document(conn: &Connection, id: &Uuid) -> Result<Option<Document>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {SELECT_COLS} FROM documents WHERE id = ?1"))?;

    let result = stmt.query_row(params![id.to_string()], map_row);
    match result {
        Ok(row) => Ok(Some(document_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// List a user's generated documents, newest first.
pub fn get_documents_for_user(
    conn: &Connection,
    user_id: &Uuid,
) -> Result<Vec<Document>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLS} FROM documents WHERE user_id = ?1 ORDER BY created_at DESC"
    ))?;
    let rows = stmt.query_map(params![user_id.to_string()], map_row)?;

    let mut docs = Vec::new();
    for row in rows {
        docs.push(document_from_row(row?)?);
    }
    Ok(docs)
}

struct DocumentRow {
    id: String,
    user_id: String,
    title: String,
    description: Option<String>,
    content: String,
    document_type: String,
    jurisdiction: Option<String>,
    effective_date: Option<String>,
    created_at: String,
    updated_at: String,
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentRow> {
    Ok(DocumentRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        content: row.get(4)?,
        document_type: row.get(5)?,
        jurisdiction: row.get(6)?,
        effective_date: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn document_from_row(row: DocumentRow) -> Result<Document, DatabaseError> {
    Ok(Document {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        user_id: Uuid::parse_str(&row.user_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        title: row.title,
        description: row.description,
        content: row.content,
        document_type: DocumentType::from_str(&row.document_type)?,
        jurisdiction: row.jurisdiction,
        effective_date: row
            .effective_date
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        created_at: super::parse_datetime(&row.created_at),
        updated_at: super::parse_datetime(&row.updated_at),
    })
}
