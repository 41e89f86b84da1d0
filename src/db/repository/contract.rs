use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::ContractStatus;
use crate::models::Contract;

const SELECT_COLS: &str = "id, user_id, file_name, file_path, file_type, file_size, status,
     created_at, updated_at";

pub fn insert_contract(conn: &Connection, contract: &Contract) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO contracts (id, user_id, file_name, file_path, file_type, file_size, status,
         created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            contract.id.to_string(),
            contract.user_id.to_string(),
            contract.file_name,
            contract.file_path,
            contract.file_type,
            contract.file_size as i64,
            contract.status.as_str(),
            contract.created_at.to_string(),
            contract.updated_at.to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_contract(conn: &Connection, id: &Uuid) -> Result<Option<Contract>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {SELECT_COLS} FROM contracts WHERE id = ?1"))?;

    let result = stmt.query_row(params![id.to_string()], map_row);
    match result {
        Ok(row) => Ok(Some(contract_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// List a user's contracts, newest first.
pub fn get_contracts_for_user(
    conn: &Connection,
    user_id: &Uuid,
) -> Result<Vec<Contract>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLS} FROM contracts WHERE user_id = ?1 ORDER BY created_at DESC"
    ))?;
    let rows = stmt.query_map(params![user_id.to_string()], map_row)?;

    let mut contracts = Vec::new();
    for row in rows {
        contracts.push(contract_from_row(row?)?);
    }
    Ok(contracts)
}

/// Case-insensitive file-name search within a user's contracts, newest first.
pub fn search_contracts(
    conn: &Connection,
    user_id: &Uuid,
    query: &str,
) -> Result<Vec<Contract>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLS} FROM contracts
         WHERE user_id = ?1 AND file_name LIKE ?2 ESCAPE '\\'
         ORDER BY created_at DESC"
    ))?;
    let pattern = format!("%{}%", query.replace('%', "\\%").replace('_', "\\_"));
    let rows = stmt.query_map(params![user_id.to_string(), pattern], map_row)?;

    let mut contracts = Vec::new();
    for row in rows {
        contracts.push(contract_from_row(row?)?);
    }
    Ok(contracts)
}

/// Conditionally transition a contract's status.
///
/// The write succeeds only when the current status equals `from`, so two
/// racing callers cannot both enter the same transition: exactly one sees
/// `true`, the other gets a definite conflict (`false`) instead of silently
/// proceeding.
pub fn update_status_if(
    conn: &Connection,
    id: &Uuid,
    from: ContractStatus,
    to: ContractStatus,
) -> Result<bool, DatabaseError> {
    let rows = conn.execute(
        "UPDATE contracts SET status = ?3, updated_at = ?4 WHERE id = ?1 AND status = ?2",
        params![
            id.to_string(),
            from.as_str(),
            to.as_str(),
            super::now().to_string(),
        ],
    )?;
    Ok(rows == 1)
}

/// Unconditional status write. Used only for the best-effort rollback to
/// `pending` after a failed review attempt.
pub fn force_status(
    conn: &Connection,
    id: &Uuid,
    status: ContractStatus,
) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE contracts SET status = ?2, updated_at = ?3 WHERE id = ?1",
        params![id.to_string(), status.as_str(), super::now().to_string()],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Contract".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

// Internal row type for Contract mapping
struct ContractRow {
    id: String,
    user_id: String,
    file_name: String,
    file_path: String,
    file_type: String,
    file_size: i64,
    status: String,
    created_at: String,
    updated_at: String,
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ContractRow> {
    Ok(ContractRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        file_name: row.get(2)?,
        file_path: row.get(3)?,
        file_type: row.get(4)?,
        file_size: row.get(5)?,
        status: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn contract_from_row(row: ContractRow) -> Result<Contract, DatabaseError> {
    Ok(Contract {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        user_id: Uuid::parse_str(&row.user_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        file_name: row.file_name,
        file_path: row.file_path,
        file_type: row.file_type,
        file_size: row.file_size.max(0) as u64,
        status: ContractStatus::from_str(&row.status)?,
        created_at: super::parse_datetime(&row.created_at),
        updated_at: super::parse_datetime(&row.updated_at),
    })
}
