use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::ContractReview;

pub fn insert_review(conn: &Connection, review: &ContractReview) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO contract_reviews (id, contract_id, content, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            review.id.to_string(),
            review.contract_id.to_string(),
            review.content,
            review.created_at.to_string(),
        ],
    )
    .map_err(|e| match e {
        // UNIQUE(contract_id): a second review for the same contract
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            DatabaseError::ConstraintViolation(format!(
                "review already exists for contract {}",
                review.contract_id
            ))
        }
        other => other.into(),
    })?;
    Ok(())
}

pub fn get_review_for_contract(
    conn: &Connection,
    contract_id: &Uuid,
) -> Result<Option<ContractReview>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, contract_id, content, created_at
         FROM contract_reviews WHERE contract_id = ?1",
    )?;

    let result = stmt.query_row(params![contract_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    });

    match result {
        Ok((id, contract_id, content, created_at)) => Ok(Some(ContractReview {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            contract_id: Uuid::parse_str(&contract_id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            content,
            created_at: super::parse_datetime(&created_at),
        })),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn count_reviews_for_contract(
    conn: &Connection,
    contract_id: &Uuid,
) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM contract_reviews WHERE contract_id = ?1",
        params![contract_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}
