use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::{ReportSeverity, ReportStatus};
use crate::models::CorruptionReport;

pub fn insert_report(conn: &Connection, report: &CorruptionReport) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO corruption_reports (id, user_id, title, content, severity, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            report.id.to_string(),
            report.user_id.to_string(),
            report.title,
            report.content,
            report.severity.as_str(),
            report.status.as_str(),
            report.created_at.to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_report(conn: &Connection, id: &Uuid) -> Result<Option<CorruptionReport>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id, user_id, title, content, severity, status, created_at
         FROM corruption_reports WHERE id = ?1",
        params![id.to_string()],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        },
    );
    match result {
        Ok((id, user_id, title, content, severity, status, created_at)) => {
            Ok(Some(CorruptionReport {
                id: Uuid::parse_str(&id)
                    .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
                user_id: Uuid::parse_str(&user_id)
                    .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
                title,
                content,
                severity: ReportSeverity::from_str(&severity)?,
                status: ReportStatus::from_str(&status)?,
                created_at: super::parse_datetime(&created_at),
            }))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// List a user's reports, newest first.
pub fn get_reports_for_user(
    conn: &Connection,
    user_id: &Uuid,
) -> Result<Vec<CorruptionReport>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, title, content, severity, status, created_at
         FROM corruption_reports WHERE user_id = ?1 ORDER BY created_at DESC",
    )?;
    let rows = stmt.query_map(params![user_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, String>(6)?,
        ))
    })?;

    let mut reports = Vec::new();
    for row in rows {
        let (id, user_id, title, content, severity, status, created_at) = row?;
        reports.push(CorruptionReport {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            title,
            content,
            severity: ReportSeverity::from_str(&severity)?,
            status: ReportStatus::from_str(&status)?,
            created_at: super::parse_datetime(&created_at),
        });
    }
    Ok(reports)
}

pub fn update_report_status(
    conn: &Connection,
    id: &Uuid,
    status: ReportStatus,
) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE corruption_reports SET status = ?2 WHERE id = ?1",
        params![id.to_string(), status.as_str()],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "CorruptionReport".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn make_report(user_id: Uuid, severity: ReportSeverity) -> CorruptionReport {
        CorruptionReport {
            id: Uuid::new_v4(),
            user_id,
            title: "Procurement irregularity".into(),
            content: "Tender awarded without public notice.".into(),
            severity,
            status: ReportStatus::PendingReview,
            created_at: crate::db::repository::now(),
        }
    }

    #[test]
    fn insert_and_list_round_trip() {
        let conn = open_in_memory().unwrap();
        let user = Uuid::new_v4();
        insert_report(&conn, &make_report(user, ReportSeverity::High)).unwrap();
        insert_report(&conn, &make_report(user, ReportSeverity::Low)).unwrap();

        let reports = get_reports_for_user(&conn, &user).unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports
            .iter()
            .all(|r| r.status == ReportStatus::PendingReview));
    }

    #[test]
    fn status_progression_persists() {
        let conn = open_in_memory().unwrap();
        let user = Uuid::new_v4();
        let report = make_report(user, ReportSeverity::Medium);
        insert_report(&conn, &report).unwrap();

        update_report_status(&conn, &report.id, ReportStatus::UnderInvestigation).unwrap();
        let reports = get_reports_for_user(&conn, &user).unwrap();
        assert_eq!(reports[0].status, ReportStatus::UnderInvestigation);
    }

    #[test]
    fn updating_missing_report_is_not_found() {
        let conn = open_in_memory().unwrap();
        let err = update_report_status(&conn, &Uuid::new_v4(), ReportStatus::Resolved).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }
}
