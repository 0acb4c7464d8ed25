//! Untyped-row to domain-entity conversion.
//!
//! This is the single point where store rows become tagged domain
//! entities. Enum columns that fail to parse reject the whole row with
//! [`DbError::Conversion`]; display-only optional columns default to
//! `None`. Call sites never pattern-match raw columns themselves.

use std::str::FromStr;

use casetrack_case_models::{
    Case, CaseHistoryEntry, CasePriority, CaseProgress, CaseStatus, CrimeReport, JudiciaryStatus,
    ReportStatus, Station, User, UserRole,
};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::Row;

use crate::DbError;

/// Reads a required `TEXT` column.
fn req_string(row: &Row, col: &str) -> Result<String, DbError> {
    row.to_value(col).map_err(|e| DbError::conversion(col, e))
}

/// Reads an optional `TEXT` column, defaulting to `None`.
fn opt_string(row: &Row, col: &str) -> Option<String> {
    row.to_value(col).unwrap_or(None)
}

/// Reads an `INTEGER` column as a `bool` (non-zero = true).
fn req_bool(row: &Row, col: &str) -> Result<bool, DbError> {
    let raw: i64 = row.to_value(col).map_err(|e| DbError::conversion(col, e))?;
    Ok(raw != 0)
}

/// Parses a required enum column via its `FromStr` implementation.
fn req_enum<T>(row: &Row, col: &str) -> Result<T, DbError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = req_string(row, col)?;
    raw.parse()
        .map_err(|e| DbError::conversion(col, format!("unrecognized value '{raw}': {e}")))
}

/// Parses an optional enum column; `NULL` maps to `None`, an unparsable
/// value rejects the row.
fn opt_enum<T>(row: &Row, col: &str) -> Result<Option<T>, DbError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match opt_string(row, col) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| DbError::conversion(col, format!("unrecognized value '{raw}': {e}"))),
    }
}

/// Converts a `users` row into a [`User`].
///
/// The derived `assigned_cases` count starts at zero; the dashboard
/// aggregator fills it in.
///
/// # Errors
///
/// Returns [`DbError::Conversion`] if a required column is missing or an
/// enum column fails to parse.
pub fn user_from_row(row: &Row) -> Result<User, DbError> {
    Ok(User {
        id: req_string(row, "id")?,
        name: req_string(row, "full_name")?,
        email: req_string(row, "email")?,
        role: req_enum::<UserRole>(row, "role")?,
        station_id: opt_string(row, "station_id"),
        status: opt_enum(row, "status")?,
        badge_number: opt_string(row, "badge_number"),
        assigned_cases: 0,
    })
}

/// Converts a `reports` row into a [`CrimeReport`].
///
/// # Errors
///
/// Returns [`DbError::Conversion`] if a required column is missing or the
/// status column fails to parse.
pub fn report_from_row(row: &Row) -> Result<CrimeReport, DbError> {
    Ok(CrimeReport {
        id: req_string(row, "id")?,
        title: req_string(row, "title")?,
        description: req_string(row, "description")?,
        status: req_enum::<ReportStatus>(row, "status")?,
        created_by_id: req_string(row, "reporter_id")?,
        created_at: req_string(row, "created_at")?,
        location: opt_string(row, "location"),
        category: opt_string(row, "category"),
        station_id: opt_string(row, "station_id"),
    })
}

/// Converts a `cases` row into a [`Case`].
///
/// # Errors
///
/// Returns [`DbError::Conversion`] if a required column is missing or an
/// enum column fails to parse.
pub fn case_from_row(row: &Row) -> Result<Case, DbError> {
    Ok(Case {
        id: req_string(row, "id")?,
        report_id: req_string(row, "report_id")?,
        assigned_officer_id: opt_string(row, "assigned_officer_id"),
        progress: req_enum::<CaseProgress>(row, "progress")?,
        status: req_enum::<CaseStatus>(row, "status")?,
        station: req_string(row, "station")?,
        priority: req_enum::<CasePriority>(row, "priority")?,
        created_at: req_string(row, "created_at")?,
        updated_at: req_string(row, "updated_at")?,
        submitted_to_judiciary: req_bool(row, "submitted_to_judiciary")?,
        judiciary_status: opt_enum::<JudiciaryStatus>(row, "judiciary_status")?,
    })
}

/// Converts a `case_history` row into a [`CaseHistoryEntry`].
///
/// # Errors
///
/// Returns [`DbError::Conversion`] if a required column is missing.
pub fn history_from_row(row: &Row) -> Result<CaseHistoryEntry, DbError> {
    Ok(CaseHistoryEntry {
        case_id: req_string(row, "case_id")?,
        updated_by: req_string(row, "updated_by")?,
        status_before: req_string(row, "status_before")?,
        status_after: req_string(row, "status_after")?,
        update_note: opt_string(row, "update_note"),
        created_at: req_string(row, "created_at")?,
    })
}

/// Converts a `stations` row into a [`Station`].
///
/// # Errors
///
/// Returns [`DbError::Conversion`] if a required column is missing.
pub fn station_from_row(row: &Row) -> Result<Station, DbError> {
    Ok(Station {
        id: req_string(row, "id")?,
        name: req_string(row, "name")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{cases, db, schema};

    #[tokio::test]
    async fn case_row_roundtrip() {
        let db = db::open_sqlite(None).unwrap();
        schema::ensure_schema(db.as_ref()).await.unwrap();

        let case = Case {
            id: "c1".to_string(),
            report_id: "r1".to_string(),
            assigned_officer_id: Some("o1".to_string()),
            progress: CaseProgress::InProgress,
            status: CaseStatus::UnderInvestigation,
            station: "st-01".to_string(),
            priority: CasePriority::High,
            created_at: "2025-01-01T00:00:00+00:00".to_string(),
            updated_at: "2025-01-02T00:00:00+00:00".to_string(),
            submitted_to_judiciary: true,
            judiciary_status: Some(JudiciaryStatus::PendingReview),
        };
        cases::insert_case(db.as_ref(), &case).await.unwrap();

        let fetched = cases::get_case_by_id(db.as_ref(), "c1")
            .await
            .unwrap()
            .expect("case should exist");
        assert_eq!(fetched, case);
    }

    #[tokio::test]
    async fn unrecognized_enum_value_rejects_row() {
        let db = db::open_sqlite(None).unwrap();
        schema::ensure_schema(db.as_ref()).await.unwrap();

        db.exec_raw(
            "INSERT INTO cases (id, report_id, status, progress, station, priority,
                 submitted_to_judiciary, created_at, updated_at)
             VALUES ('c1', 'r1', 'Bogus', 'Pending', 'st-01', 'medium', 0, 't0', 't0')",
        )
        .await
        .unwrap();

        let err = cases::get_case_by_id(db.as_ref(), "c1").await.unwrap_err();
        assert!(matches!(err, DbError::Conversion { .. }), "got {err:?}");
    }
}
