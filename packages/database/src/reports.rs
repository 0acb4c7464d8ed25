//! Queries over the `reports` table.

use casetrack_case_models::{CrimeReport, ReportStatus};
use casetrack_database_models::ReportFilter;
use switchy_database::{Database, DatabaseValue};

use crate::rows::report_from_row;
use crate::DbError;

/// Converts an `Option<&str>` to a [`DatabaseValue`], using `Null` for
/// `None`.
fn opt_str(value: Option<&str>) -> DatabaseValue {
    value.map_or(DatabaseValue::Null, |s| DatabaseValue::String(s.to_string()))
}

/// Inserts a crime report row.
///
/// # Errors
///
/// Returns [`DbError`] if the insert fails.
pub async fn insert_report(db: &dyn Database, report: &CrimeReport) -> Result<(), DbError> {
    db.exec_raw_params(
        "INSERT INTO reports (id, title, description, status, reporter_id, created_at,
             location, category, station_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        &[
            DatabaseValue::String(report.id.clone()),
            DatabaseValue::String(report.title.clone()),
            DatabaseValue::String(report.description.clone()),
            DatabaseValue::String(report.status.to_string()),
            DatabaseValue::String(report.created_by_id.clone()),
            DatabaseValue::String(report.created_at.clone()),
            opt_str(report.location.as_deref()),
            opt_str(report.category.as_deref()),
            opt_str(report.station_id.as_deref()),
        ],
    )
    .await?;

    Ok(())
}

/// Fetches a single report by id.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or the row does not map.
pub async fn get_report_by_id(db: &dyn Database, id: &str) -> Result<Option<CrimeReport>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT * FROM reports WHERE id = $1",
            &[DatabaseValue::String(id.to_string())],
        )
        .await?;

    rows.first().map(report_from_row).transpose()
}

/// Queries reports matching the given filter, newest first.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a row does not map.
pub async fn query_reports(db: &dyn Database, filter: &ReportFilter) -> Result<Vec<CrimeReport>, DbError> {
    let mut frags = Vec::new();
    let mut params: Vec<DatabaseValue> = Vec::new();
    let mut idx = 1;

    if let Some(station) = &filter.station {
        frags.push(format!("station_id = ${idx}"));
        params.push(DatabaseValue::String(station.clone()));
        idx += 1;
    }

    if let Some(status) = filter.status {
        frags.push(format!("status = ${idx}"));
        params.push(DatabaseValue::String(status.to_string()));
        idx += 1;
    }

    if let Some(reporter) = &filter.created_by_id {
        frags.push(format!("reporter_id = ${idx}"));
        params.push(DatabaseValue::String(reporter.clone()));
    }

    let mut sql = "SELECT * FROM reports".to_string();
    if !frags.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&frags.join(" AND "));
    }
    sql.push_str(" ORDER BY created_at DESC");

    let rows = db.query_raw_params(&sql, &params).await?;

    rows.iter().map(report_from_row).collect()
}

/// Fetches reports by an id set. Returns an empty list for an empty set
/// without touching the store.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a row does not map.
pub async fn reports_by_ids(db: &dyn Database, ids: &[String]) -> Result<Vec<CrimeReport>, DbError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders: Vec<String> = (1..=ids.len()).map(|i| format!("${i}")).collect();
    let sql = format!(
        "SELECT * FROM reports WHERE id IN ({})",
        placeholders.join(", ")
    );
    let params: Vec<DatabaseValue> = ids
        .iter()
        .map(|id| DatabaseValue::String(id.clone()))
        .collect();

    let rows = db.query_raw_params(&sql, &params).await?;

    rows.iter().map(report_from_row).collect()
}

/// Updates a report's lifecycle status. Returns whether a row was updated.
///
/// # Errors
///
/// Returns [`DbError`] if the update fails.
pub async fn update_report_status(
    db: &dyn Database,
    id: &str,
    status: ReportStatus,
) -> Result<bool, DbError> {
    let updated = db
        .exec_raw_params(
            "UPDATE reports SET status = $1 WHERE id = $2",
            &[
                DatabaseValue::String(status.to_string()),
                DatabaseValue::String(id.to_string()),
            ],
        )
        .await?;

    Ok(updated > 0)
}
