//! Queries over the `cases` table.

use std::collections::BTreeSet;

use casetrack_case_models::{Case, CaseProgress, CaseStatus, JudiciaryStatus};
use casetrack_database_models::CaseFilter;
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::rows::case_from_row;
use crate::DbError;

/// Inserts a case row.
///
/// # Errors
///
/// Returns [`DbError`] if the insert fails.
pub async fn insert_case(db: &dyn Database, case: &Case) -> Result<(), DbError> {
    db.exec_raw_params(
        "INSERT INTO cases (id, report_id, assigned_officer_id, status, progress, station,
             priority, submitted_to_judiciary, judiciary_status, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        &[
            DatabaseValue::String(case.id.clone()),
            DatabaseValue::String(case.report_id.clone()),
            case.assigned_officer_id
                .as_ref()
                .map_or(DatabaseValue::Null, |o| DatabaseValue::String(o.clone())),
            DatabaseValue::String(case.status.to_string()),
            DatabaseValue::String(case.progress.to_string()),
            DatabaseValue::String(case.station.clone()),
            DatabaseValue::String(case.priority.to_string()),
            DatabaseValue::Int32(i32::from(case.submitted_to_judiciary)),
            case.judiciary_status
                .map_or(DatabaseValue::Null, |s| DatabaseValue::String(s.to_string())),
            DatabaseValue::String(case.created_at.clone()),
            DatabaseValue::String(case.updated_at.clone()),
        ],
    )
    .await?;

    Ok(())
}

/// Fetches a single case by id.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or the row does not map.
pub async fn get_case_by_id(db: &dyn Database, id: &str) -> Result<Option<Case>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT * FROM cases WHERE id = $1",
            &[DatabaseValue::String(id.to_string())],
        )
        .await?;

    rows.first().map(case_from_row).transpose()
}

/// Fetches the case opened from the given report, if one exists.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or the row does not map.
pub async fn get_case_by_report_id(
    db: &dyn Database,
    report_id: &str,
) -> Result<Option<Case>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT * FROM cases WHERE report_id = $1",
            &[DatabaseValue::String(report_id.to_string())],
        )
        .await?;

    rows.first().map(case_from_row).transpose()
}

/// Queries cases matching the given filter, most recently updated first.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a row does not map.
pub async fn query_cases(db: &dyn Database, filter: &CaseFilter) -> Result<Vec<Case>, DbError> {
    let mut frags = Vec::new();
    let mut params: Vec<DatabaseValue> = Vec::new();
    let mut idx = 1;

    if let Some(station) = &filter.station {
        frags.push(format!("station = ${idx}"));
        params.push(DatabaseValue::String(station.clone()));
        idx += 1;
    }

    if let Some(officer) = &filter.assigned_officer_id {
        frags.push(format!("assigned_officer_id = ${idx}"));
        params.push(DatabaseValue::String(officer.clone()));
        idx += 1;
    }

    match filter.unassigned {
        Some(true) => frags.push("assigned_officer_id IS NULL".to_string()),
        Some(false) => frags.push("assigned_officer_id IS NOT NULL".to_string()),
        None => {}
    }

    if let Some(submitted) = filter.submitted_to_judiciary {
        frags.push(format!("submitted_to_judiciary = ${idx}"));
        params.push(DatabaseValue::Int32(i32::from(submitted)));
    }

    let mut sql = "SELECT * FROM cases".to_string();
    if !frags.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&frags.join(" AND "));
    }
    sql.push_str(" ORDER BY updated_at DESC");

    let rows = db.query_raw_params(&sql, &params).await?;

    rows.iter().map(case_from_row).collect()
}

/// Returns the set of report ids that already have a case.
///
/// This is one half of the anti-join emulation the aggregator performs:
/// the store exposes no negation query, so "reports without a case" is
/// computed as a set-difference in memory.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn report_ids_with_cases(db: &dyn Database) -> Result<BTreeSet<String>, DbError> {
    let rows = db
        .query_raw_params("SELECT report_id FROM cases", &[])
        .await?;

    let mut ids = BTreeSet::new();
    for row in &rows {
        let id: String = row
            .to_value("report_id")
            .map_err(|e| DbError::conversion("report_id", e))?;
        ids.insert(id);
    }

    Ok(ids)
}

/// Counts a single officer's active cases (`status` not concluded).
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn count_active_for_officer(db: &dyn Database, officer_id: &str) -> Result<i64, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT COUNT(*) as cnt FROM cases
             WHERE assigned_officer_id = $1 AND status NOT IN ($2, $3)",
            &[
                DatabaseValue::String(officer_id.to_string()),
                DatabaseValue::String(CaseStatus::Closed.to_string()),
                DatabaseValue::String(CaseStatus::Rejected.to_string()),
            ],
        )
        .await?;

    let count: i64 = rows.first().map_or(0, |r| r.to_value("cnt").unwrap_or(0));

    Ok(count)
}

/// Sets a case's assigned officer and formal status in one update.
/// Returns whether a row was updated.
///
/// # Errors
///
/// Returns [`DbError`] if the update fails.
pub async fn update_assignment(
    db: &dyn Database,
    case_id: &str,
    officer_id: &str,
    status: CaseStatus,
) -> Result<bool, DbError> {
    let now = chrono::Utc::now().to_rfc3339();

    let updated = db
        .exec_raw_params(
            "UPDATE cases SET assigned_officer_id = $1, status = $2, updated_at = $3
             WHERE id = $4",
            &[
                DatabaseValue::String(officer_id.to_string()),
                DatabaseValue::String(status.to_string()),
                DatabaseValue::String(now),
                DatabaseValue::String(case_id.to_string()),
            ],
        )
        .await?;

    Ok(updated > 0)
}

/// Sets a case's internal progress. Returns whether a row was updated.
///
/// # Errors
///
/// Returns [`DbError`] if the update fails.
pub async fn update_progress(
    db: &dyn Database,
    case_id: &str,
    progress: CaseProgress,
) -> Result<bool, DbError> {
    let now = chrono::Utc::now().to_rfc3339();

    let updated = db
        .exec_raw_params(
            "UPDATE cases SET progress = $1, updated_at = $2 WHERE id = $3",
            &[
                DatabaseValue::String(progress.to_string()),
                DatabaseValue::String(now),
                DatabaseValue::String(case_id.to_string()),
            ],
        )
        .await?;

    Ok(updated > 0)
}

/// Sets a case's formal status. Returns whether a row was updated.
///
/// # Errors
///
/// Returns [`DbError`] if the update fails.
pub async fn update_status(
    db: &dyn Database,
    case_id: &str,
    status: CaseStatus,
) -> Result<bool, DbError> {
    let now = chrono::Utc::now().to_rfc3339();

    let updated = db
        .exec_raw_params(
            "UPDATE cases SET status = $1, updated_at = $2 WHERE id = $3",
            &[
                DatabaseValue::String(status.to_string()),
                DatabaseValue::String(now),
                DatabaseValue::String(case_id.to_string()),
            ],
        )
        .await?;

    Ok(updated > 0)
}

/// Sets a case's judiciary submission flag and review state. Returns
/// whether a row was updated.
///
/// # Errors
///
/// Returns [`DbError`] if the update fails.
pub async fn update_judiciary(
    db: &dyn Database,
    case_id: &str,
    submitted: bool,
    judiciary_status: JudiciaryStatus,
) -> Result<bool, DbError> {
    let now = chrono::Utc::now().to_rfc3339();

    let updated = db
        .exec_raw_params(
            "UPDATE cases SET submitted_to_judiciary = $1, judiciary_status = $2, updated_at = $3
             WHERE id = $4",
            &[
                DatabaseValue::Int32(i32::from(submitted)),
                DatabaseValue::String(judiciary_status.to_string()),
                DatabaseValue::String(now),
                DatabaseValue::String(case_id.to_string()),
            ],
        )
        .await?;

    Ok(updated > 0)
}
