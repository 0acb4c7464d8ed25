//! Queries over the append-only `case_history` table.

use casetrack_case_models::CaseHistoryEntry;
use switchy_database::{Database, DatabaseValue};

use crate::rows::history_from_row;
use crate::DbError;

/// Appends an audit entry. The row id is generated here; entries are
/// never updated or deleted.
///
/// # Errors
///
/// Returns [`DbError`] if the insert fails.
pub async fn insert_entry(db: &dyn Database, entry: &CaseHistoryEntry) -> Result<(), DbError> {
    db.exec_raw_params(
        "INSERT INTO case_history (id, case_id, updated_by, status_before, status_after,
             update_note, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
        &[
            DatabaseValue::String(uuid::Uuid::new_v4().to_string()),
            DatabaseValue::String(entry.case_id.clone()),
            DatabaseValue::String(entry.updated_by.clone()),
            DatabaseValue::String(entry.status_before.clone()),
            DatabaseValue::String(entry.status_after.clone()),
            entry
                .update_note
                .as_ref()
                .map_or(DatabaseValue::Null, |n| DatabaseValue::String(n.clone())),
            DatabaseValue::String(entry.created_at.clone()),
        ],
    )
    .await?;

    Ok(())
}

/// Fetches the audit trail for a case, oldest first.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a row does not map.
pub async fn entries_for_case(
    db: &dyn Database,
    case_id: &str,
) -> Result<Vec<CaseHistoryEntry>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT * FROM case_history WHERE case_id = $1 ORDER BY created_at",
            &[DatabaseValue::String(case_id.to_string())],
        )
        .await?;

    rows.iter().map(history_from_row).collect()
}
