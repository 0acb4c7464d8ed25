//! Queries over the `users` table.

use casetrack_case_models::{OfficerStatus, User, UserRole};
use casetrack_database_models::OfficerFilter;
use switchy_database::{Database, DatabaseValue};

use crate::rows::user_from_row;
use crate::DbError;

/// Converts an `Option<&str>` to a [`DatabaseValue`], using `Null` for
/// `None`.
fn opt_str(value: Option<&str>) -> DatabaseValue {
    value.map_or(DatabaseValue::Null, |s| DatabaseValue::String(s.to_string()))
}

/// Fetches a single user by id.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or the row does not map.
pub async fn get_user_by_id(db: &dyn Database, id: &str) -> Result<Option<User>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT * FROM users WHERE id = $1",
            &[DatabaseValue::String(id.to_string())],
        )
        .await?;

    rows.first().map(user_from_row).transpose()
}

/// Queries officer-role accounts matching the given filter.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a row does not map.
pub async fn query_officers(db: &dyn Database, filter: &OfficerFilter) -> Result<Vec<User>, DbError> {
    let mut sql = "SELECT * FROM users WHERE role = $1".to_string();
    let mut params = vec![DatabaseValue::String(UserRole::Officer.to_string())];
    let mut idx = 2;

    if let Some(station) = &filter.station {
        sql.push_str(&format!(" AND station_id = ${idx}"));
        params.push(DatabaseValue::String(station.clone()));
        idx += 1;
    }

    if let Some(status) = filter.status {
        sql.push_str(&format!(" AND status = ${idx}"));
        params.push(DatabaseValue::String(status.to_string()));
    }

    sql.push_str(" ORDER BY full_name");

    let rows = db.query_raw_params(&sql, &params).await?;

    rows.iter().map(user_from_row).collect()
}

/// Fetches users by an id set. Returns an empty list for an empty set
/// without touching the store.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a row does not map.
pub async fn users_by_ids(db: &dyn Database, ids: &[String]) -> Result<Vec<User>, DbError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders: Vec<String> = (1..=ids.len()).map(|i| format!("${i}")).collect();
    let sql = format!("SELECT * FROM users WHERE id IN ({})", placeholders.join(", "));
    let params: Vec<DatabaseValue> = ids
        .iter()
        .map(|id| DatabaseValue::String(id.clone()))
        .collect();

    let rows = db.query_raw_params(&sql, &params).await?;

    rows.iter().map(user_from_row).collect()
}

/// Inserts a user account row.
///
/// # Errors
///
/// Returns [`DbError`] if the insert fails.
pub async fn insert_user(db: &dyn Database, user: &User) -> Result<(), DbError> {
    let now = chrono::Utc::now().to_rfc3339();

    db.exec_raw_params(
        "INSERT INTO users (id, full_name, email, role, status, station_id, badge_number,
             created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)",
        &[
            DatabaseValue::String(user.id.clone()),
            DatabaseValue::String(user.name.clone()),
            DatabaseValue::String(user.email.clone()),
            DatabaseValue::String(user.role.to_string()),
            user.status
                .map_or(DatabaseValue::Null, |s| DatabaseValue::String(s.to_string())),
            opt_str(user.station_id.as_deref()),
            opt_str(user.badge_number.as_deref()),
            DatabaseValue::String(now),
        ],
    )
    .await?;

    Ok(())
}

/// Updates an officer's duty status. Returns whether a row was updated.
///
/// # Errors
///
/// Returns [`DbError`] if the update fails.
pub async fn update_officer_status(
    db: &dyn Database,
    user_id: &str,
    status: OfficerStatus,
) -> Result<bool, DbError> {
    let now = chrono::Utc::now().to_rfc3339();

    let updated = db
        .exec_raw_params(
            "UPDATE users SET status = $1, updated_at = $2 WHERE id = $3",
            &[
                DatabaseValue::String(status.to_string()),
                DatabaseValue::String(now),
                DatabaseValue::String(user_id.to_string()),
            ],
        )
        .await?;

    Ok(updated > 0)
}
