//! Queries over the `sessions` table.
//!
//! Session rows are provisioned by the external auth collaborator; this
//! module only looks tokens up (and inserts rows for seeding and tests).
//! Tokens are stored as digests, never in the clear.

use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::DbError;

/// A session row, keyed by token digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRow {
    /// The authenticated account id.
    pub user_id: String,
    /// The authenticated account email.
    pub email: String,
    /// Expiry time, RFC 3339.
    pub expires_at: String,
}

/// Fetches the session stored under the given token digest.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn get_session(db: &dyn Database, token_hash: &str) -> Result<Option<SessionRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT user_id, email, expires_at FROM sessions WHERE token_hash = $1",
            &[DatabaseValue::String(token_hash.to_string())],
        )
        .await?;

    let Some(row) = rows.first() else {
        return Ok(None);
    };

    Ok(Some(SessionRow {
        user_id: row
            .to_value("user_id")
            .map_err(|e| DbError::conversion("user_id", e))?,
        email: row
            .to_value("email")
            .map_err(|e| DbError::conversion("email", e))?,
        expires_at: row
            .to_value("expires_at")
            .map_err(|e| DbError::conversion("expires_at", e))?,
    }))
}

/// Inserts a session row under the given token digest.
///
/// # Errors
///
/// Returns [`DbError`] if the insert fails.
pub async fn insert_session(
    db: &dyn Database,
    token_hash: &str,
    user_id: &str,
    email: &str,
    expires_at: &str,
) -> Result<(), DbError> {
    let now = chrono::Utc::now().to_rfc3339();

    db.exec_raw_params(
        "INSERT INTO sessions (token_hash, user_id, email, expires_at, created_at)
         VALUES ($1, $2, $3, $4, $5)",
        &[
            DatabaseValue::String(token_hash.to_string()),
            DatabaseValue::String(user_id.to_string()),
            DatabaseValue::String(email.to_string()),
            DatabaseValue::String(expires_at.to_string()),
            DatabaseValue::String(now),
        ],
    )
    .await?;

    Ok(())
}
