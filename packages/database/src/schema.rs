//! In-code schema management.
//!
//! The hosted deployment's schema is provisioned by the store operator;
//! this module creates the same tables with portable DDL so that local
//! development and tests can run against `SQLite` with identical queries.
//! All statements are idempotent.

use switchy_database::Database;

use crate::DbError;

/// Creates all tables and indexes if they don't already exist.
///
/// # Errors
///
/// Returns [`DbError`] if any DDL statement fails.
pub async fn ensure_schema(db: &dyn Database) -> Result<(), DbError> {
    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS users (
            id           TEXT PRIMARY KEY,
            full_name    TEXT NOT NULL,
            email        TEXT NOT NULL UNIQUE,
            role         TEXT NOT NULL DEFAULT 'public',
            status       TEXT,
            station_id   TEXT,
            badge_number TEXT,
            created_at   TEXT NOT NULL,
            updated_at   TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS reports (
            id          TEXT PRIMARY KEY,
            title       TEXT NOT NULL,
            description TEXT NOT NULL,
            status      TEXT NOT NULL DEFAULT 'Pending',
            reporter_id TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            location    TEXT,
            category    TEXT,
            station_id  TEXT
        )",
    )
    .await?;

    // report_id intentionally carries no UNIQUE constraint: one-case-per-
    // report is checked at creation time, matching the hosted schema.
    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS cases (
            id                     TEXT PRIMARY KEY,
            report_id              TEXT NOT NULL,
            assigned_officer_id    TEXT,
            status                 TEXT NOT NULL DEFAULT 'Submitted',
            progress               TEXT NOT NULL DEFAULT 'Pending',
            station                TEXT NOT NULL,
            priority               TEXT NOT NULL DEFAULT 'medium',
            submitted_to_judiciary INTEGER NOT NULL DEFAULT 0,
            judiciary_status       TEXT,
            created_at             TEXT NOT NULL,
            updated_at             TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS case_history (
            id            TEXT PRIMARY KEY,
            case_id       TEXT NOT NULL,
            updated_by    TEXT NOT NULL,
            status_before TEXT NOT NULL,
            status_after  TEXT NOT NULL,
            update_note   TEXT,
            created_at    TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS stations (
            id   TEXT PRIMARY KEY,
            name TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS sessions (
            token_hash TEXT PRIMARY KEY,
            user_id    TEXT NOT NULL,
            email      TEXT NOT NULL,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw("CREATE INDEX IF NOT EXISTS idx_cases_station ON cases (station)")
        .await?;
    db.exec_raw("CREATE INDEX IF NOT EXISTS idx_cases_officer ON cases (assigned_officer_id)")
        .await?;
    db.exec_raw("CREATE INDEX IF NOT EXISTS idx_cases_report ON cases (report_id)")
        .await?;
    db.exec_raw("CREATE INDEX IF NOT EXISTS idx_reports_status ON reports (status)")
        .await?;
    db.exec_raw("CREATE INDEX IF NOT EXISTS idx_reports_reporter ON reports (reporter_id)")
        .await?;
    db.exec_raw("CREATE INDEX IF NOT EXISTS idx_history_case ON case_history (case_id)")
        .await?;
    db.exec_raw("CREATE INDEX IF NOT EXISTS idx_users_station ON users (station_id, role)")
        .await?;

    log::info!("Database schema ensured");

    Ok(())
}
