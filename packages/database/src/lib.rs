#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Store boundary for the case-management system.
//!
//! Uses `switchy_database` for all database operations. Production runs
//! against the hosted Postgres instance; local development and tests run
//! the same portable SQL against `SQLite`. Untyped rows are converted to
//! the tagged domain entities of `casetrack_case_models` in one place
//! ([`rows`]) so that enum parsing and field defaulting never leak into
//! call sites.

pub mod cases;
pub mod db;
pub mod history;
pub mod reports;
pub mod rows;
pub mod schema;
pub mod sessions;
pub mod stations;
pub mod users;

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Database query error.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// Connection initialization error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Data conversion error: a row did not map to a domain entity.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },

    /// I/O error (e.g., creating the database file's parent directory).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DbError {
    /// Builds a [`DbError::Conversion`] for a column that failed to map.
    pub(crate) fn conversion(column: &str, detail: impl std::fmt::Display) -> Self {
        Self::Conversion {
            message: format!("Failed to read column '{column}': {detail}"),
        }
    }
}
