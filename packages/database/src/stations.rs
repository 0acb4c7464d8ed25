//! Queries over the `stations` reference table.

use casetrack_case_models::Station;
use switchy_database::{Database, DatabaseValue};

use crate::rows::station_from_row;
use crate::DbError;

/// Lists all stations, ordered by name.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a row does not map.
pub async fn list_stations(db: &dyn Database) -> Result<Vec<Station>, DbError> {
    let rows = db
        .query_raw_params("SELECT * FROM stations ORDER BY name", &[])
        .await?;

    rows.iter().map(station_from_row).collect()
}

/// Fetches a single station by id.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or the row does not map.
pub async fn get_station_by_id(db: &dyn Database, id: &str) -> Result<Option<Station>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT * FROM stations WHERE id = $1",
            &[DatabaseValue::String(id.to_string())],
        )
        .await?;

    rows.first().map(station_from_row).transpose()
}

/// Inserts a station. Reference data is normally provisioned outside the
/// application; this exists for seeding and tests.
///
/// # Errors
///
/// Returns [`DbError`] if the insert fails.
pub async fn insert_station(db: &dyn Database, station: &Station) -> Result<(), DbError> {
    db.exec_raw_params(
        "INSERT INTO stations (id, name) VALUES ($1, $2)",
        &[
            DatabaseValue::String(station.id.clone()),
            DatabaseValue::String(station.name.clone()),
        ],
    )
    .await?;

    Ok(())
}
