#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Station-scoped data aggregation.
//!
//! Produces the read-optimized view a dashboard renders for one station
//! (or for all stations, for elevated roles): cases joined with their
//! reports and officers, the pending-report queue, per-officer workload
//! counts, and headline statistics. Everything here is request-scoped
//! and non-authoritative; the store stays the source of truth and the
//! lifecycle operations in `casetrack_workflow` are the only writers.
//!
//! Each fetch issues multiple sequential queries with no atomicity
//! across them; a concurrent writer can produce a stale join. Callers
//! re-fetch rather than retry.

pub mod aggregate;
pub mod filter;
pub mod stats;

/// Errors from aggregation operations.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// A store query failed. The whole fetch fails; partial results are
    /// never returned.
    #[error("Database error: {0}")]
    Database(#[from] casetrack_database::DbError),
}
