#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Query parameter types for the store boundary.
//!
//! These are the filter shapes the query modules in `casetrack_database`
//! accept. Every field is optional; an empty filter selects everything the
//! caller's row-level scope permits.

use casetrack_case_models::{OfficerStatus, ReportStatus};
use serde::{Deserialize, Serialize};

/// Parameters for querying cases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseFilter {
    /// Restrict to cases scoped to this station.
    pub station: Option<String>,
    /// Restrict to cases assigned to this officer.
    pub assigned_officer_id: Option<String>,
    /// `Some(true)` selects only unassigned cases (`assigned_officer_id
    /// IS NULL`), `Some(false)` only assigned ones.
    pub unassigned: Option<bool>,
    /// Restrict by judiciary submission flag.
    pub submitted_to_judiciary: Option<bool>,
}

/// Parameters for querying crime reports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportFilter {
    /// Restrict to reports filed against this station.
    pub station: Option<String>,
    /// Restrict by report status.
    pub status: Option<ReportStatus>,
    /// Restrict to reports filed by this user.
    pub created_by_id: Option<String>,
}

/// Parameters for querying officer accounts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfficerFilter {
    /// Restrict to officers posted to this station.
    pub station: Option<String>,
    /// Restrict by duty status.
    pub status: Option<OfficerStatus>,
}
