#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Output and parameter types for the station-scoped aggregator.
//!
//! These are the read-optimized shapes the dashboard layer produces:
//! request-scoped, non-authoritative copies of store rows joined in
//! memory. The store remains the single source of truth.

use std::collections::BTreeMap;

use casetrack_case_models::{Case, CrimeReport};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The raw result of the three-query case fetch for a station: cases plus
/// the referenced reports and officer names, joined by foreign key.
#[derive(Debug, Clone, Default)]
pub struct StationCases {
    /// Cases in scope, most recently updated first.
    pub cases: Vec<Case>,
    /// Referenced crime reports, keyed by report id.
    pub reports_by_id: BTreeMap<String, CrimeReport>,
    /// Assigned officers' display names, keyed by user id.
    pub officer_names_by_id: BTreeMap<String, String>,
}

impl StationCases {
    /// Flattens the joined data into one [`CaseView`] per case.
    ///
    /// Cases whose report or officer is missing get empty display fields
    /// rather than being dropped; the referenced rows may lag behind the
    /// case row on a busy store.
    #[must_use]
    pub fn into_views(self) -> Vec<CaseView> {
        let Self {
            cases,
            reports_by_id,
            officer_names_by_id,
        } = self;

        cases
            .into_iter()
            .map(|case| {
                let report = reports_by_id.get(&case.report_id);
                let officer_name = case
                    .assigned_officer_id
                    .as_ref()
                    .and_then(|id| officer_names_by_id.get(id))
                    .cloned()
                    .unwrap_or_default();

                CaseView {
                    title: report.map(|r| r.title.clone()).unwrap_or_default(),
                    crime_type: report
                        .and_then(|r| r.category.clone())
                        .unwrap_or_default(),
                    officer_name,
                    case,
                }
            })
            .collect()
    }
}

/// One case joined with the display fields the case list renders:
/// the report's title and crime type and the assigned officer's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseView {
    /// The case row.
    pub case: Case,
    /// Title of the source report; empty if the report is missing.
    pub title: String,
    /// Crime type of the source report; empty if not recorded.
    pub crime_type: String,
    /// Assigned officer's display name; empty while unassigned.
    pub officer_name: String,
}

/// Dashboard headline statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// All cases in scope.
    pub total_cases: usize,
    /// Reports awaiting a case.
    pub pending_reports: usize,
    /// Cases not yet concluded.
    pub active_cases: usize,
    /// Concluded cases (closed or rejected).
    pub completed_cases: usize,
    /// Officers in scope.
    pub total_officers: usize,
}

/// Sortable columns of the case list.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum CaseSortField {
    /// Case id.
    #[serde(rename = "caseId")]
    #[strum(serialize = "caseId")]
    CaseId,
    /// Crime type of the source report.
    #[serde(rename = "crimeType")]
    #[strum(serialize = "crimeType")]
    CrimeType,
    /// Title of the source report.
    #[serde(rename = "title")]
    #[strum(serialize = "title")]
    Title,
    /// Assigned officer's name.
    #[serde(rename = "officer")]
    #[strum(serialize = "officer")]
    Officer,
    /// Internal progress state.
    #[serde(rename = "progress")]
    #[strum(serialize = "progress")]
    Progress,
    /// Last update time (the default).
    #[default]
    #[serde(rename = "lastUpdated")]
    #[strum(serialize = "lastUpdated")]
    LastUpdated,
}

/// Sort direction. Defaults to descending: the case list leads with the
/// most recently updated cases.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}
