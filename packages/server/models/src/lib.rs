#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the casetrack server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the domain entities to allow independent evolution of the API
//! contract.

use casetrack_case_models::{
    Case, CaseHistoryEntry, CaseProgress, CaseStatus, CrimeReport, JudiciaryStatus, OfficerStatus,
    User, UserRole,
};
use casetrack_dashboard_models::{CaseSortField, CaseView, DashboardStats, SortDirection};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// The identity-resolution response.
///
/// Field names are snake_case on the wire; this is the published contract
/// the SPA's auth bootstrap consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiIdentity {
    /// Account id.
    pub user_id: String,
    /// Account email.
    pub email: String,
    /// Resolved role, lowercased.
    pub role: UserRole,
    /// Bound station, if any.
    pub station_id: Option<String>,
}

/// An officer as returned by the roster endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOfficer {
    /// Account id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Badge number, synthesized from the id when the store has none.
    pub badge_number: String,
    /// Duty status.
    pub status: Option<OfficerStatus>,
    /// Station the officer is posted to.
    pub station_id: Option<String>,
    /// Freshly computed active-case count.
    pub assigned_cases: i64,
}

impl From<User> for ApiOfficer {
    fn from(user: User) -> Self {
        Self {
            badge_number: user.display_badge(),
            id: user.id,
            name: user.name,
            email: user.email,
            status: user.status,
            station_id: user.station_id,
            assigned_cases: user.assigned_cases,
        }
    }
}

/// Everything a station dashboard renders in one response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Headline statistics.
    pub stats: DashboardStats,
    /// Joined case views, most recently updated first.
    pub cases: Vec<CaseView>,
    /// Reports awaiting a case.
    pub pending_reports: Vec<CrimeReport>,
    /// Officer roster with workload counts.
    pub officers: Vec<ApiOfficer>,
}

/// Query parameters for the case list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseListParams {
    /// Station to scope to (elevated roles only; everyone else is pinned
    /// to their own station).
    pub station: Option<String>,
    /// Case-insensitive search term.
    pub search: Option<String>,
    /// Sort column.
    pub sort: Option<CaseSortField>,
    /// Sort direction.
    pub direction: Option<SortDirection>,
    /// Restrict to cases assigned to the calling officer.
    pub mine: Option<bool>,
}

/// Query parameters for station-scoped list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationParams {
    /// Station to scope to (elevated roles only).
    pub station: Option<String>,
}

/// A case with its source report and full audit trail.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDetailResponse {
    /// The case row.
    pub case: Case,
    /// The source report, if still present.
    pub report: Option<CrimeReport>,
    /// Audit trail, oldest first.
    pub history: Vec<CaseHistoryEntry>,
}

/// Request body for filing a crime report.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReportRequest {
    /// Short title of the incident.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Incident location.
    pub location: Option<String>,
    /// Crime type/category.
    pub category: Option<String>,
    /// Station to file against, if known.
    pub station_id: Option<String>,
}

/// Request body for opening a case from a report.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCaseRequest {
    /// The pending report to open a case from.
    pub report_id: String,
    /// Officer to assign.
    pub officer_id: String,
    /// Officer's display name, recorded on the audit entry.
    pub officer_name: String,
    /// Fallback station when the report carries none.
    pub station_id: Option<String>,
}

/// Request body for assigning a case to an officer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    /// Officer to assign.
    pub officer_id: String,
}

/// Request body for a progress update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    /// New progress value.
    pub progress: CaseProgress,
}

/// Request body for a formal status update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    /// New status value.
    pub status: CaseStatus,
}

/// Request body for a judiciary decision.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudiciaryDecisionRequest {
    /// The decision.
    pub status: JudiciaryStatus,
    /// Notes appended to the case history when present.
    pub notes: Option<String>,
}

/// Request body for an officer duty-status change.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerStatusRequest {
    /// New duty status.
    pub status: OfficerStatus,
}
