#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Domain entities and state enumerations for the case-management system.
//!
//! This crate defines the canonical shapes shared across the entire
//! casetrack system: users and their roles, citizen crime reports, cases
//! and their dual-axis lifecycle (formal status vs. internal progress),
//! the append-only case history, and stations. All other packages build
//! on these types; none of them redefine entity shapes locally.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Account role, stored lowercase and compared case-insensitively.
///
/// `Officer` and `Supervisor` are bound to a single station; the elevated
/// roles (`Ocs`, `Commander`, `Administrator`) may see all stations.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UserRole {
    /// Citizen account; can file reports and view their own.
    Public,
    /// Station-bound investigating officer.
    Officer,
    /// Officer commanding a station.
    Ocs,
    /// Regional commander; sees all stations.
    Commander,
    /// System administrator; sees all stations.
    Administrator,
    /// Judiciary reviewer for submitted cases.
    Judiciary,
    /// Station supervisor; manages the station's cases and officers.
    Supervisor,
}

impl UserRole {
    /// Returns whether this role may see every station's rows rather than
    /// being pinned to a single station.
    #[must_use]
    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::Ocs | Self::Commander | Self::Administrator)
    }

    /// Returns whether accounts with this role must carry a station id.
    #[must_use]
    pub const fn requires_station(self) -> bool {
        matches!(self, Self::Officer | Self::Supervisor)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Public,
            Self::Officer,
            Self::Ocs,
            Self::Commander,
            Self::Administrator,
            Self::Judiciary,
            Self::Supervisor,
        ]
    }
}

/// Duty status for officer accounts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OfficerStatus {
    /// Actively on shift.
    OnDuty,
    /// Temporarily away (annual/sick leave).
    OnLeave,
    /// Off shift.
    OffDuty,
}

/// Lifecycle status of a citizen crime report.
///
/// `Pending` is the intake sentinel: the report has been filed but no case
/// has been opened from it yet. Once a case exists the report mirrors the
/// case's formal status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum ReportStatus {
    /// Filed, awaiting a case to be opened.
    Pending,
    /// Acknowledged by the service.
    Submitted,
    /// A case has been opened and is being worked.
    #[serde(rename = "Under Investigation")]
    #[strum(serialize = "Under Investigation")]
    UnderInvestigation,
    /// The case opened from this report has concluded.
    Closed,
}

/// Formal lifecycle stage of a case.
///
/// The normal flow is one-directional: `Submitted` → `UnderInvestigation`
/// → `Closed`; no transition back to `Submitted` is exposed. `Rejected`
/// is the judiciary-side terminal stage for cases returned without
/// acceptance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum CaseStatus {
    /// Opened but not yet under active investigation.
    Submitted,
    /// Actively investigated.
    #[serde(rename = "Under Investigation")]
    #[strum(serialize = "Under Investigation")]
    UnderInvestigation,
    /// Concluded normally.
    Closed,
    /// Concluded without acceptance.
    Rejected,
}

impl CaseStatus {
    /// Returns whether this status counts as concluded (no longer active).
    #[must_use]
    pub const fn is_concluded(self) -> bool {
        matches!(self, Self::Closed | Self::Rejected)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Submitted,
            Self::UnderInvestigation,
            Self::Closed,
            Self::Rejected,
        ]
    }
}

/// Internal work-state of a case, advanced by explicit officer or
/// supervisor action. Independent of [`CaseStatus`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum CaseProgress {
    /// Not yet picked up.
    Pending,
    /// Being worked.
    #[serde(rename = "In Progress")]
    #[strum(serialize = "In Progress")]
    InProgress,
    /// Work finished, awaiting supervisor review.
    #[serde(rename = "Pending Review")]
    #[strum(serialize = "Pending Review")]
    PendingReview,
    /// Reviewed and complete.
    Completed,
}

impl CaseProgress {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Pending,
            Self::InProgress,
            Self::PendingReview,
            Self::Completed,
        ]
    }
}

/// Judiciary-side review state. Meaningful only while a case has been
/// submitted to judiciary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum JudiciaryStatus {
    /// Awaiting judiciary review.
    #[serde(rename = "Pending Review")]
    #[strum(serialize = "Pending Review")]
    PendingReview,
    /// Accepted for prosecution.
    Accepted,
    /// Returned to the station for further work.
    Returned,
}

/// Case priority. Creation defaults to `Medium`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CasePriority {
    /// Routine handling.
    Low,
    /// Standard handling.
    #[default]
    Medium,
    /// Expedited handling.
    High,
}

/// A user account row.
///
/// `assigned_cases` is a derived active-case count filled in by the
/// dashboard aggregator, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier.
    pub id: String,
    /// Full display name.
    pub name: String,
    /// Account email, unique per account.
    pub email: String,
    /// Account role.
    pub role: UserRole,
    /// Station the account is bound to. Required for officers and
    /// supervisors, absent for elevated roles and citizens.
    pub station_id: Option<String>,
    /// Duty status; officers only.
    pub status: Option<OfficerStatus>,
    /// Badge number; may be absent for accounts created through the
    /// fallback identity path.
    pub badge_number: Option<String>,
    /// Derived count of active cases assigned to this officer.
    #[serde(default)]
    pub assigned_cases: i64,
}

impl User {
    /// Returns the badge number for display, synthesizing one from the
    /// account id when the store has none.
    #[must_use]
    pub fn display_badge(&self) -> String {
        self.badge_number.clone().unwrap_or_else(|| {
            let prefix: String = self.id.chars().take(8).collect();
            format!("KPS-{}", prefix.to_uppercase())
        })
    }
}

/// A citizen-filed crime report. Immutable after filing except for
/// `status`, which advances when a case is opened from it or closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeReport {
    /// Store-assigned identifier.
    pub id: String,
    /// Short title of the incident.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Report lifecycle status.
    pub status: ReportStatus,
    /// The reporting user.
    pub created_by_id: String,
    /// Filing time, RFC 3339.
    pub created_at: String,
    /// Incident location, if given.
    pub location: Option<String>,
    /// Crime type/category, if given.
    pub category: Option<String>,
    /// Station the report was filed against, if known at filing time.
    pub station_id: Option<String>,
}

/// A case opened from exactly one crime report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    /// Store-assigned identifier.
    pub id: String,
    /// The source report. A report has at most one case.
    pub report_id: String,
    /// Assigned investigating officer; `None` while unassigned.
    pub assigned_officer_id: Option<String>,
    /// Internal work-state.
    pub progress: CaseProgress,
    /// Formal lifecycle stage.
    pub status: CaseStatus,
    /// Station the case is scoped to.
    pub station: String,
    /// Handling priority.
    pub priority: CasePriority,
    /// Creation time, RFC 3339.
    pub created_at: String,
    /// Last state-changing update, RFC 3339.
    pub updated_at: String,
    /// Whether the case has been submitted to judiciary.
    pub submitted_to_judiciary: bool,
    /// Judiciary review state; present only after submission.
    pub judiciary_status: Option<JudiciaryStatus>,
}

impl Case {
    /// Returns whether the case still counts toward an officer's active
    /// workload.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.status.is_concluded()
    }

    /// Returns whether the judiciary fields are mutually consistent:
    /// a judiciary status may only be present after submission.
    #[must_use]
    pub const fn judiciary_fields_consistent(&self) -> bool {
        self.submitted_to_judiciary || self.judiciary_status.is_none()
    }
}

/// One append-only audit entry recording a case state change.
///
/// `status_before`/`status_after` record whichever axis changed (formal
/// status or progress) as the stored display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseHistoryEntry {
    /// The case this entry belongs to.
    pub case_id: String,
    /// User who performed the change.
    pub updated_by: String,
    /// State before the change.
    pub status_before: String,
    /// State after the change.
    pub status_after: String,
    /// Free-text note, if any.
    pub update_note: Option<String>,
    /// When the change was recorded, RFC 3339.
    pub created_at: String,
}

/// A police station. Reference data managed outside this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// Store-assigned identifier.
    pub id: String,
    /// Station name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr as _;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!(UserRole::from_str("Supervisor").unwrap(), UserRole::Supervisor);
        assert_eq!(UserRole::from_str("OFFICER").unwrap(), UserRole::Officer);
        assert_eq!(UserRole::from_str("ocs").unwrap(), UserRole::Ocs);
        assert!(UserRole::from_str("warden").is_err());
    }

    #[test]
    fn role_displays_lowercase() {
        for role in UserRole::all() {
            let shown = role.to_string();
            assert_eq!(shown, shown.to_lowercase(), "{role:?} not lowercase");
            assert_eq!(UserRole::from_str(&shown).unwrap(), *role);
        }
    }

    #[test]
    fn case_status_roundtrip_with_spaces() {
        for status in CaseStatus::all() {
            let shown = status.to_string();
            assert_eq!(CaseStatus::from_str(&shown).unwrap(), *status);
        }
        assert_eq!(
            CaseStatus::UnderInvestigation.to_string(),
            "Under Investigation"
        );
    }

    #[test]
    fn progress_roundtrip_with_spaces() {
        for progress in CaseProgress::all() {
            let shown = progress.to_string();
            assert_eq!(CaseProgress::from_str(&shown).unwrap(), *progress);
        }
        assert_eq!(CaseProgress::PendingReview.to_string(), "Pending Review");
    }

    #[test]
    fn concluded_statuses() {
        assert!(CaseStatus::Closed.is_concluded());
        assert!(CaseStatus::Rejected.is_concluded());
        assert!(!CaseStatus::Submitted.is_concluded());
        assert!(!CaseStatus::UnderInvestigation.is_concluded());
    }

    #[test]
    fn priority_default_is_medium() {
        assert_eq!(CasePriority::default(), CasePriority::Medium);
        assert_eq!(CasePriority::from_str("MEDIUM").unwrap(), CasePriority::Medium);
    }

    #[test]
    fn badge_synthesized_from_id_when_absent() {
        let officer = User {
            id: "a1b2c3d4-0000-0000-0000-000000000000".to_string(),
            name: "A. Officer".to_string(),
            email: "a.officer@police.go.ke".to_string(),
            role: UserRole::Officer,
            station_id: Some("st-01".to_string()),
            status: Some(OfficerStatus::OnDuty),
            badge_number: None,
            assigned_cases: 0,
        };
        assert_eq!(officer.display_badge(), "KPS-A1B2C3D4");

        let with_badge = User {
            badge_number: Some("B-1001".to_string()),
            ..officer
        };
        assert_eq!(with_badge.display_badge(), "B-1001");
    }

    #[test]
    fn judiciary_fields_consistency() {
        let case = Case {
            id: "c1".to_string(),
            report_id: "r1".to_string(),
            assigned_officer_id: None,
            progress: CaseProgress::Pending,
            status: CaseStatus::UnderInvestigation,
            station: "st-01".to_string(),
            priority: CasePriority::Medium,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
            submitted_to_judiciary: false,
            judiciary_status: None,
        };
        assert!(case.judiciary_fields_consistent());

        let inconsistent = Case {
            judiciary_status: Some(JudiciaryStatus::PendingReview),
            ..case.clone()
        };
        assert!(!inconsistent.judiciary_fields_consistent());

        let submitted = Case {
            submitted_to_judiciary: true,
            judiciary_status: Some(JudiciaryStatus::PendingReview),
            ..case
        };
        assert!(submitted.judiciary_fields_consistent());
    }

    #[test]
    fn serde_uses_stored_strings() {
        let json = serde_json::to_string(&CaseStatus::UnderInvestigation).unwrap();
        assert_eq!(json, "\"Under Investigation\"");
        let back: CaseStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CaseStatus::UnderInvestigation);

        let json = serde_json::to_string(&UserRole::Commander).unwrap();
        assert_eq!(json, "\"commander\"");
    }
}
