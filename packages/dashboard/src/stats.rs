//! Headline statistics computation.

use casetrack_case_models::{Case, CrimeReport, User};
use casetrack_dashboard_models::DashboardStats;

/// Computes dashboard statistics from already-fetched rows.
///
/// Pure: every count is derived from the inputs, so
/// `active_cases + completed_cases == total_cases` always holds.
#[must_use]
pub fn compute_statistics(
    cases: &[Case],
    pending_reports: &[CrimeReport],
    officers: &[User],
) -> DashboardStats {
    let completed_cases = cases.iter().filter(|c| c.status.is_concluded()).count();

    DashboardStats {
        total_cases: cases.len(),
        pending_reports: pending_reports.len(),
        active_cases: cases.len() - completed_cases,
        completed_cases,
        total_officers: officers.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casetrack_case_models::{CasePriority, CaseProgress, CaseStatus};

    fn case_with_status(id: &str, status: CaseStatus) -> Case {
        Case {
            id: id.to_string(),
            report_id: format!("r-{id}"),
            assigned_officer_id: None,
            progress: CaseProgress::Pending,
            status,
            station: "st-01".to_string(),
            priority: CasePriority::Medium,
            created_at: "2025-03-01T09:00:00+00:00".to_string(),
            updated_at: "2025-03-01T09:00:00+00:00".to_string(),
            submitted_to_judiciary: false,
            judiciary_status: None,
        }
    }

    #[test]
    fn active_plus_completed_equals_total() {
        let cases: Vec<Case> = [
            CaseStatus::Submitted,
            CaseStatus::UnderInvestigation,
            CaseStatus::UnderInvestigation,
            CaseStatus::Closed,
            CaseStatus::Rejected,
        ]
        .iter()
        .enumerate()
        .map(|(i, status)| case_with_status(&format!("c{i}"), *status))
        .collect();

        let stats = compute_statistics(&cases, &[], &[]);
        assert_eq!(stats.total_cases, 5);
        assert_eq!(stats.active_cases, 3);
        assert_eq!(stats.completed_cases, 2);
        assert_eq!(stats.active_cases + stats.completed_cases, stats.total_cases);
    }

    #[test]
    fn empty_inputs_yield_zeroes() {
        let stats = compute_statistics(&[], &[], &[]);
        assert_eq!(stats, DashboardStats::default());
    }
}
