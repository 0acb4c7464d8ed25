//! Fetch-and-join queries for the dashboard.

use std::collections::BTreeSet;

use casetrack_case_models::{Case, CrimeReport, ReportStatus, User};
use casetrack_database::{cases, reports, users};
use casetrack_database_models::{CaseFilter, OfficerFilter, ReportFilter};
use casetrack_dashboard_models::StationCases;
use switchy_database::Database;

use crate::DashboardError;

/// Joins already-fetched case rows with their referenced reports and
/// officer names: two id-set queries plus an in-memory join by foreign
/// key.
async fn join_case_rows(
    db: &dyn Database,
    case_rows: Vec<Case>,
) -> Result<StationCases, DashboardError> {
    let report_ids: Vec<String> = case_rows
        .iter()
        .map(|c| c.report_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let officer_ids: Vec<String> = case_rows
        .iter()
        .filter_map(|c| c.assigned_officer_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let reports_by_id = reports::reports_by_ids(db, &report_ids)
        .await?
        .into_iter()
        .map(|r| (r.id.clone(), r))
        .collect();
    let officer_names_by_id = users::users_by_ids(db, &officer_ids)
        .await?
        .into_iter()
        .map(|u| (u.id.clone(), u.name))
        .collect();

    Ok(StationCases {
        cases: case_rows,
        reports_by_id,
        officer_names_by_id,
    })
}

/// Fetches the cases in scope for a station (all stations when `None`),
/// along with the reports and officer names they reference.
///
/// Three queries — cases, then reports by id set, then officers by id
/// set — joined in memory by foreign key. The store's native
/// relationship resolution is not relied on; the underlying schema does
/// not expose it dependably.
///
/// # Errors
///
/// Returns [`DashboardError`] if any of the three queries fails; no
/// partial result is returned.
pub async fn fetch_station_cases(
    db: &dyn Database,
    station: Option<&str>,
) -> Result<StationCases, DashboardError> {
    let filter = CaseFilter {
        station: station.map(ToString::to_string),
        ..CaseFilter::default()
    };
    let case_rows = cases::query_cases(db, &filter).await?;

    join_case_rows(db, case_rows).await
}

/// Fetches the cases submitted to judiciary, across all stations, joined
/// the same way as the station fetch.
///
/// # Errors
///
/// Returns [`DashboardError`] if any query fails.
pub async fn fetch_submitted_cases(db: &dyn Database) -> Result<StationCases, DashboardError> {
    let filter = CaseFilter {
        submitted_to_judiciary: Some(true),
        ..CaseFilter::default()
    };
    let case_rows = cases::query_cases(db, &filter).await?;

    join_case_rows(db, case_rows).await
}

/// Fetches a station's officers with a freshly computed active-case
/// count on each.
///
/// Returns an empty list without touching the store when no station is
/// given: officers cannot be listed without a station scope.
///
/// One count query per officer, awaited as one concurrent batch. At
/// station scale (tens of officers) the fan-out is acceptable; the
/// per-officer independent-count contract is what the dashboard renders,
/// so the counts are not folded into a grouped query.
///
/// # Errors
///
/// Returns [`DashboardError`] if the officer query or any count fails.
pub async fn fetch_station_officers(
    db: &dyn Database,
    station: Option<&str>,
) -> Result<Vec<User>, DashboardError> {
    let Some(station) = station else {
        log::debug!("No station scope; returning empty officer list");
        return Ok(Vec::new());
    };

    let filter = OfficerFilter {
        station: Some(station.to_string()),
        ..OfficerFilter::default()
    };
    let mut officers = users::query_officers(db, &filter).await?;

    let counts = futures::future::join_all(
        officers
            .iter()
            .map(|officer| cases::count_active_for_officer(db, &officer.id)),
    )
    .await;

    for (officer, count) in officers.iter_mut().zip(counts) {
        officer.assigned_cases = count?;
    }

    Ok(officers)
}

/// Fetches the reports awaiting a case, scoped by station when given.
///
/// The store exposes no anti-join, so this runs two queries (pending
/// reports, then the set of report ids that already have a case) and
/// takes the difference in memory. No ordering is guaranteed beyond the
/// query's own; callers needing recency sort by `created_at` themselves.
///
/// # Errors
///
/// Returns [`DashboardError`] if either query fails.
pub async fn fetch_pending_reports(
    db: &dyn Database,
    station: Option<&str>,
) -> Result<Vec<CrimeReport>, DashboardError> {
    let filter = ReportFilter {
        station: station.map(ToString::to_string),
        status: Some(ReportStatus::Pending),
        ..ReportFilter::default()
    };
    let mut pending = reports::query_reports(db, &filter).await?;

    let taken = cases::report_ids_with_cases(db).await?;
    pending.retain(|report| !taken.contains(&report.id));

    Ok(pending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use casetrack_case_models::{
        Case, CasePriority, CaseProgress, CaseStatus, OfficerStatus, UserRole,
    };
    use casetrack_database::{db, schema};

    async fn test_db() -> Box<dyn Database> {
        let db = db::open_sqlite(None).unwrap();
        schema::ensure_schema(db.as_ref()).await.unwrap();
        db
    }

    fn officer(id: &str, name: &str, station: &str) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{id}@police.go.ke"),
            role: UserRole::Officer,
            station_id: Some(station.to_string()),
            status: Some(OfficerStatus::OnDuty),
            badge_number: None,
            assigned_cases: 0,
        }
    }

    fn report(id: &str, title: &str, station: &str) -> CrimeReport {
        CrimeReport {
            id: id.to_string(),
            title: title.to_string(),
            description: "details".to_string(),
            status: ReportStatus::Pending,
            created_by_id: "citizen-1".to_string(),
            created_at: "2025-03-01T08:00:00+00:00".to_string(),
            location: None,
            category: Some("Burglary".to_string()),
            station_id: Some(station.to_string()),
        }
    }

    fn case(id: &str, report_id: &str, station: &str, status: CaseStatus) -> Case {
        Case {
            id: id.to_string(),
            report_id: report_id.to_string(),
            assigned_officer_id: None,
            progress: CaseProgress::Pending,
            status,
            station: station.to_string(),
            priority: CasePriority::Medium,
            created_at: "2025-03-01T09:00:00+00:00".to_string(),
            updated_at: "2025-03-01T09:00:00+00:00".to_string(),
            submitted_to_judiciary: false,
            judiciary_status: None,
        }
    }

    #[tokio::test]
    async fn station_scope_filters_cases() {
        let db = test_db().await;

        cases::insert_case(db.as_ref(), &case("c1", "r1", "st-01", CaseStatus::Submitted))
            .await
            .unwrap();
        cases::insert_case(db.as_ref(), &case("c2", "r2", "st-02", CaseStatus::Submitted))
            .await
            .unwrap();

        let scoped = fetch_station_cases(db.as_ref(), Some("st-01")).await.unwrap();
        assert_eq!(scoped.cases.len(), 1);
        assert!(scoped.cases.iter().all(|c| c.station == "st-01"));

        let all = fetch_station_cases(db.as_ref(), None).await.unwrap();
        assert_eq!(all.cases.len(), 2);
    }

    #[tokio::test]
    async fn views_join_report_and_officer_fields() {
        let db = test_db().await;

        users::insert_user(db.as_ref(), &officer("o1", "Achieng Odhiambo", "st-01"))
            .await
            .unwrap();
        reports::insert_report(db.as_ref(), &report("r1", "Shop break-in", "st-01"))
            .await
            .unwrap();
        let mut c = case("c1", "r1", "st-01", CaseStatus::UnderInvestigation);
        c.assigned_officer_id = Some("o1".to_string());
        cases::insert_case(db.as_ref(), &c).await.unwrap();

        let views = fetch_station_cases(db.as_ref(), Some("st-01"))
            .await
            .unwrap()
            .into_views();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].title, "Shop break-in");
        assert_eq!(views[0].crime_type, "Burglary");
        assert_eq!(views[0].officer_name, "Achieng Odhiambo");
    }

    #[tokio::test]
    async fn missing_references_yield_empty_display_fields() {
        let db = test_db().await;

        // Case whose report row is gone and with no officer assigned.
        cases::insert_case(db.as_ref(), &case("c1", "r-gone", "st-01", CaseStatus::Submitted))
            .await
            .unwrap();

        let views = fetch_station_cases(db.as_ref(), Some("st-01"))
            .await
            .unwrap()
            .into_views();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].title, "");
        assert_eq!(views[0].crime_type, "");
        assert_eq!(views[0].officer_name, "");
    }

    #[tokio::test]
    async fn officers_require_a_station_scope() {
        let db = test_db().await;

        users::insert_user(db.as_ref(), &officer("o1", "Achieng Odhiambo", "st-01"))
            .await
            .unwrap();

        let none = fetch_station_officers(db.as_ref(), None).await.unwrap();
        assert!(none.is_empty());

        let scoped = fetch_station_officers(db.as_ref(), Some("st-01")).await.unwrap();
        assert_eq!(scoped.len(), 1);
    }

    #[tokio::test]
    async fn officer_counts_exclude_concluded_cases() {
        let db = test_db().await;

        users::insert_user(db.as_ref(), &officer("o1", "Achieng Odhiambo", "st-01"))
            .await
            .unwrap();

        // Five concluded cases and two active ones assigned to o1.
        for (i, status) in [
            CaseStatus::Closed,
            CaseStatus::Closed,
            CaseStatus::Closed,
            CaseStatus::Rejected,
            CaseStatus::Closed,
            CaseStatus::UnderInvestigation,
            CaseStatus::Submitted,
        ]
        .iter()
        .enumerate()
        {
            let mut c = case(&format!("c{i}"), &format!("r{i}"), "st-01", *status);
            c.assigned_officer_id = Some("o1".to_string());
            cases::insert_case(db.as_ref(), &c).await.unwrap();
        }

        let officers = fetch_station_officers(db.as_ref(), Some("st-01")).await.unwrap();
        assert_eq!(officers[0].assigned_cases, 2);
    }

    #[tokio::test]
    async fn submitted_cases_span_stations() {
        let db = test_db().await;

        let mut submitted = case("c1", "r1", "st-01", CaseStatus::UnderInvestigation);
        submitted.submitted_to_judiciary = true;
        cases::insert_case(db.as_ref(), &submitted).await.unwrap();
        cases::insert_case(db.as_ref(), &case("c2", "r2", "st-02", CaseStatus::Submitted))
            .await
            .unwrap();

        let result = fetch_submitted_cases(db.as_ref()).await.unwrap();
        assert_eq!(result.cases.len(), 1);
        assert_eq!(result.cases[0].id, "c1");
    }

    #[tokio::test]
    async fn pending_reports_exclude_those_with_cases() {
        let db = test_db().await;

        reports::insert_report(db.as_ref(), &report("r1", "Stolen bicycle", "st-01"))
            .await
            .unwrap();
        reports::insert_report(db.as_ref(), &report("r2", "Noise complaint", "st-01"))
            .await
            .unwrap();
        cases::insert_case(db.as_ref(), &case("c1", "r1", "st-01", CaseStatus::Submitted))
            .await
            .unwrap();

        let pending = fetch_pending_reports(db.as_ref(), Some("st-01")).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "r2");
    }
}
