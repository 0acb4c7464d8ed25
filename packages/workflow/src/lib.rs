#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Case lifecycle operations.
//!
//! The only writers of case state. Each operation is a short sequence of
//! independent store calls with no transaction and no optimistic
//! concurrency token: last write wins, and a failure partway through
//! leaves the earlier writes in place. Every state change appends a row
//! to the append-only `case_history` audit trail.
//!
//! Callers pass the resolved [`SessionContext`] explicitly; the acting
//! user is recorded on each history entry.

use casetrack_case_models::{
    Case, CaseHistoryEntry, CasePriority, CaseProgress, CaseStatus, JudiciaryStatus, ReportStatus,
};
use casetrack_database::{DbError, cases, history, reports};
use casetrack_identity::SessionContext;
use switchy_database::Database;

/// Errors from lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// A store read or write failed.
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// A referenced entity was absent when expected.
    #[error("{entity} not found")]
    NotFound {
        /// What was being looked up ("Report", "Case").
        entity: &'static str,
    },

    /// The operation's precondition did not hold.
    #[error("{message}")]
    Precondition {
        /// User-facing description of the failed precondition.
        message: String,
    },
}

impl WorkflowError {
    fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }
}

/// Appends one audit entry for a case state change.
async fn record_history(
    db: &dyn Database,
    session: &SessionContext,
    case_id: &str,
    before: String,
    after: String,
    note: Option<String>,
) -> Result<(), DbError> {
    history::insert_entry(
        db,
        &CaseHistoryEntry {
            case_id: case_id.to_string(),
            updated_by: session.user_id.clone(),
            status_before: before,
            status_after: after,
            update_note: note,
            created_at: chrono::Utc::now().to_rfc3339(),
        },
    )
    .await
}

/// Opens a case from a pending report and assigns the given officer.
///
/// The effective station is the report's own station when it has one,
/// else the caller-provided `station_id`. The one-case-per-report rule
/// is enforced by checking for an existing case first; concurrent
/// creations can still race past the check.
///
/// Three sequential writes: insert the case, advance the report's
/// status, append the audit entry. There is no compensating rollback —
/// if a later write fails, the case row stands and the error is
/// surfaced.
///
/// # Errors
///
/// Returns [`WorkflowError::NotFound`] if the report does not exist,
/// [`WorkflowError::Precondition`] if it already has a case or no
/// station resolves, and [`WorkflowError::Database`] on store failure.
pub async fn create_case_from_report(
    db: &dyn Database,
    session: &SessionContext,
    report_id: &str,
    officer_id: &str,
    officer_name: &str,
    station_id: Option<&str>,
) -> Result<Case, WorkflowError> {
    let Some(report) = reports::get_report_by_id(db, report_id).await? else {
        return Err(WorkflowError::NotFound { entity: "Report" });
    };

    if cases::get_case_by_report_id(db, report_id).await?.is_some() {
        return Err(WorkflowError::precondition(
            "A case already exists for this report",
        ));
    }

    let Some(station) = report
        .station_id
        .clone()
        .or_else(|| station_id.map(ToString::to_string))
    else {
        return Err(WorkflowError::precondition(
            "No station could be resolved for this report",
        ));
    };

    let now = chrono::Utc::now().to_rfc3339();
    let case = Case {
        id: uuid::Uuid::new_v4().to_string(),
        report_id: report_id.to_string(),
        assigned_officer_id: Some(officer_id.to_string()),
        progress: CaseProgress::Pending,
        status: CaseStatus::UnderInvestigation,
        station,
        priority: CasePriority::Medium,
        created_at: now.clone(),
        updated_at: now,
        submitted_to_judiciary: false,
        judiciary_status: None,
    };

    cases::insert_case(db, &case).await?;
    reports::update_report_status(db, report_id, ReportStatus::UnderInvestigation).await?;
    record_history(
        db,
        session,
        &case.id,
        CaseStatus::Submitted.to_string(),
        CaseStatus::UnderInvestigation.to_string(),
        Some(format!("Case opened from report; assigned to {officer_name}")),
    )
    .await?;

    log::info!(
        "Opened case {} from report {report_id} at station {}",
        case.id,
        case.station
    );

    Ok(case)
}

/// Assigns (or reassigns) a case to an officer, marking it under
/// investigation in the same update.
///
/// The officer's station membership is not checked against the case's
/// station; cross-station assignment is allowed.
///
/// # Errors
///
/// Returns [`WorkflowError::NotFound`] if the case does not exist and
/// [`WorkflowError::Database`] on store failure.
pub async fn assign_case_to_officer(
    db: &dyn Database,
    session: &SessionContext,
    case_id: &str,
    officer_id: &str,
) -> Result<(), WorkflowError> {
    let Some(case) = cases::get_case_by_id(db, case_id).await? else {
        return Err(WorkflowError::NotFound { entity: "Case" });
    };

    let updated =
        cases::update_assignment(db, case_id, officer_id, CaseStatus::UnderInvestigation).await?;
    if !updated {
        return Err(WorkflowError::NotFound { entity: "Case" });
    }

    record_history(
        db,
        session,
        case_id,
        case.status.to_string(),
        CaseStatus::UnderInvestigation.to_string(),
        Some(format!("Assigned to officer {officer_id}")),
    )
    .await?;

    Ok(())
}

/// Sets a case's internal progress.
///
/// No monotonicity is enforced; any progress value may overwrite any
/// other.
///
/// # Errors
///
/// Returns [`WorkflowError::NotFound`] if the case does not exist and
/// [`WorkflowError::Database`] on store failure.
pub async fn update_case_progress(
    db: &dyn Database,
    session: &SessionContext,
    case_id: &str,
    new_progress: CaseProgress,
) -> Result<(), WorkflowError> {
    let Some(case) = cases::get_case_by_id(db, case_id).await? else {
        return Err(WorkflowError::NotFound { entity: "Case" });
    };

    cases::update_progress(db, case_id, new_progress).await?;

    record_history(
        db,
        session,
        case_id,
        case.progress.to_string(),
        new_progress.to_string(),
        None,
    )
    .await?;

    Ok(())
}

/// Sets a case's formal status.
///
/// When the case concludes, the source report's status is advanced to
/// `Closed` so the citizen-facing report list reflects the outcome.
///
/// # Errors
///
/// Returns [`WorkflowError::NotFound`] if the case does not exist and
/// [`WorkflowError::Database`] on store failure.
pub async fn update_case_status(
    db: &dyn Database,
    session: &SessionContext,
    case_id: &str,
    new_status: CaseStatus,
) -> Result<(), WorkflowError> {
    let Some(case) = cases::get_case_by_id(db, case_id).await? else {
        return Err(WorkflowError::NotFound { entity: "Case" });
    };

    cases::update_status(db, case_id, new_status).await?;

    if new_status.is_concluded() {
        reports::update_report_status(db, &case.report_id, ReportStatus::Closed).await?;
    }

    record_history(
        db,
        session,
        case_id,
        case.status.to_string(),
        new_status.to_string(),
        None,
    )
    .await?;

    Ok(())
}

/// Submits a case to judiciary review.
///
/// # Errors
///
/// Returns [`WorkflowError::NotFound`] if the case does not exist and
/// [`WorkflowError::Database`] on store failure.
pub async fn submit_to_judiciary(
    db: &dyn Database,
    session: &SessionContext,
    case_id: &str,
) -> Result<(), WorkflowError> {
    let Some(case) = cases::get_case_by_id(db, case_id).await? else {
        return Err(WorkflowError::NotFound { entity: "Case" });
    };

    cases::update_judiciary(db, case_id, true, JudiciaryStatus::PendingReview).await?;

    record_history(
        db,
        session,
        case_id,
        case.status.to_string(),
        case.status.to_string(),
        Some("Submitted to judiciary".to_string()),
    )
    .await?;

    Ok(())
}

/// Records the judiciary's decision on a submitted case.
///
/// # Errors
///
/// Returns [`WorkflowError::NotFound`] if the case does not exist,
/// [`WorkflowError::Precondition`] if it was never submitted to
/// judiciary, and [`WorkflowError::Database`] on store failure.
pub async fn update_judiciary_status(
    db: &dyn Database,
    session: &SessionContext,
    case_id: &str,
    new_status: JudiciaryStatus,
    notes: Option<&str>,
) -> Result<(), WorkflowError> {
    let Some(case) = cases::get_case_by_id(db, case_id).await? else {
        return Err(WorkflowError::NotFound { entity: "Case" });
    };

    if !case.submitted_to_judiciary {
        return Err(WorkflowError::precondition(
            "Case has not been submitted to judiciary",
        ));
    }

    cases::update_judiciary(db, case_id, true, new_status).await?;

    let before = case
        .judiciary_status
        .map_or_else(|| JudiciaryStatus::PendingReview.to_string(), |s| s.to_string());
    record_history(
        db,
        session,
        case_id,
        before,
        new_status.to_string(),
        notes.map(ToString::to_string),
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use casetrack_case_models::{CrimeReport, UserRole};
    use casetrack_database::{db, schema};
    use casetrack_database_models::CaseFilter;

    async fn test_db() -> Box<dyn Database> {
        let db = db::open_sqlite(None).unwrap();
        schema::ensure_schema(db.as_ref()).await.unwrap();
        db
    }

    fn supervisor() -> SessionContext {
        SessionContext {
            user_id: "sup-1".to_string(),
            role: UserRole::Supervisor,
            station_id: Some("st-01".to_string()),
        }
    }

    async fn seed_report(db: &dyn Database, id: &str, station: Option<&str>) {
        reports::insert_report(
            db,
            &CrimeReport {
                id: id.to_string(),
                title: "Warehouse arson".to_string(),
                description: "Fire set overnight".to_string(),
                status: ReportStatus::Pending,
                created_by_id: "citizen-1".to_string(),
                created_at: "2025-03-01T08:00:00+00:00".to_string(),
                location: Some("Industrial Area".to_string()),
                category: Some("Arson".to_string()),
                station_id: station.map(ToString::to_string),
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn create_case_from_pending_report() {
        let db = test_db().await;
        seed_report(db.as_ref(), "r1", Some("st-01")).await;

        let case = create_case_from_report(
            db.as_ref(),
            &supervisor(),
            "r1",
            "o1",
            "A. Officer",
            Some("st-99"),
        )
        .await
        .unwrap();

        // The report's own station wins over the caller-provided one.
        assert_eq!(case.station, "st-01");
        assert_eq!(case.status, CaseStatus::UnderInvestigation);
        assert_eq!(case.progress, CaseProgress::Pending);
        assert_eq!(case.priority, CasePriority::Medium);
        assert_eq!(case.assigned_officer_id.as_deref(), Some("o1"));

        let report = reports::get_report_by_id(db.as_ref(), "r1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(report.status, ReportStatus::UnderInvestigation);

        let trail = history::entries_for_case(db.as_ref(), &case.id).await.unwrap();
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].status_before, "Submitted");
        assert_eq!(trail[0].status_after, "Under Investigation");
        assert_eq!(trail[0].updated_by, "sup-1");
    }

    #[tokio::test]
    async fn duplicate_create_is_rejected() {
        let db = test_db().await;
        seed_report(db.as_ref(), "r1", Some("st-01")).await;

        create_case_from_report(db.as_ref(), &supervisor(), "r1", "o1", "A. Officer", None)
            .await
            .unwrap();
        let err =
            create_case_from_report(db.as_ref(), &supervisor(), "r1", "o2", "B. Officer", None)
                .await
                .unwrap_err();
        assert!(matches!(err, WorkflowError::Precondition { .. }), "got {err:?}");

        let all = cases::query_cases(db.as_ref(), &CaseFilter::default()).await.unwrap();
        assert_eq!(all.len(), 1, "second create must not add a case row");
    }

    #[tokio::test]
    async fn create_requires_a_resolvable_station() {
        let db = test_db().await;
        seed_report(db.as_ref(), "r1", None).await;

        let err = create_case_from_report(db.as_ref(), &supervisor(), "r1", "o1", "A. Officer", None)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Precondition { .. }));

        // With a caller-provided station it goes through.
        let case = create_case_from_report(
            db.as_ref(),
            &supervisor(),
            "r1",
            "o1",
            "A. Officer",
            Some("st-07"),
        )
        .await
        .unwrap();
        assert_eq!(case.station, "st-07");
    }

    #[tokio::test]
    async fn create_fails_for_missing_report() {
        let db = test_db().await;

        let err = create_case_from_report(db.as_ref(), &supervisor(), "nope", "o1", "A", None)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound { entity: "Report" }));
    }

    #[tokio::test]
    async fn assign_sets_officer_and_status() {
        let db = test_db().await;
        seed_report(db.as_ref(), "r1", Some("st-01")).await;
        let case =
            create_case_from_report(db.as_ref(), &supervisor(), "r1", "o1", "A. Officer", None)
                .await
                .unwrap();

        assign_case_to_officer(db.as_ref(), &supervisor(), &case.id, "o2")
            .await
            .unwrap();

        let updated = cases::get_case_by_id(db.as_ref(), &case.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.assigned_officer_id.as_deref(), Some("o2"));
        assert_eq!(updated.status, CaseStatus::UnderInvestigation);

        let trail = history::entries_for_case(db.as_ref(), &case.id).await.unwrap();
        assert_eq!(trail.len(), 2);
    }

    #[tokio::test]
    async fn progress_update_records_both_axes_values() {
        let db = test_db().await;
        seed_report(db.as_ref(), "r1", Some("st-01")).await;
        let case =
            create_case_from_report(db.as_ref(), &supervisor(), "r1", "o1", "A. Officer", None)
                .await
                .unwrap();

        update_case_progress(db.as_ref(), &supervisor(), &case.id, CaseProgress::InProgress)
            .await
            .unwrap();

        let updated = cases::get_case_by_id(db.as_ref(), &case.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.progress, CaseProgress::InProgress);
        // The status axis is untouched.
        assert_eq!(updated.status, CaseStatus::UnderInvestigation);

        let trail = history::entries_for_case(db.as_ref(), &case.id).await.unwrap();
        let last = trail.last().unwrap();
        assert_eq!(last.status_before, "Pending");
        assert_eq!(last.status_after, "In Progress");
    }

    #[tokio::test]
    async fn closing_a_case_closes_its_report() {
        let db = test_db().await;
        seed_report(db.as_ref(), "r1", Some("st-01")).await;
        let case =
            create_case_from_report(db.as_ref(), &supervisor(), "r1", "o1", "A. Officer", None)
                .await
                .unwrap();

        update_case_status(db.as_ref(), &supervisor(), &case.id, CaseStatus::Closed)
            .await
            .unwrap();

        let report = reports::get_report_by_id(db.as_ref(), "r1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(report.status, ReportStatus::Closed);
    }

    #[tokio::test]
    async fn judiciary_flow() {
        let db = test_db().await;
        seed_report(db.as_ref(), "r1", Some("st-01")).await;
        let case =
            create_case_from_report(db.as_ref(), &supervisor(), "r1", "o1", "A. Officer", None)
                .await
                .unwrap();

        // Acting on an unsubmitted case is a precondition failure.
        let err = update_judiciary_status(
            db.as_ref(),
            &supervisor(),
            &case.id,
            JudiciaryStatus::Accepted,
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, WorkflowError::Precondition { .. }));

        submit_to_judiciary(db.as_ref(), &supervisor(), &case.id)
            .await
            .unwrap();
        let submitted = cases::get_case_by_id(db.as_ref(), &case.id)
            .await
            .unwrap()
            .unwrap();
        assert!(submitted.submitted_to_judiciary);
        assert_eq!(submitted.judiciary_status, Some(JudiciaryStatus::PendingReview));

        update_judiciary_status(
            db.as_ref(),
            &supervisor(),
            &case.id,
            JudiciaryStatus::Returned,
            Some("Evidence chain incomplete"),
        )
        .await
        .unwrap();

        let returned = cases::get_case_by_id(db.as_ref(), &case.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(returned.judiciary_status, Some(JudiciaryStatus::Returned));

        let trail = history::entries_for_case(db.as_ref(), &case.id).await.unwrap();
        let last = trail.last().unwrap();
        assert_eq!(last.status_before, "Pending Review");
        assert_eq!(last.status_after, "Returned");
        assert_eq!(last.update_note.as_deref(), Some("Evidence chain incomplete"));
    }
}
