//! HTTP handler functions for the casetrack API.
//!
//! Handlers are the catch-log-notify boundary: store failures are
//! logged with their diagnostic detail and surfaced to the caller as a
//! JSON error message, never as a raw exception.

use actix_web::{HttpRequest, HttpResponse, http::header, web};
use casetrack_case_models::{CrimeReport, ReportStatus, UserRole};
use casetrack_dashboard::{aggregate, filter, stats};
use casetrack_database::{cases, history, reports, stations, users};
use casetrack_database_models::ReportFilter;
use casetrack_identity::{IdentityError, SessionContext};
use casetrack_server_models::{
    ApiHealth, ApiIdentity, ApiOfficer, AssignRequest, CaseDetailResponse, CaseListParams,
    CreateCaseRequest, DashboardResponse, JudiciaryDecisionRequest, NewReportRequest,
    OfficerStatusRequest, ProgressRequest, StationParams, StatusRequest,
};
use casetrack_workflow::WorkflowError;

use crate::AppState;

/// Extracts the bearer token from the `Authorization` header.
fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Builds the standard error-body JSON.
fn error_body(message: &str) -> serde_json::Value {
    serde_json::json!({ "error": message })
}

/// Verifies the caller's session and resolves their scope.
///
/// Returns the ready-to-send error response on failure so handlers can
/// bail with a plain `return`.
async fn authorize(
    state: &web::Data<AppState>,
    req: &HttpRequest,
) -> Result<SessionContext, HttpResponse> {
    let Some(token) = bearer_token(req) else {
        return Err(HttpResponse::Unauthorized().json(error_body("Missing authorization header")));
    };

    let auth = match casetrack_identity::verify_session(state.db.as_ref(), token).await {
        Ok(auth) => auth,
        Err(IdentityError::Unauthorized) => {
            return Err(
                HttpResponse::Unauthorized().json(error_body("Invalid or expired session"))
            );
        }
        Err(e) => {
            log::error!("Session verification failed: {e}");
            return Err(
                HttpResponse::InternalServerError().json(error_body("Failed to verify session"))
            );
        }
    };

    match casetrack_identity::resolve_identity(state.db.as_ref(), &auth).await {
        Ok(identity) => Ok(identity.into()),
        Err(e) => {
            log::error!("Identity resolution failed for {}: {e}", auth.user_id);
            Err(HttpResponse::InternalServerError().json(error_body("Failed to resolve identity")))
        }
    }
}

/// Maps a lifecycle operation error to its response.
fn workflow_error_response(e: &WorkflowError) -> HttpResponse {
    match e {
        WorkflowError::NotFound { entity } => {
            HttpResponse::NotFound().json(error_body(&format!("{entity} not found")))
        }
        WorkflowError::Precondition { message } => {
            HttpResponse::BadRequest().json(error_body(message))
        }
        WorkflowError::Database(err) => {
            log::error!("Lifecycle operation failed: {err}");
            HttpResponse::InternalServerError().json(error_body("Operation failed"))
        }
    }
}

/// The body lifecycle endpoints return on success.
fn success_body() -> serde_json::Value {
    serde_json::json!({ "success": true })
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/identity`
///
/// Resolves the caller's role and station from their bearer token.
/// Returns `401` when unauthenticated and `400` when the profile lookup
/// fails.
pub async fn identity(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let Some(token) = bearer_token(&req) else {
        return HttpResponse::Unauthorized().json(error_body("Missing authorization header"));
    };

    let auth = match casetrack_identity::verify_session(state.db.as_ref(), token).await {
        Ok(auth) => auth,
        Err(IdentityError::Unauthorized) => {
            return HttpResponse::Unauthorized().json(error_body("Invalid or expired session"));
        }
        Err(e) => {
            log::error!("Session verification failed: {e}");
            return HttpResponse::BadRequest().json(error_body("Failed to verify session"));
        }
    };

    match casetrack_identity::resolve_identity(state.db.as_ref(), &auth).await {
        Ok(identity) => HttpResponse::Ok().json(ApiIdentity {
            user_id: identity.user_id,
            email: identity.email,
            role: identity.role,
            station_id: identity.station_id,
        }),
        Err(e) => {
            log::error!("Identity resolution failed for {}: {e}", auth.user_id);
            HttpResponse::BadRequest().json(error_body("Failed to resolve identity"))
        }
    }
}

/// `GET /api/stations`
pub async fn list_stations(state: web::Data<AppState>) -> HttpResponse {
    match stations::list_stations(state.db.as_ref()).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => {
            log::error!("Failed to list stations: {e}");
            HttpResponse::InternalServerError().json(error_body("Failed to list stations"))
        }
    }
}

/// `GET /api/dashboard`
///
/// The station dashboard aggregate: cases joined with reports and
/// officers, the pending-report queue, the officer roster with workload
/// counts, and headline statistics.
pub async fn dashboard(
    state: web::Data<AppState>,
    req: HttpRequest,
    params: web::Query<StationParams>,
) -> HttpResponse {
    let ctx = match authorize(&state, &req).await {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };
    let station = ctx.effective_station(params.station.as_deref());

    let station_cases =
        match aggregate::fetch_station_cases(state.db.as_ref(), station.as_deref()).await {
            Ok(sc) => sc,
            Err(e) => {
                log::error!("Failed to fetch cases: {e}");
                return HttpResponse::InternalServerError()
                    .json(error_body("Failed to load dashboard"));
            }
        };
    let pending =
        match aggregate::fetch_pending_reports(state.db.as_ref(), station.as_deref()).await {
            Ok(p) => p,
            Err(e) => {
                log::error!("Failed to fetch pending reports: {e}");
                return HttpResponse::InternalServerError()
                    .json(error_body("Failed to load dashboard"));
            }
        };
    let officers =
        match aggregate::fetch_station_officers(state.db.as_ref(), station.as_deref()).await {
            Ok(o) => o,
            Err(e) => {
                log::error!("Failed to fetch officers: {e}");
                return HttpResponse::InternalServerError()
                    .json(error_body("Failed to load dashboard"));
            }
        };

    let stats = stats::compute_statistics(&station_cases.cases, &pending, &officers);

    HttpResponse::Ok().json(DashboardResponse {
        stats,
        cases: station_cases.into_views(),
        pending_reports: pending,
        officers: officers.into_iter().map(ApiOfficer::from).collect(),
    })
}

/// `GET /api/cases`
///
/// The searchable, sortable case list. `?mine=true` restricts to cases
/// assigned to the calling officer.
pub async fn list_cases(
    state: web::Data<AppState>,
    req: HttpRequest,
    params: web::Query<CaseListParams>,
) -> HttpResponse {
    let ctx = match authorize(&state, &req).await {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };
    let station = ctx.effective_station(params.station.as_deref());

    let station_cases =
        match aggregate::fetch_station_cases(state.db.as_ref(), station.as_deref()).await {
            Ok(sc) => sc,
            Err(e) => {
                log::error!("Failed to fetch cases: {e}");
                return HttpResponse::InternalServerError().json(error_body("Failed to load cases"));
            }
        };

    let mut views = station_cases.into_views();
    if params.mine.unwrap_or(false) {
        views.retain(|v| v.case.assigned_officer_id.as_deref() == Some(ctx.user_id.as_str()));
    }

    let views = filter::filter_and_sort_cases(
        views,
        params.search.as_deref().unwrap_or(""),
        params.sort.unwrap_or_default(),
        params.direction.unwrap_or_default(),
    );

    HttpResponse::Ok().json(views)
}

/// `GET /api/cases/{id}`
pub async fn case_detail(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    if let Err(resp) = authorize(&state, &req).await {
        return resp;
    }
    let case_id = path.into_inner();

    let case = match cases::get_case_by_id(state.db.as_ref(), &case_id).await {
        Ok(Some(case)) => case,
        Ok(None) => return HttpResponse::NotFound().json(error_body("Case not found")),
        Err(e) => {
            log::error!("Failed to fetch case {case_id}: {e}");
            return HttpResponse::InternalServerError().json(error_body("Failed to load case"));
        }
    };

    let report = match reports::get_report_by_id(state.db.as_ref(), &case.report_id).await {
        Ok(report) => report,
        Err(e) => {
            log::error!("Failed to fetch report {}: {e}", case.report_id);
            return HttpResponse::InternalServerError().json(error_body("Failed to load case"));
        }
    };

    let history = match history::entries_for_case(state.db.as_ref(), &case_id).await {
        Ok(entries) => entries,
        Err(e) => {
            log::error!("Failed to fetch history for case {case_id}: {e}");
            return HttpResponse::InternalServerError().json(error_body("Failed to load case"));
        }
    };

    HttpResponse::Ok().json(CaseDetailResponse {
        case,
        report,
        history,
    })
}

/// `GET /api/reports/pending`
pub async fn pending_reports(
    state: web::Data<AppState>,
    req: HttpRequest,
    params: web::Query<StationParams>,
) -> HttpResponse {
    let ctx = match authorize(&state, &req).await {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };
    let station = ctx.effective_station(params.station.as_deref());

    match aggregate::fetch_pending_reports(state.db.as_ref(), station.as_deref()).await {
        Ok(pending) => HttpResponse::Ok().json(pending),
        Err(e) => {
            log::error!("Failed to fetch pending reports: {e}");
            HttpResponse::InternalServerError().json(error_body("Failed to load pending reports"))
        }
    }
}

/// `GET /api/reports/mine`
///
/// The calling citizen's own reports, newest first.
pub async fn my_reports(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let ctx = match authorize(&state, &req).await {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let filter = ReportFilter {
        created_by_id: Some(ctx.user_id),
        ..ReportFilter::default()
    };
    match reports::query_reports(state.db.as_ref(), &filter).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => {
            log::error!("Failed to fetch reports: {e}");
            HttpResponse::InternalServerError().json(error_body("Failed to load reports"))
        }
    }
}

/// `POST /api/reports`
///
/// Files a new crime report for the calling user.
pub async fn create_report(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<NewReportRequest>,
) -> HttpResponse {
    let ctx = match authorize(&state, &req).await {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };
    let body = body.into_inner();

    let report = CrimeReport {
        id: uuid::Uuid::new_v4().to_string(),
        title: body.title,
        description: body.description,
        status: ReportStatus::Pending,
        created_by_id: ctx.user_id,
        created_at: chrono::Utc::now().to_rfc3339(),
        location: body.location,
        category: body.category,
        station_id: body.station_id,
    };

    match reports::insert_report(state.db.as_ref(), &report).await {
        Ok(()) => HttpResponse::Created().json(report),
        Err(e) => {
            log::error!("Failed to file report: {e}");
            HttpResponse::InternalServerError().json(error_body("Failed to file report"))
        }
    }
}

/// `GET /api/officers`
pub async fn list_officers(
    state: web::Data<AppState>,
    req: HttpRequest,
    params: web::Query<StationParams>,
) -> HttpResponse {
    let ctx = match authorize(&state, &req).await {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };
    let station = ctx.effective_station(params.station.as_deref());

    match aggregate::fetch_station_officers(state.db.as_ref(), station.as_deref()).await {
        Ok(officers) => HttpResponse::Ok().json(
            officers
                .into_iter()
                .map(ApiOfficer::from)
                .collect::<Vec<_>>(),
        ),
        Err(e) => {
            log::error!("Failed to fetch officers: {e}");
            HttpResponse::InternalServerError().json(error_body("Failed to load officers"))
        }
    }
}

/// `POST /api/officers/{id}/status`
pub async fn officer_status(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<OfficerStatusRequest>,
) -> HttpResponse {
    if let Err(resp) = authorize(&state, &req).await {
        return resp;
    }
    let officer_id = path.into_inner();

    match users::update_officer_status(state.db.as_ref(), &officer_id, body.status).await {
        Ok(true) => HttpResponse::Ok().json(success_body()),
        Ok(false) => HttpResponse::NotFound().json(error_body("Officer not found")),
        Err(e) => {
            log::error!("Failed to update officer {officer_id} status: {e}");
            HttpResponse::InternalServerError().json(error_body("Failed to update status"))
        }
    }
}

/// `GET /api/judiciary/cases`
///
/// Cases submitted to judiciary, joined for display. Judiciary role only.
pub async fn judiciary_cases(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let ctx = match authorize(&state, &req).await {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };
    if ctx.role != UserRole::Judiciary {
        return HttpResponse::Forbidden().json(error_body("Judiciary role required"));
    }

    match aggregate::fetch_submitted_cases(state.db.as_ref()).await {
        Ok(station_cases) => HttpResponse::Ok().json(station_cases.into_views()),
        Err(e) => {
            log::error!("Failed to fetch judiciary cases: {e}");
            HttpResponse::InternalServerError().json(error_body("Failed to load cases"))
        }
    }
}

/// `POST /api/cases`
///
/// Opens a case from a pending report.
pub async fn create_case(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<CreateCaseRequest>,
) -> HttpResponse {
    let ctx = match authorize(&state, &req).await {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };
    let body = body.into_inner();

    match casetrack_workflow::create_case_from_report(
        state.db.as_ref(),
        &ctx,
        &body.report_id,
        &body.officer_id,
        &body.officer_name,
        body.station_id.as_deref(),
    )
    .await
    {
        Ok(case) => HttpResponse::Created().json(case),
        Err(e) => workflow_error_response(&e),
    }
}

/// `POST /api/cases/{id}/assign`
pub async fn assign_case(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<AssignRequest>,
) -> HttpResponse {
    let ctx = match authorize(&state, &req).await {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };
    let case_id = path.into_inner();

    match casetrack_workflow::assign_case_to_officer(
        state.db.as_ref(),
        &ctx,
        &case_id,
        &body.officer_id,
    )
    .await
    {
        Ok(()) => HttpResponse::Ok().json(success_body()),
        Err(e) => workflow_error_response(&e),
    }
}

/// `POST /api/cases/{id}/progress`
pub async fn update_progress(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<ProgressRequest>,
) -> HttpResponse {
    let ctx = match authorize(&state, &req).await {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };
    let case_id = path.into_inner();

    match casetrack_workflow::update_case_progress(state.db.as_ref(), &ctx, &case_id, body.progress)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(success_body()),
        Err(e) => workflow_error_response(&e),
    }
}

/// `POST /api/cases/{id}/status`
pub async fn update_status(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<StatusRequest>,
) -> HttpResponse {
    let ctx = match authorize(&state, &req).await {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };
    let case_id = path.into_inner();

    match casetrack_workflow::update_case_status(state.db.as_ref(), &ctx, &case_id, body.status)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(success_body()),
        Err(e) => workflow_error_response(&e),
    }
}

/// `POST /api/cases/{id}/judiciary/submit`
pub async fn submit_to_judiciary(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    let ctx = match authorize(&state, &req).await {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };
    let case_id = path.into_inner();

    match casetrack_workflow::submit_to_judiciary(state.db.as_ref(), &ctx, &case_id).await {
        Ok(()) => HttpResponse::Ok().json(success_body()),
        Err(e) => workflow_error_response(&e),
    }
}

/// `POST /api/cases/{id}/judiciary/status`
///
/// Records the judiciary's decision. Judiciary role only.
pub async fn judiciary_decision(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<JudiciaryDecisionRequest>,
) -> HttpResponse {
    let ctx = match authorize(&state, &req).await {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };
    if ctx.role != UserRole::Judiciary {
        return HttpResponse::Forbidden().json(error_body("Judiciary role required"));
    }
    let case_id = path.into_inner();
    let body = body.into_inner();

    match casetrack_workflow::update_judiciary_status(
        state.db.as_ref(),
        &ctx,
        &case_id,
        body.status,
        body.notes.as_deref(),
    )
    .await
    {
        Ok(()) => HttpResponse::Ok().json(success_body()),
        Err(e) => workflow_error_response(&e),
    }
}
