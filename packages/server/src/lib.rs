#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the case-management application.
//!
//! Serves the REST API the React frontend consumes: identity resolution,
//! station dashboards, the case list, citizen report filing, and the
//! case lifecycle operations. The built SPA is served from `app/dist`
//! as a static mount. CORS is permissive so the preflight contract of
//! the identity endpoint holds for browser callers.

mod handlers;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use casetrack_database::{db, schema};
use std::path::Path;
use std::sync::Arc;
use switchy_database::Database;

/// Shared application state.
pub struct AppState {
    /// Database connection.
    pub db: Arc<dyn Database>,
}

/// Opens the store connection from the environment.
///
/// A `DATABASE_URL` starting with `sqlite://` opens a local `SQLite`
/// file (development); anything else goes through the Postgres
/// connector.
async fn open_from_env() -> Result<Box<dyn Database>, Box<dyn std::error::Error>> {
    match std::env::var("DATABASE_URL") {
        Ok(url) if url.starts_with("sqlite://") => {
            let path = url.trim_start_matches("sqlite://").to_string();
            Ok(db::open_sqlite(Some(Path::new(&path)))?)
        }
        _ => db::connect_from_env().await,
    }
}

/// Starts the casetrack API server.
///
/// Connects to the store, ensures the schema, and starts the Actix-Web
/// HTTP server. This is a regular async function — the caller provides
/// the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
///
/// # Panics
///
/// Panics if the database connection or schema setup fails.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    log::info!("Connecting to database...");
    let db_conn = open_from_env().await.expect("Failed to connect to database");

    log::info!("Ensuring schema...");
    schema::ensure_schema(db_conn.as_ref())
        .await
        .expect("Failed to ensure database schema");

    let state = web::Data::new(AppState {
        db: Arc::from(db_conn),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/identity", web::post().to(handlers::identity))
                    .route("/stations", web::get().to(handlers::list_stations))
                    .route("/dashboard", web::get().to(handlers::dashboard))
                    .route("/cases", web::get().to(handlers::list_cases))
                    .route("/cases", web::post().to(handlers::create_case))
                    .route("/cases/{id}", web::get().to(handlers::case_detail))
                    .route("/cases/{id}/assign", web::post().to(handlers::assign_case))
                    .route(
                        "/cases/{id}/progress",
                        web::post().to(handlers::update_progress),
                    )
                    .route(
                        "/cases/{id}/status",
                        web::post().to(handlers::update_status),
                    )
                    .route(
                        "/cases/{id}/judiciary/submit",
                        web::post().to(handlers::submit_to_judiciary),
                    )
                    .route(
                        "/cases/{id}/judiciary/status",
                        web::post().to(handlers::judiciary_decision),
                    )
                    .route(
                        "/judiciary/cases",
                        web::get().to(handlers::judiciary_cases),
                    )
                    .route("/reports", web::post().to(handlers::create_report))
                    .route(
                        "/reports/pending",
                        web::get().to(handlers::pending_reports),
                    )
                    .route("/reports/mine", web::get().to(handlers::my_reports))
                    .route("/officers", web::get().to(handlers::list_officers))
                    .route(
                        "/officers/{id}/status",
                        web::post().to(handlers::officer_status),
                    ),
            )
            // Serve frontend static files (production)
            .service(Files::new("/", "app/dist").index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
