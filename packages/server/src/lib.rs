#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the biodiversity map.
//!
//! Serves the REST API and the static frontend. The canton boundary layer
//! is loaded once at startup and shared read-only between workers.
//! Uploaded occurrence files are cleaned on arrival and kept in a bounded
//! in-memory session store; every species selection is then answered by
//! one pass of the dashboard pipeline over the stored dataset.

pub mod config;
mod error;
mod handlers;
pub mod interactive;
pub mod sessions;

use std::sync::{Arc, Mutex};

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use biodiv_map_occurrence_models::TimestampPolicy;
use biodiv_map_spatial::{BoundaryIndex, fields};

pub use config::ServerConfig;
pub use error::ServerError;
pub use sessions::SessionStore;

/// Shared application state.
pub struct AppState {
    /// Canton polygons, read-only after startup.
    pub boundaries: Arc<BoundaryIndex>,
    /// Uploaded datasets.
    pub sessions: Mutex<SessionStore>,
    /// How unparseable event dates in uploads are handled.
    pub timestamp_policy: TimestampPolicy,
}

impl AppState {
    /// Creates state around an already loaded boundary index.
    #[must_use]
    pub fn new(
        boundaries: Arc<BoundaryIndex>,
        session_capacity: usize,
        timestamp_policy: TimestampPolicy,
    ) -> Self {
        Self {
            boundaries,
            sessions: Mutex::new(SessionStore::new(session_capacity)),
            timestamp_policy,
        }
    }
}

/// Loads the boundary layer named by `config`.
///
/// # Errors
///
/// Returns [`ServerError::Boundary`] if the field mapping or the boundary
/// file cannot be read or is invalid.
pub fn load_boundaries(config: &ServerConfig) -> Result<BoundaryIndex, ServerError> {
    let mapping = match &config.fields_path {
        Some(path) => fields::load_fields(path)?,
        None => fields::default_fields(),
    };

    log::info!(
        "Loading canton boundaries from {}...",
        config.boundaries_path.display()
    );
    Ok(BoundaryIndex::from_path(&config.boundaries_path, &mapping)?)
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/boundaries", web::get().to(handlers::boundaries))
            .route("/occurrences", web::post().to(handlers::upload))
            .route(
                "/occurrences/{session}/species",
                web::get().to(handlers::species),
            )
            .route(
                "/occurrences/{session}/dashboard",
                web::get().to(handlers::dashboard),
            )
            .route(
                "/occurrences/{session}",
                web::delete().to(handlers::delete_session),
            ),
    );
}

/// Starts the biodiversity map API server.
///
/// Loads the boundary layer, then runs the Actix-Web HTTP server until it
/// is stopped. The caller provides the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the boundary layer cannot be
/// loaded, or if the HTTP server fails to bind or encounters a runtime
/// error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let boundaries = load_boundaries(&config).map_err(|e| {
        log::error!("{e}");
        std::io::Error::other(e)
    })?;

    let state = web::Data::new(AppState::new(
        Arc::new(boundaries),
        config.session_capacity,
        config.timestamp_policy,
    ));

    let ServerConfig {
        bind_addr,
        port,
        max_upload_bytes,
        static_dir,
        timestamp_policy,
        ..
    } = config;

    log::info!(
        "Starting server on {bind_addr}:{port} (upload limit {max_upload_bytes} bytes, timestamp policy '{timestamp_policy}')"
    );

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(max_upload_bytes))
            .configure(configure_api)
            // Serve frontend static files
            .service(Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
