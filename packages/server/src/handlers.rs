//! HTTP handler functions for the biodiversity map API.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use biodiv_map_analytics::build_dashboard;
use biodiv_map_occurrence::{OccurrenceDataset, load_dataset};
use biodiv_map_server_models::{ApiHealth, DashboardQueryParams, UploadResponse};
use uuid::Uuid;

use crate::{AppState, ServerError};

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/boundaries`
///
/// Returns the canton polygons with `code`, `canton` and `province`
/// properties.
pub async fn boundaries(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.boundaries.feature_collection())
}

/// `POST /api/occurrences`
///
/// Takes the raw bytes of a tab-delimited occurrence file, cleans it, and
/// stores the result under a new session.
pub async fn upload(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ServerError> {
    let dataset = load_dataset(&body, state.timestamp_policy)?;
    let summary = dataset.summary().clone();
    let species = dataset.species();

    let session_id = state
        .sessions
        .lock()
        .map_err(|_| ServerError::SessionLock)?
        .insert(dataset);

    log::info!(
        "Session {session_id}: {} records, {} species ({} bytes uploaded)",
        summary.records,
        species.len(),
        body.len()
    );

    Ok(HttpResponse::Ok().json(UploadResponse {
        session_id,
        summary,
        species,
    }))
}

/// `GET /api/occurrences/{session}/species`
pub async fn species(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ServerError> {
    let dataset = session(&state, *path)?;
    Ok(HttpResponse::Ok().json(dataset.species()))
}

/// `GET /api/occurrences/{session}/dashboard?species=...&granularity=...`
///
/// Filters the session's dataset to one species and returns the table,
/// chart series and map data for it.
pub async fn dashboard(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    params: web::Query<DashboardQueryParams>,
) -> Result<HttpResponse, ServerError> {
    let species = params
        .species
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(ServerError::MissingSpecies)?;

    let dataset = session(&state, *path)?;
    let granularity = params.granularity.unwrap_or_default();
    let dashboard = build_dashboard(&dataset, species, granularity, &state.boundaries);
    Ok(HttpResponse::Ok().json(dashboard))
}

/// `DELETE /api/occurrences/{session}`
pub async fn delete_session(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ServerError> {
    let id = *path;
    let removed = state
        .sessions
        .lock()
        .map_err(|_| ServerError::SessionLock)?
        .remove(&id);

    if removed {
        log::info!("Session {id} deleted");
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(ServerError::SessionNotFound(id))
    }
}

/// Looks up a session, releasing the store lock before returning.
fn session(state: &AppState, id: Uuid) -> Result<Arc<OccurrenceDataset>, ServerError> {
    state
        .sessions
        .lock()
        .map_err(|_| ServerError::SessionLock)?
        .get(&id)
        .ok_or(ServerError::SessionNotFound(id))
}
