//! Server error type and its HTTP mapping.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use biodiv_map_occurrence::OccurrenceError;
use biodiv_map_server_models::ApiError;
use biodiv_map_spatial::BoundaryError;
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The uploaded file could not be loaded or cleaned.
    #[error(transparent)]
    Occurrence(#[from] OccurrenceError),

    /// The boundary layer could not be loaded.
    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    /// No dataset is stored under the session id (never uploaded, deleted,
    /// or evicted).
    #[error("Unknown session {0}")]
    SessionNotFound(Uuid),

    /// The dashboard request has no species selected.
    #[error("Missing 'species' query parameter")]
    MissingSpecies,

    /// The session store mutex was poisoned by a panicking request.
    #[error("Session store is unavailable")]
    SessionLock,
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Occurrence(_) | Self::MissingSpecies => StatusCode::BAD_REQUEST,
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Self::Boundary(_) | Self::SessionLock => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{self}");
        } else {
            log::debug!("Rejected request: {self}");
        }
        HttpResponse::build(status).json(ApiError {
            error: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_statuses() {
        assert_eq!(
            ServerError::Occurrence(OccurrenceError::EmptyFile).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::MissingSpecies.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::SessionNotFound(Uuid::nil()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServerError::SessionLock.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn occurrence_errors_keep_their_message() {
        let err = ServerError::from(OccurrenceError::MissingColumns {
            missing: vec!["species".to_string()],
        });
        assert_eq!(err.to_string(), "Missing required columns: species");
    }
}
