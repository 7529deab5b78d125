#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the biodiversity map server.
//!
//! The dashboard body itself is the analytics `Dashboard`; the types here
//! cover the envelope around it: health, uploads, query parameters and
//! error bodies.

use biodiv_map_analytics_models::TimeGranularity;
use biodiv_map_occurrence_models::CleanSummary;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Response to a successful occurrence file upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Handle for follow-up species and dashboard requests.
    pub session_id: Uuid,
    /// What the cleaning stage kept and dropped.
    pub summary: CleanSummary,
    /// Distinct species, sorted ascending.
    pub species: Vec<String>,
}

/// Query parameters for the dashboard endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQueryParams {
    /// Exact species name to filter on.
    pub species: Option<String>,
    /// Time-series granularity (`yearly` or `monthly`); yearly when absent.
    pub granularity: Option<TimeGranularity>,
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}
