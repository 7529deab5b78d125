#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Administrative unit and aggregated count types.
//!
//! Cantons are the finest unit of the boundary layer; every canton belongs
//! to exactly one province. The count types are what the aggregation
//! stage produces and what the charts and choropleths consume.

use serde::{Deserialize, Serialize};

/// A canton from the boundary layer, without its geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUnit {
    /// Numeric canton code (unique).
    pub code: i64,
    /// Canton name.
    pub canton: String,
    /// Name of the province the canton belongs to.
    pub province: String,
}

/// Names of the feature properties holding the unit attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryFields {
    /// Property holding the numeric canton code.
    pub code: String,
    /// Property holding the canton name.
    pub canton: String,
    /// Property holding the province name.
    pub province: String,
}

/// Occurrence count for one canton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CantonCount {
    /// Canton code.
    pub code: i64,
    /// Canton name.
    pub canton: String,
    /// Province name.
    pub province: String,
    /// Records whose point lies inside the canton.
    pub count: u64,
}

/// Occurrence count for one province.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceCount {
    /// Province name.
    pub province: String,
    /// Records whose point lies inside any canton of the province.
    pub count: u64,
}

/// Count of records sharing a free-text label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelCount {
    /// Label value.
    pub label: String,
    /// Number of records.
    pub count: u64,
}

/// A time-series data point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// Period label (e.g. "2019", "2019-05").
    pub period: String,
    /// Number of records in this period.
    pub count: u64,
}
