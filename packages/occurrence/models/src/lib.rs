#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Darwin Core occurrence record types.
//!
//! These types describe a single biodiversity observation after it has been
//! read from an uploaded occurrence export and cleaned. They carry no
//! knowledge of administrative boundaries; spatial attribution happens in
//! the analytics layer.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// EPSG code of the geographic reference every occurrence point is tagged
/// with (WGS84 longitude/latitude).
pub const WGS84_EPSG: u32 = 4326;

/// Darwin Core column names read from the occurrence export header.
pub mod columns {
    /// Scientific name at species rank.
    pub const SPECIES: &str = "species";
    /// Date (and optional time) the organism was observed.
    pub const EVENT_DATE: &str = "eventDate";
    /// Decimal latitude in WGS84.
    pub const DECIMAL_LATITUDE: &str = "decimalLatitude";
    /// Decimal longitude in WGS84.
    pub const DECIMAL_LONGITUDE: &str = "decimalLongitude";
    /// Province label as reported by the publisher.
    pub const STATE_PROVINCE: &str = "stateProvince";
    /// Free-text locality description.
    pub const LOCALITY: &str = "locality";

    /// Identifier columns in order of preference. The first one present in
    /// the header is used.
    pub const IDENTIFIER_CANDIDATES: &[&str] = &["gbifID", "occurrenceID", "id"];

    /// Columns that must be present besides an identifier column.
    pub const REQUIRED: &[&str] = &[
        SPECIES,
        EVENT_DATE,
        DECIMAL_LATITUDE,
        DECIMAL_LONGITUDE,
        STATE_PROVINCE,
        LOCALITY,
    ];
}

/// A WGS84 point derived from an occurrence's decimal coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrencePoint {
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Spatial reference of the coordinates. Always [`WGS84_EPSG`].
    pub epsg: u32,
}

impl OccurrencePoint {
    /// Builds a point from a coordinate pair.
    ///
    /// Returns `None` unless both values are present, finite, and within
    /// the valid WGS84 range.
    #[must_use]
    pub fn from_coordinates(longitude: Option<f64>, latitude: Option<f64>) -> Option<Self> {
        let longitude = longitude.filter(|v| v.is_finite() && v.abs() <= 180.0)?;
        let latitude = latitude.filter(|v| v.is_finite() && v.abs() <= 90.0)?;
        Some(Self {
            longitude,
            latitude,
            epsg: WGS84_EPSG,
        })
    }
}

/// A cleaned occurrence record.
///
/// Records only exist once they have a species label; the event date has
/// been parsed and the point geometry derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceRecord {
    /// Record identifier (`gbifID`, `occurrenceID` or `id`).
    pub id: String,
    /// Species name. Never empty.
    pub species: String,
    /// Parsed event date, `None` when the source value was blank (or
    /// unparseable under [`TimestampPolicy::SkipAndWarn`]).
    pub event_date: Option<NaiveDateTime>,
    /// The `eventDate` text as it appeared in the file.
    pub raw_event_date: String,
    /// Reported province label.
    pub state_province: Option<String>,
    /// Reported locality.
    pub locality: Option<String>,
    /// Parsed latitude, if numeric.
    pub latitude: Option<f64>,
    /// Parsed longitude, if numeric.
    pub longitude: Option<f64>,
    /// Point geometry. `None` when either coordinate is missing or invalid.
    pub point: Option<OccurrencePoint>,
}

/// What to do with an `eventDate` value that matches no known format.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPolicy {
    /// Reject the whole file.
    #[default]
    #[strum(to_string = "fail", serialize = "fail_fast")]
    FailFast,
    /// Keep the record without a date and log a warning.
    #[strum(to_string = "skip", serialize = "skip_and_warn")]
    SkipAndWarn,
}

/// Bookkeeping produced by the cleaning stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanSummary {
    /// Data rows read from the file.
    pub total_rows: u64,
    /// Rows dropped because the species field was blank.
    pub dropped_missing_species: u64,
    /// Event dates that could not be parsed (only non-zero when skipping).
    pub invalid_event_dates: u64,
    /// Kept records that have a point geometry.
    pub with_coordinates: u64,
    /// Kept records.
    pub records: u64,
}
