#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard view types.
//!
//! A [`Dashboard`] is everything the frontend needs to render one species
//! selection: the record table, the ranked bar chart series, the count
//! maps joined onto the choropleths, and the marker set.

use std::collections::BTreeMap;

use biodiv_map_geography_models::{CantonCount, LabelCount, ProvinceCount, TimeSeriesPoint};
use biodiv_map_occurrence_models::OccurrenceRecord;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

/// Granularity for time-series counts.
///
/// Parses from `monthly` / `yearly` (query string and CLI); displays as
/// the period unit (`month` / `year`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TimeGranularity {
    /// Monthly counts.
    Monthly,
    /// Yearly counts.
    #[default]
    Yearly,
}

impl TimeGranularity {
    /// `chrono` format string producing the period label.
    #[must_use]
    pub const fn format(self) -> &'static str {
        match self {
            Self::Monthly => "%Y-%m",
            Self::Yearly => "%Y",
        }
    }
}

impl std::fmt::Display for TimeGranularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Monthly => write!(f, "month"),
            Self::Yearly => write!(f, "year"),
        }
    }
}

/// One row of the record table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    /// Parsed event date.
    pub event_date: Option<NaiveDateTime>,
    /// Species name.
    pub species: String,
    /// Reported province.
    pub state_province: Option<String>,
    /// Reported locality.
    pub locality: Option<String>,
}

impl From<&OccurrenceRecord> for TableRow {
    fn from(record: &OccurrenceRecord) -> Self {
        Self {
            event_date: record.event_date,
            species: record.species.clone(),
            state_province: record.state_province.clone(),
            locality: record.locality.clone(),
        }
    }
}

/// A point marker with its popup content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Record identifier.
    pub id: String,
    /// Longitude.
    pub longitude: f64,
    /// Latitude.
    pub latitude: f64,
    /// Species name.
    pub species: String,
    /// Reported province.
    pub state_province: Option<String>,
    /// Event date.
    pub event_date: Option<NaiveDateTime>,
}

/// Headline numbers for a species selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTotals {
    /// Records of the selected species.
    pub records: u64,
    /// Of those, records with a usable point.
    pub with_coordinates: u64,
    /// Of those, records attributed to a canton.
    pub inside_units: u64,
}

/// Everything derived for one species selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// The selected species.
    pub species: String,
    /// Headline numbers.
    pub totals: DashboardTotals,
    /// Record table, in file order.
    pub table: Vec<TableRow>,
    /// Records inside each province's cantons, descending by count.
    pub by_province: Vec<ProvinceCount>,
    /// Canton bar chart series, descending by count.
    pub by_canton: Vec<CantonCount>,
    /// Canton code to count, every canton present.
    pub canton_counts: BTreeMap<i64, u64>,
    /// Province name to count, every province present.
    pub province_counts: BTreeMap<String, u64>,
    /// Counts by reported `stateProvince`, including records without a
    /// point. Descending by count; sums to the table length. Backs the
    /// province bar chart.
    pub by_reported_province: Vec<LabelCount>,
    /// Granularity of [`Self::by_period`].
    pub granularity: TimeGranularity,
    /// Distribution of dated records over time, chronological.
    pub by_period: Vec<TimeSeriesPoint>,
    /// Map markers for records with a point.
    pub markers: Vec<Marker>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granularity_parses_and_displays() {
        assert_eq!("monthly".parse::<TimeGranularity>().unwrap(), TimeGranularity::Monthly);
        assert_eq!("Yearly".parse::<TimeGranularity>().unwrap(), TimeGranularity::Yearly);
        assert!("weekly".parse::<TimeGranularity>().is_err());
        assert_eq!(TimeGranularity::Monthly.to_string(), "month");
        assert_eq!(TimeGranularity::default(), TimeGranularity::Yearly);
    }
}
