//! Per-request dashboard assembly.
//!
//! One call per user action: the current dataset and species selection go
//! in, the table, chart series and map data come out.

use biodiv_map_analytics_models::{
    Dashboard, DashboardTotals, Marker, TableRow, TimeGranularity,
};
use biodiv_map_occurrence::OccurrenceDataset;
use biodiv_map_occurrence_models::OccurrenceRecord;
use biodiv_map_spatial::BoundaryIndex;

use crate::aggregate::{
    count_by_canton, count_by_period, count_by_province, count_by_reported_province,
    rank_cantons, rank_provinces,
};

/// Builds the dashboard for one species, with the time series at
/// `granularity`.
///
/// A species with no records is not an error: the table and markers are
/// empty and every canton and province count is zero.
#[must_use]
pub fn build_dashboard(
    dataset: &OccurrenceDataset,
    species: &str,
    granularity: TimeGranularity,
    index: &BoundaryIndex,
) -> Dashboard {
    let selected = dataset.filter_species(species);

    let cantons = count_by_canton(selected.iter().copied(), index);
    let provinces = count_by_province(&cantons);

    let totals = DashboardTotals {
        records: selected.len() as u64,
        with_coordinates: selected.iter().filter(|r| r.point.is_some()).count() as u64,
        inside_units: cantons.iter().map(|c| c.count).sum(),
    };

    log::debug!(
        "Dashboard for '{species}': {} records, {} with coordinates, {} inside cantons",
        totals.records,
        totals.with_coordinates,
        totals.inside_units
    );

    Dashboard {
        species: species.to_string(),
        totals,
        table: selected.iter().copied().map(TableRow::from).collect(),
        canton_counts: cantons.iter().map(|c| (c.code, c.count)).collect(),
        province_counts: provinces
            .iter()
            .map(|p| (p.province.clone(), p.count))
            .collect(),
        by_province: rank_provinces(provinces),
        by_canton: rank_cantons(cantons),
        by_reported_province: count_by_reported_province(selected.iter().copied()),
        granularity,
        by_period: count_by_period(selected.iter().copied(), granularity),
        markers: selected.iter().copied().filter_map(marker).collect(),
    }
}

fn marker(record: &OccurrenceRecord) -> Option<Marker> {
    let point = record.point?;
    Some(Marker {
        id: record.id.clone(),
        longitude: point.longitude,
        latitude: point.latitude,
        species: record.species.clone(),
        state_province: record.state_province.clone(),
        event_date: record.event_date,
    })
}
