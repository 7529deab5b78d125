//! Plain-text rendering of species lists and dashboards.

use std::fmt;
use std::path::Path;

use biodiv_map_analytics_models::Dashboard;
use biodiv_map_occurrence::{OccurrenceDataset, load_dataset};
use biodiv_map_occurrence_models::TimestampPolicy;
use biodiv_map_spatial::{BoundaryIndex, fields};

/// Reads and cleans an occurrence file from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails to load.
pub fn load_file(
    path: &Path,
    policy: TimestampPolicy,
) -> Result<OccurrenceDataset, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let dataset = load_dataset(&bytes, policy)?;
    log::info!(
        "Loaded {} records ({} species) from {}",
        dataset.summary().records,
        dataset.species().len(),
        path.display()
    );
    Ok(dataset)
}

/// Loads the canton boundary layer, with an optional field mapping file.
///
/// # Errors
///
/// Returns an error if the mapping or the boundary file is invalid.
pub fn load_boundaries(
    path: &Path,
    fields_path: Option<&Path>,
) -> Result<BoundaryIndex, Box<dyn std::error::Error>> {
    let mapping = match fields_path {
        Some(p) => fields::load_fields(p)?,
        None => fields::default_fields(),
    };
    Ok(BoundaryIndex::from_path(path, &mapping)?)
}

/// One species per line.
pub struct SpeciesList<'a>(pub &'a OccurrenceDataset);

impl fmt::Display for SpeciesList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in self.0.species() {
            writeln!(f, "{name}")?;
        }
        Ok(())
    }
}

/// Totals followed by the province, canton and time-series tables.
pub struct DashboardReport<'a>(pub &'a Dashboard);

impl fmt::Display for DashboardReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dashboard = self.0;
        let totals = &dashboard.totals;

        writeln!(f, "Species: {}", dashboard.species)?;
        writeln!(f, "Records: {}", totals.records)?;
        writeln!(f, "With coordinates: {}", totals.with_coordinates)?;
        writeln!(f, "Inside cantons: {}", totals.inside_units)?;

        writeln!(f)?;
        writeln!(f, "{:<32} {:>8}", "Reported province", "Count")?;
        for row in &dashboard.by_reported_province {
            writeln!(f, "{:<32} {:>8}", row.label, row.count)?;
        }

        writeln!(f)?;
        writeln!(f, "{:<32} {:>8}", "Province (by canton)", "Count")?;
        for row in &dashboard.by_province {
            writeln!(f, "{:<32} {:>8}", row.province, row.count)?;
        }

        writeln!(f)?;
        writeln!(f, "{:<6} {:<32} {:<24} {:>8}", "Code", "Canton", "Province", "Count")?;
        for row in &dashboard.by_canton {
            writeln!(
                f,
                "{:<6} {:<32} {:<24} {:>8}",
                row.code, row.canton, row.province, row.count
            )?;
        }

        if !dashboard.by_period.is_empty() {
            writeln!(f)?;
            writeln!(f, "Records per {}", dashboard.granularity)?;
            for point in &dashboard.by_period {
                writeln!(f, "{:<8} {:>8}", point.period, point.count)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use biodiv_map_analytics::build_dashboard;
    use biodiv_map_analytics_models::TimeGranularity;

    use super::*;

    const FILE: &str = "gbifID\tspecies\teventDate\tdecimalLatitude\tdecimalLongitude\tstateProvince\tlocality\n\
        1\tPanthera onca\t2019-05-12\t0.5\t0.5\tGuanacaste\tSanta Rosa\n\
        2\tPanthera onca\t2020-01-15\t0.5\t1.5\tGuanacaste\tBelen\n\
        3\tAra macao\t2021-03-03\t0.5\t0.5\tGuanacaste\tNicoya\n";

    fn boundaries() -> BoundaryIndex {
        let features: Vec<serde_json::Value> = [(101, "Liberia", 0.0), (102, "Carrillo", 1.0)]
            .into_iter()
            .map(|(code, canton, x)| {
                serde_json::json!({
                    "type": "Feature",
                    "properties": { "cod_canton": code, "canton": canton, "provincia": "Guanacaste" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[x, 0.0], [x + 1.0, 0.0], [x + 1.0, 1.0], [x, 1.0], [x, 0.0]]]
                    }
                })
            })
            .collect();
        let text = serde_json::json!({ "type": "FeatureCollection", "features": features });
        BoundaryIndex::from_geojson_str(&text.to_string(), &fields::default_fields()).unwrap()
    }

    #[test]
    fn species_are_listed_in_order() {
        let dataset = load_dataset(FILE.as_bytes(), TimestampPolicy::FailFast).unwrap();
        assert_eq!(
            SpeciesList(&dataset).to_string(),
            "Ara macao\nPanthera onca\n"
        );
    }

    #[test]
    fn report_lists_every_canton() {
        let dataset = load_dataset(FILE.as_bytes(), TimestampPolicy::FailFast).unwrap();
        let dashboard = build_dashboard(
            &dataset,
            "Panthera onca",
            TimeGranularity::Yearly,
            &boundaries(),
        );
        let text = DashboardReport(&dashboard).to_string();

        assert!(text.starts_with("Species: Panthera onca\nRecords: 2\n"));
        assert!(text.contains("Inside cantons: 2"));
        assert!(text.contains("Liberia"));
        assert!(text.contains("Carrillo"));
        assert!(text.contains("Records per year\n2019"));
    }

    #[test]
    fn reported_provinces_include_records_outside_cantons() {
        let file = format!("{FILE}4\tPanthera onca\t2020-01-20\t\t\tGuanacaste\tNicoya\n");
        let dataset = load_dataset(file.as_bytes(), TimestampPolicy::FailFast).unwrap();
        let dashboard = build_dashboard(
            &dataset,
            "Panthera onca",
            TimeGranularity::Monthly,
            &boundaries(),
        );
        let text = DashboardReport(&dashboard).to_string();

        assert!(text.contains("Inside cantons: 2"));
        let reported = text.split("Province (by canton)").next().unwrap();
        assert!(reported.contains(&format!("{:<32} {:>8}", "Guanacaste", 3)));
        assert!(text.contains("Records per month\n2019-05"));
        assert!(text.contains(&format!("{:<8} {:>8}", "2020-01", 2)));
    }
}
