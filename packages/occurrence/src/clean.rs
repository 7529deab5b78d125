//! Cleaning and species filtering.
//!
//! Drops rows without a species label, parses event dates according to a
//! [`TimestampPolicy`], and wraps the survivors in an [`OccurrenceDataset`]
//! that serves the species selection list and per-species subsets.

use std::collections::BTreeSet;

use biodiv_map_occurrence_models::{CleanSummary, OccurrenceRecord, TimestampPolicy};

use crate::OccurrenceError;
use crate::dates::parse_event_date;
use crate::loader::RawOccurrence;

/// Cleaned occurrence records from a single uploaded file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OccurrenceDataset {
    records: Vec<OccurrenceRecord>,
    summary: CleanSummary,
}

impl OccurrenceDataset {
    /// All cleaned records, in file order.
    #[must_use]
    pub fn records(&self) -> &[OccurrenceRecord] {
        &self.records
    }

    /// Counters collected while cleaning.
    #[must_use]
    pub const fn summary(&self) -> &CleanSummary {
        &self.summary
    }

    /// Distinct species names, sorted ascending.
    #[must_use]
    pub fn species(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.species.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Records whose species equals `species` exactly (case-sensitive).
    #[must_use]
    pub fn filter_species(&self, species: &str) -> Vec<&OccurrenceRecord> {
        self.records
            .iter()
            .filter(|r| r.species == species)
            .collect()
    }
}

/// Cleans raw rows into a dataset.
///
/// # Errors
///
/// Under [`TimestampPolicy::FailFast`], returns
/// [`OccurrenceError::InvalidEventDate`] for the first record whose
/// `eventDate` is not blank and matches no supported layout.
pub fn clean(
    raw: Vec<RawOccurrence>,
    policy: TimestampPolicy,
) -> Result<OccurrenceDataset, OccurrenceError> {
    let mut summary = CleanSummary {
        total_rows: raw.len() as u64,
        ..CleanSummary::default()
    };
    let mut records = Vec::with_capacity(raw.len());

    for row in raw {
        if row.species.is_empty() {
            summary.dropped_missing_species += 1;
            continue;
        }

        let event_date = if row.event_date.is_empty() {
            None
        } else {
            match (parse_event_date(&row.event_date), policy) {
                (Some(parsed), _) => Some(parsed),
                (None, TimestampPolicy::FailFast) => {
                    return Err(OccurrenceError::InvalidEventDate {
                        id: row.id,
                        line: row.line,
                        value: row.event_date,
                    });
                }
                (None, TimestampPolicy::SkipAndWarn) => {
                    log::warn!(
                        "Line {}: ignoring unrecognized eventDate '{}'",
                        row.line,
                        row.event_date
                    );
                    summary.invalid_event_dates += 1;
                    None
                }
            }
        };

        if row.point.is_some() {
            summary.with_coordinates += 1;
        }

        records.push(OccurrenceRecord {
            id: row.id,
            species: row.species,
            event_date,
            raw_event_date: row.event_date,
            state_province: row.state_province,
            locality: row.locality,
            latitude: row.latitude,
            longitude: row.longitude,
            point: row.point,
        });
    }

    summary.records = records.len() as u64;

    if summary.dropped_missing_species > 0 {
        log::debug!(
            "Dropped {} rows without a species",
            summary.dropped_missing_species
        );
    }
    log::info!(
        "Cleaned {} of {} occurrence rows",
        summary.records,
        summary.total_rows
    );

    Ok(OccurrenceDataset { records, summary })
}

#[cfg(test)]
mod tests {
    use biodiv_map_occurrence_models::OccurrencePoint;

    use super::*;

    fn raw(id: &str, species: &str, date: &str, coords: Option<(f64, f64)>) -> RawOccurrence {
        RawOccurrence {
            line: id.parse::<u64>().unwrap_or(0) + 1,
            id: id.to_string(),
            species: species.to_string(),
            event_date: date.to_string(),
            state_province: Some("Guanacaste".to_string()),
            locality: None,
            latitude: coords.map(|(_, lat)| lat),
            longitude: coords.map(|(lng, _)| lng),
            point: coords.and_then(|(lng, lat)| OccurrencePoint::from_coordinates(Some(lng), Some(lat))),
        }
    }

    #[test]
    fn drops_records_without_species() {
        let dataset = clean(
            vec![
                raw("1", "Panthera onca", "2019-05-12", Some((-85.3, 10.5))),
                raw("2", "", "2019-05-12", Some((-85.3, 10.5))),
            ],
            TimestampPolicy::FailFast,
        )
        .unwrap();
        assert_eq!(dataset.records().len(), 1);
        assert_eq!(dataset.summary().dropped_missing_species, 1);
        assert_eq!(dataset.summary().total_rows, 2);
        assert_eq!(dataset.summary().with_coordinates, 1);
    }

    #[test]
    fn species_list_is_sorted_and_distinct() {
        let raw_rows = vec![
            raw("1", "Puma concolor", "2019", None),
            raw("2", "Leopardus wiedii", "2019", None),
            raw("3", "Puma concolor", "2020", None),
            raw("4", "", "2020", None),
            raw("5", "Leopardus pardalis", "2020", None),
        ];
        let dataset = clean(raw_rows.clone(), TimestampPolicy::FailFast).unwrap();
        let species = dataset.species();
        assert_eq!(
            species,
            vec!["Leopardus pardalis", "Leopardus wiedii", "Puma concolor"]
        );

        for name in &species {
            assert!(
                raw_rows.iter().any(|r| &r.species == name && !r.species.is_empty()),
                "{name} not present in raw rows"
            );
        }
    }

    #[test]
    fn filter_is_exact_and_case_sensitive() {
        let dataset = clean(
            vec![
                raw("1", "Panthera onca", "2019", None),
                raw("2", "panthera onca", "2019", None),
                raw("3", "Panthera onca centralis", "2019", None),
            ],
            TimestampPolicy::FailFast,
        )
        .unwrap();
        let selected = dataset.filter_species("Panthera onca");
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, "1");
        assert!(dataset.filter_species("Tapirus bairdii").is_empty());
    }

    #[test]
    fn fail_fast_rejects_bad_dates() {
        let result = clean(
            vec![
                raw("1", "Panthera onca", "2019-05-12", None),
                raw("2", "Panthera onca", "last tuesday", None),
            ],
            TimestampPolicy::FailFast,
        );
        let Err(OccurrenceError::InvalidEventDate { id, line, value }) = result else {
            panic!("expected invalid event date");
        };
        assert_eq!(id, "2");
        assert_eq!(line, 3);
        assert_eq!(value, "last tuesday");
    }

    #[test]
    fn skip_and_warn_keeps_record_without_date() {
        let dataset = clean(
            vec![raw("1", "Panthera onca", "last tuesday", None)],
            TimestampPolicy::SkipAndWarn,
        )
        .unwrap();
        assert_eq!(dataset.records().len(), 1);
        assert!(dataset.records()[0].event_date.is_none());
        assert_eq!(dataset.records()[0].raw_event_date, "last tuesday");
        assert_eq!(dataset.summary().invalid_event_dates, 1);
    }

    #[test]
    fn blank_dates_are_not_errors() {
        let dataset = clean(
            vec![raw("1", "Panthera onca", "", None)],
            TimestampPolicy::FailFast,
        )
        .unwrap();
        assert!(dataset.records()[0].event_date.is_none());
    }

    #[test]
    fn cleaning_is_idempotent() {
        let rows = vec![
            raw("1", "Panthera onca", "2019-05-12", Some((-85.3, 10.5))),
            raw("2", "Puma concolor", "2019-05", None),
        ];
        let a = clean(rows.clone(), TimestampPolicy::FailFast).unwrap();
        let b = clean(rows, TimestampPolicy::FailFast).unwrap();
        assert_eq!(a, b);
    }
}
