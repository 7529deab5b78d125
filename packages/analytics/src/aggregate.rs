//! Aggregation stages.
//!
//! Canton counts are a left join of the boundary layer against the records
//! attributed by point-in-polygon lookup: every canton appears exactly
//! once, with zero when nothing falls inside it. Province counts are
//! re-aggregated from the canton counts over each canton's province.

use std::collections::BTreeMap;

use biodiv_map_analytics_models::TimeGranularity;
use biodiv_map_geography_models::{CantonCount, LabelCount, ProvinceCount, TimeSeriesPoint};
use biodiv_map_occurrence_models::OccurrenceRecord;
use biodiv_map_spatial::BoundaryIndex;

/// Label used for records without a reported province.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Counts records per canton.
///
/// Records without a point, or whose point lies outside every canton (or
/// exactly on a canton edge), are not counted. The result holds every
/// canton of `index` ordered by code.
#[must_use]
pub fn count_by_canton<'a, I>(records: I, index: &BoundaryIndex) -> Vec<CantonCount>
where
    I: IntoIterator<Item = &'a OccurrenceRecord>,
{
    let mut counts: BTreeMap<i64, u64> = BTreeMap::new();
    let mut outside = 0_u64;

    for point in records.into_iter().filter_map(|r| r.point) {
        match index.lookup(point.longitude, point.latitude) {
            Some(code) => *counts.entry(code).or_insert(0) += 1,
            None => outside += 1,
        }
    }

    if outside > 0 {
        log::debug!("{outside} points fell outside every canton");
    }

    index
        .units()
        .map(|unit| CantonCount {
            code: unit.code,
            canton: unit.canton.clone(),
            province: unit.province.clone(),
            count: counts.get(&unit.code).copied().unwrap_or(0),
        })
        .collect()
}

/// Rolls canton counts up to their provinces.
///
/// Every province that has at least one canton appears once, ordered by
/// name.
#[must_use]
pub fn count_by_province(cantons: &[CantonCount]) -> Vec<ProvinceCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for canton in cantons {
        *counts.entry(canton.province.as_str()).or_insert(0) += canton.count;
    }

    counts
        .into_iter()
        .map(|(province, count)| ProvinceCount {
            province: province.to_string(),
            count,
        })
        .collect()
}

/// Counts records by their reported `stateProvince` label.
///
/// Does not depend on coordinates, so every record is counted. Blank
/// labels are grouped under [`UNKNOWN_LABEL`].
#[must_use]
pub fn count_by_reported_province<'a, I>(records: I) -> Vec<LabelCount>
where
    I: IntoIterator<Item = &'a OccurrenceRecord>,
{
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        let label = record.state_province.as_deref().unwrap_or(UNKNOWN_LABEL);
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut labels: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect();
    labels.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    labels
}

/// Counts dated records per period, in chronological order.
///
/// Records without a parsed date are skipped.
#[must_use]
pub fn count_by_period<'a, I>(records: I, granularity: TimeGranularity) -> Vec<TimeSeriesPoint>
where
    I: IntoIterator<Item = &'a OccurrenceRecord>,
{
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for date in records.into_iter().filter_map(|r| r.event_date) {
        let period = date.format(granularity.format()).to_string();
        *counts.entry(period).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(period, count)| TimeSeriesPoint { period, count })
        .collect()
}

/// Sorts canton counts for the bar chart: descending by count, then by
/// canton name and code.
#[must_use]
pub fn rank_cantons(mut cantons: Vec<CantonCount>) -> Vec<CantonCount> {
    cantons.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.canton.cmp(&b.canton))
            .then_with(|| a.code.cmp(&b.code))
    });
    cantons
}

/// Sorts province counts for the bar chart: descending by count, then by
/// name.
#[must_use]
pub fn rank_provinces(mut provinces: Vec<ProvinceCount>) -> Vec<ProvinceCount> {
    provinces.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.province.cmp(&b.province))
    });
    provinces
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::fixtures::{boundaries, record};

    #[test]
    fn every_canton_appears_once() {
        let index = boundaries();
        let none: Vec<OccurrenceRecord> = Vec::new();
        let counts = count_by_canton(&none, &index);
        let codes: Vec<i64> = counts.iter().map(|c| c.code).collect();
        assert_eq!(codes, vec![101, 102, 201]);
        assert!(counts.iter().all(|c| c.count == 0));
    }

    #[test]
    fn counts_points_inside_cantons() {
        let index = boundaries();
        let records = vec![
            record("1", "Panthera onca", Some((0.2, 0.2))),
            record("2", "Panthera onca", Some((0.4, 0.6))),
            record("3", "Panthera onca", Some((1.5, 0.5))),
            record("4", "Panthera onca", Some((9.0, 9.0))),
            record("5", "Panthera onca", None),
        ];
        let counts = count_by_canton(&records, &index);
        let by_code: BTreeMap<i64, u64> = counts.iter().map(|c| (c.code, c.count)).collect();
        assert_eq!(by_code[&101], 2);
        assert_eq!(by_code[&102], 1);
        assert_eq!(by_code[&201], 0);
    }

    #[test]
    fn canton_sum_matches_points_inside_union() {
        let index = boundaries();
        let records: Vec<_> = (0..40)
            .map(|i| {
                let x = f64::from(i) * 0.07 - 0.3;
                let y = f64::from(i % 7) * 0.33;
                record(&i.to_string(), "Puma concolor", Some((x, y)))
            })
            .collect();

        let total: u64 = count_by_canton(&records, &index).iter().map(|c| c.count).sum();
        let inside = records
            .iter()
            .filter_map(|r| r.point)
            .filter(|p| index.lookup(p.longitude, p.latitude).is_some())
            .count() as u64;

        assert_eq!(total, inside);
        assert!(total <= records.len() as u64);
    }

    #[test]
    fn province_rollup_matches_direct_count() {
        let index = boundaries();
        let records = vec![
            record("1", "Panthera onca", Some((0.2, 0.2))),
            record("2", "Panthera onca", Some((1.5, 0.5))),
            record("3", "Panthera onca", Some((0.5, 1.5))),
            record("4", "Panthera onca", Some((1.7, 0.1))),
        ];

        let rolled = count_by_province(&count_by_canton(&records, &index));

        let mut direct: BTreeMap<String, u64> = index
            .provinces()
            .into_iter()
            .map(|p| (p.to_string(), 0))
            .collect();
        for point in records.iter().filter_map(|r| r.point) {
            if let Some(unit) = index
                .lookup(point.longitude, point.latitude)
                .and_then(|code| index.unit(code))
            {
                *direct.get_mut(&unit.province).unwrap() += 1;
            }
        }

        let rolled: BTreeMap<String, u64> =
            rolled.into_iter().map(|p| (p.province, p.count)).collect();
        assert_eq!(rolled, direct);
        assert_eq!(rolled["Guanacaste"], 3);
        assert_eq!(rolled["Alajuela"], 1);
    }

    #[test]
    fn reported_province_counts_include_records_without_points() {
        let mut unknown = record("3", "Panthera onca", None);
        unknown.state_province = None;
        let records = vec![
            record("1", "Panthera onca", Some((0.2, 0.2))),
            record("2", "Panthera onca", None),
            unknown,
        ];
        let labels = count_by_reported_province(&records);
        assert_eq!(
            labels,
            vec![
                LabelCount {
                    label: "Guanacaste".to_string(),
                    count: 2
                },
                LabelCount {
                    label: UNKNOWN_LABEL.to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn period_counts_are_chronological() {
        let mut later = record("2", "Panthera onca", None);
        later.event_date = NaiveDate::from_ymd_opt(2021, 2, 3).and_then(|d| d.and_hms_opt(0, 0, 0));
        let mut undated = record("3", "Panthera onca", None);
        undated.event_date = None;
        let records = vec![later, record("1", "Panthera onca", None), undated];

        let yearly = count_by_period(&records, TimeGranularity::Yearly);
        assert_eq!(
            yearly,
            vec![
                TimeSeriesPoint {
                    period: "2019".to_string(),
                    count: 1
                },
                TimeSeriesPoint {
                    period: "2021".to_string(),
                    count: 1
                },
            ]
        );

        let monthly = count_by_period(&records, TimeGranularity::Monthly);
        assert_eq!(monthly[0].period, "2019-05");
        assert_eq!(monthly[1].period, "2021-02");
    }

    #[test]
    fn ranking_is_descending() {
        let index = boundaries();
        let records = vec![
            record("1", "Panthera onca", Some((1.2, 0.2))),
            record("2", "Panthera onca", Some((1.5, 0.5))),
            record("3", "Panthera onca", Some((0.5, 1.5))),
        ];
        let cantons = rank_cantons(count_by_canton(&records, &index));
        assert!(cantons.windows(2).all(|w| w[0].count >= w[1].count));
        assert_eq!(cantons[0].code, 102);
        assert_eq!(cantons[1].code, 201);
        assert_eq!(cantons[2].code, 101);

        let provinces = rank_provinces(count_by_province(&cantons));
        assert!(provinces.windows(2).all(|w| w[0].count >= w[1].count));
        assert_eq!(provinces[0].province, "Guanacaste");
    }
}
