//! Tab-delimited Darwin Core reader.
//!
//! Occurrence exports (e.g. GBIF "simple" downloads) are Latin-1 encoded,
//! tab-separated and unquoted. Each row becomes a [`RawOccurrence`] with
//! its coordinates parsed and a point derived where possible.

use std::borrow::Cow;

use biodiv_map_occurrence_models::{OccurrencePoint, columns};
use csv::StringRecord;
use encoding_rs::Encoding;

use crate::OccurrenceError;

/// Field delimiter of occurrence exports.
pub const FIELD_DELIMITER: u8 = b'\t';

/// Label of the text encoding occurrence exports are read with.
pub const SOURCE_ENCODING: &str = "iso-8859-1";

/// An occurrence row as read from the file, before cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOccurrence {
    /// Line number in the file (header is line 1).
    pub line: u64,
    /// Record identifier.
    pub id: String,
    /// Species label, possibly empty.
    pub species: String,
    /// Unparsed `eventDate` text.
    pub event_date: String,
    /// Reported province label.
    pub state_province: Option<String>,
    /// Reported locality.
    pub locality: Option<String>,
    /// Latitude, if numeric.
    pub latitude: Option<f64>,
    /// Longitude, if numeric.
    pub longitude: Option<f64>,
    /// Derived point geometry.
    pub point: Option<OccurrencePoint>,
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    id: usize,
    species: usize,
    event_date: usize,
    latitude: usize,
    longitude: usize,
    state_province: usize,
    locality: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self, OccurrenceError> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<String> = columns::REQUIRED
            .iter()
            .filter(|name| position(**name).is_none())
            .map(|name| (*name).to_string())
            .collect();

        let id = columns::IDENTIFIER_CANDIDATES
            .iter()
            .find_map(|name| position(*name));

        let Some(id) = id.filter(|_| missing.is_empty()) else {
            let mut missing = missing;
            if id.is_none() {
                missing.push(columns::IDENTIFIER_CANDIDATES.join("|"));
            }
            return Err(OccurrenceError::MissingColumns { missing });
        };

        // Every required column was found above.
        let required = |name: &str| position(name).unwrap_or_default();

        Ok(Self {
            id,
            species: required(columns::SPECIES),
            event_date: required(columns::EVENT_DATE),
            latitude: required(columns::DECIMAL_LATITUDE),
            longitude: required(columns::DECIMAL_LONGITUDE),
            state_province: required(columns::STATE_PROVINCE),
            locality: required(columns::LOCALITY),
        })
    }
}

/// Decodes occurrence file bytes as ISO-8859-1.
///
/// Follows the WHATWG mapping of the `iso-8859-1` label (windows-1252),
/// which decodes every byte. A leading byte order mark overrides the
/// encoding, so UTF-8 exports with a BOM also load correctly.
#[must_use]
pub fn decode_latin1(bytes: &[u8]) -> Cow<'_, str> {
    let encoding =
        Encoding::for_label(SOURCE_ENCODING.as_bytes()).unwrap_or(encoding_rs::WINDOWS_1252);
    let (decoded, used, _) = encoding.decode(bytes);
    if used != encoding {
        log::debug!("Byte order mark found, decoding as {}", used.name());
    }
    decoded
}

/// Parses an occurrence export into raw rows.
///
/// # Errors
///
/// Returns [`OccurrenceError::EmptyFile`] if there is no header row,
/// [`OccurrenceError::MissingColumns`] if required columns are absent, or
/// [`OccurrenceError::Csv`] if a row cannot be read.
pub fn load_occurrences(bytes: &[u8]) -> Result<Vec<RawOccurrence>, OccurrenceError> {
    let text = decode_latin1(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(OccurrenceError::EmptyFile);
    }

    let index = ColumnIndex::resolve(&headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, csv::Position::line);
        rows.push(parse_row(&record, index, line));
    }

    let with_points = rows.iter().filter(|r| r.point.is_some()).count();
    log::info!(
        "Parsed {} occurrence rows ({with_points} with usable coordinates)",
        rows.len()
    );

    Ok(rows)
}

fn parse_row(record: &StringRecord, index: ColumnIndex, line: u64) -> RawOccurrence {
    let text = |i: usize| record.get(i).map(str::trim).unwrap_or_default();
    let optional = |i: usize| Some(text(i)).filter(|s| !s.is_empty()).map(str::to_string);

    let latitude = parse_coordinate(text(index.latitude));
    let longitude = parse_coordinate(text(index.longitude));
    let point = OccurrencePoint::from_coordinates(longitude, latitude);

    if point.is_none() {
        log::debug!("Line {line}: no usable coordinates");
    }

    RawOccurrence {
        line,
        id: text(index.id).to_string(),
        species: text(index.species).to_string(),
        event_date: text(index.event_date).to_string(),
        state_province: optional(index.state_province),
        locality: optional(index.locality),
        latitude,
        longitude,
        point,
    }
}

/// Parses a decimal coordinate. Blank and non-numeric values yield `None`.
fn parse_coordinate(value: &str) -> Option<f64> {
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}
