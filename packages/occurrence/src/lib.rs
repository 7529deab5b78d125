#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Darwin Core occurrence file loading and cleaning.
//!
//! Turns the bytes of an uploaded tab-delimited occurrence export into an
//! [`OccurrenceDataset`]: the [`loader`] decodes and parses the file, the
//! [`clean`] stage drops records without a species and parses event dates,
//! and the dataset then answers species list and species filter queries.

pub mod clean;
pub mod dates;
pub mod loader;

pub use clean::{OccurrenceDataset, clean};
pub use loader::{RawOccurrence, load_occurrences};

use biodiv_map_occurrence_models::TimestampPolicy;
use thiserror::Error;

/// Errors that can occur while loading an occurrence file.
#[derive(Debug, Error)]
pub enum OccurrenceError {
    /// The file has no header row.
    #[error("Occurrence file is empty")]
    EmptyFile,

    /// The header lacks one or more required Darwin Core columns.
    #[error("Missing required columns: {}", missing.join(", "))]
    MissingColumns {
        /// Names of the missing columns.
        missing: Vec<String>,
    },

    /// An `eventDate` value matched no supported format.
    #[error("Unrecognized eventDate '{value}' for record {id} (line {line})")]
    InvalidEventDate {
        /// Identifier of the offending record.
        id: String,
        /// Line number in the file (1-based, header is line 1).
        line: u64,
        /// The raw value.
        value: String,
    },

    /// Tab-delimited parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Loads and cleans an occurrence file in one step.
///
/// # Errors
///
/// Returns [`OccurrenceError`] if the file cannot be parsed, lacks required
/// columns, or (under [`TimestampPolicy::FailFast`]) contains an
/// unrecognized event date.
pub fn load_dataset(
    bytes: &[u8],
    policy: TimestampPolicy,
) -> Result<OccurrenceDataset, OccurrenceError> {
    let raw = load_occurrences(bytes)?;
    clean(raw, policy)
}
