//! Boundary attribute mapping.
//!
//! The property names of the boundary layer are described in TOML. The
//! default mapping for the canton layer is embedded at compile time; a
//! different layer can be used by pointing at another TOML file.

use std::path::Path;

use biodiv_map_geography_models::BoundaryFields;

use crate::BoundaryError;

/// Embedded mapping for the canton boundary layer.
const DEFAULT_FIELDS_TOML: &str = include_str!("../fields/cantones.toml");

/// Returns the embedded canton field mapping.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse. It is a compile-time
/// constant, so a failure is a development error caught by the tests.
#[must_use]
pub fn default_fields() -> BoundaryFields {
    toml::de::from_str(DEFAULT_FIELDS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded boundary fields: {e}"))
}

/// Reads a field mapping from a TOML file.
///
/// # Errors
///
/// Returns [`BoundaryError::Io`] if the file cannot be read or
/// [`BoundaryError::Fields`] if it is not a valid mapping.
pub fn load_fields(path: &Path) -> Result<BoundaryFields, BoundaryError> {
    let text = std::fs::read_to_string(path).map_err(|source| BoundaryError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(toml::de::from_str(&text)?)
}
