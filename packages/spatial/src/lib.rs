#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory boundary index for canton attribution.
//!
//! Loads the canton polygons from a `GeoJSON` file once at startup, builds
//! an R-tree over their envelopes, and answers point-in-polygon lookups.
//! The index is immutable after construction and is shared read-only by
//! every request.
//!
//! Containment uses [`geo::Contains`]: a point lying exactly on a polygon
//! edge is not contained by that polygon, so a point on the border between
//! two cantons is attributed to neither.

pub mod fields;

use std::collections::BTreeMap;
use std::path::Path;

use biodiv_map_geography_models::{AdminUnit, BoundaryFields};
use geo::{BoundingRect, Contains, MultiPolygon};
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject};
use rstar::{AABB, RTree, RTreeObject};
use thiserror::Error;

/// Errors that can occur while loading the boundary layer.
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// The boundary or field mapping file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The field mapping is not valid TOML.
    #[error("Field mapping error: {0}")]
    Fields(#[from] toml::de::Error),

    /// The top-level object is not a `FeatureCollection`.
    #[error("Boundary file must contain a GeoJSON FeatureCollection")]
    NotFeatureCollection,

    /// The layer declares a coordinate reference other than WGS84.
    #[error("Unsupported coordinate reference system '{0}': boundaries must be WGS84 (EPSG:4326)")]
    UnsupportedCrs(String),

    /// A feature is missing its geometry or an attribute.
    #[error("Invalid boundary feature #{index}: {reason}")]
    InvalidFeature {
        /// Position of the feature in the collection.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// Two features share the same unit code.
    #[error("Duplicate canton code {0}")]
    DuplicateCode(i64),

    /// The collection has no features.
    #[error("Boundary file contains no features")]
    Empty,
}

/// A canton polygon stored in the R-tree.
struct BoundaryEntry {
    code: i64,
    envelope: AABB<[f64; 2]>,
    polygon: MultiPolygon<f64>,
}

impl RTreeObject for BoundaryEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Canton polygons with their attributes.
///
/// Constructed once per process. Provides point-in-polygon lookups and the
/// normalized `GeoJSON` served to the map.
pub struct BoundaryIndex {
    tree: RTree<BoundaryEntry>,
    units: BTreeMap<i64, AdminUnit>,
    collection: FeatureCollection,
}

impl BoundaryIndex {
    /// Reads and indexes a boundary `GeoJSON` file.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError`] if the file is missing or unreadable, is
    /// not a WGS84 `FeatureCollection` of polygons, or any feature lacks
    /// a valid code, canton or province.
    pub fn from_path(path: &Path, fields: &BoundaryFields) -> Result<Self, BoundaryError> {
        let text = std::fs::read_to_string(path).map_err(|source| BoundaryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let index = Self::from_geojson_str(&text, fields)?;
        log::info!(
            "Loaded {} cantons in {} provinces from {}",
            index.len(),
            index.provinces().len(),
            path.display()
        );
        Ok(index)
    }

    /// Indexes a boundary layer given as `GeoJSON` text.
    ///
    /// # Errors
    ///
    /// See [`Self::from_path`].
    pub fn from_geojson_str(text: &str, fields: &BoundaryFields) -> Result<Self, BoundaryError> {
        let GeoJson::FeatureCollection(collection) = text.parse::<GeoJson>()? else {
            return Err(BoundaryError::NotFeatureCollection);
        };

        check_crs(collection.foreign_members.as_ref())?;

        if collection.features.is_empty() {
            return Err(BoundaryError::Empty);
        }

        let mut entries = Vec::with_capacity(collection.features.len());
        let mut units = BTreeMap::new();
        let mut features = BTreeMap::new();

        for (index, feature) in collection.features.into_iter().enumerate() {
            let invalid = |reason: String| BoundaryError::InvalidFeature { index, reason };

            let props = feature.properties.as_ref();
            let code = props
                .and_then(|p| p.get(&fields.code))
                .and_then(parse_code)
                .ok_or_else(|| invalid(format!("missing or non-numeric '{}'", fields.code)))?;
            let canton = text_property(props, &fields.canton)
                .ok_or_else(|| invalid(format!("missing '{}'", fields.canton)))?;
            let province = text_property(props, &fields.province)
                .ok_or_else(|| invalid(format!("missing '{}'", fields.province)))?;

            let geometry = feature
                .geometry
                .ok_or_else(|| invalid("missing geometry".to_string()))?;
            let polygon = match geo::Geometry::<f64>::try_from(geometry.clone())? {
                geo::Geometry::MultiPolygon(mp) => mp,
                geo::Geometry::Polygon(p) => MultiPolygon(vec![p]),
                _ => return Err(invalid("geometry is not a Polygon or MultiPolygon".to_string())),
            };
            let envelope =
                compute_envelope(&polygon).ok_or_else(|| invalid("empty geometry".to_string()))?;

            let unit = AdminUnit {
                code,
                canton,
                province,
            };
            if units.insert(code, unit.clone()).is_some() {
                return Err(BoundaryError::DuplicateCode(code));
            }

            features.insert(code, unit_feature(&unit, geometry));
            entries.push(BoundaryEntry {
                code,
                envelope,
                polygon,
            });
        }

        Ok(Self {
            tree: RTree::bulk_load(entries),
            units,
            collection: FeatureCollection {
                bbox: None,
                features: features.into_values().collect(),
                foreign_members: None,
            },
        })
    }

    /// Looks up the canton whose polygon contains the point.
    ///
    /// Cantons tile without overlap, so the first match wins. Points on a
    /// canton edge, or outside every canton, yield `None`.
    #[must_use]
    pub fn lookup(&self, lng: f64, lat: f64) -> Option<i64> {
        let point = geo::Point::new(lng, lat);
        let query_env = AABB::from_point([lng, lat]);

        self.tree
            .locate_in_envelope_intersecting(&query_env)
            .find(|entry| entry.polygon.contains(&point))
            .map(|entry| entry.code)
    }

    /// Returns the attributes of a canton.
    #[must_use]
    pub fn unit(&self, code: i64) -> Option<&AdminUnit> {
        self.units.get(&code)
    }

    /// Iterates over all cantons ordered by code.
    pub fn units(&self) -> impl Iterator<Item = &AdminUnit> {
        self.units.values()
    }

    /// Distinct province names, sorted ascending.
    #[must_use]
    pub fn provinces(&self) -> Vec<&str> {
        let mut provinces: Vec<&str> = self.units.values().map(|u| u.province.as_str()).collect();
        provinces.sort_unstable();
        provinces.dedup();
        provinces
    }

    /// Number of cantons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the index has no cantons. Never true for a loaded index.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The boundary layer as `GeoJSON`, with `code`, `canton` and
    /// `province` properties on every feature, ordered by code.
    #[must_use]
    pub const fn feature_collection(&self) -> &FeatureCollection {
        &self.collection
    }
}

/// Rejects a legacy `crs` member naming anything other than WGS84.
fn check_crs(foreign_members: Option<&JsonObject>) -> Result<(), BoundaryError> {
    let Some(name) = foreign_members
        .and_then(|m| m.get("crs"))
        .and_then(|crs| crs.pointer("/properties/name"))
        .and_then(serde_json::Value::as_str)
    else {
        return Ok(());
    };

    if name.contains("4326") || name.contains("CRS84") {
        Ok(())
    } else {
        Err(BoundaryError::UnsupportedCrs(name.to_string()))
    }
}

/// Parses a unit code given either as a JSON number or a numeric string.
///
/// Shapefile conversions often write integer codes as `101.0`.
#[allow(clippy::cast_possible_truncation)]
fn parse_code(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 1e15)
                .map(|f| f as i64)
        }),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text_property(props: Option<&JsonObject>, name: &str) -> Option<String> {
    props?
        .get(name)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Builds the normalized feature served to the map.
fn unit_feature(unit: &AdminUnit, geometry: geojson::Geometry) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("code".to_string(), unit.code.into());
    properties.insert("canton".to_string(), unit.canton.clone().into());
    properties.insert("province".to_string(), unit.province.clone().into());

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Compute the bounding box envelope for a [`MultiPolygon`]. `None` when
/// it has no coordinates.
fn compute_envelope(mp: &MultiPolygon<f64>) -> Option<AABB<[f64; 2]>> {
    mp.bounding_rect()
        .map(|rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]))
}
