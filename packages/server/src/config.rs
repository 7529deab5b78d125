//! Server configuration from environment variables.

use std::path::PathBuf;

use biodiv_map_occurrence_models::TimestampPolicy;

/// Default boundary file, relative to the working directory.
pub const DEFAULT_BOUNDARIES_PATH: &str = "data/cantones.geojson";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_UPLOAD_MB: usize = 64;
const DEFAULT_SESSION_CAPACITY: usize = 32;
const DEFAULT_STATIC_DIR: &str = "app";

/// Everything the server needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to bind (`PORT`).
    pub port: u16,
    /// Canton boundary GeoJSON (`BOUNDARIES_PATH`).
    pub boundaries_path: PathBuf,
    /// Optional TOML property mapping for the boundary file
    /// (`BOUNDARY_FIELDS`).
    pub fields_path: Option<PathBuf>,
    /// Upload size limit in bytes (`MAX_UPLOAD_MB`, in megabytes).
    pub max_upload_bytes: usize,
    /// Number of uploaded datasets kept in memory (`SESSION_CAPACITY`).
    pub session_capacity: usize,
    /// How unparseable event dates are handled (`TIMESTAMP_POLICY`).
    pub timestamp_policy: TimestampPolicy,
    /// Directory holding the frontend (`STATIC_DIR`).
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            boundaries_path: PathBuf::from(DEFAULT_BOUNDARIES_PATH),
            fields_path: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            session_capacity: DEFAULT_SESSION_CAPACITY,
            timestamp_policy: TimestampPolicy::default(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// Unset or unparseable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let timestamp_policy = match lookup("TIMESTAMP_POLICY") {
            Some(value) => value.trim().parse().unwrap_or_else(|_| {
                log::warn!(
                    "Unknown TIMESTAMP_POLICY '{value}', using '{}'",
                    defaults.timestamp_policy
                );
                defaults.timestamp_policy
            }),
            None => defaults.timestamp_policy,
        };

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            boundaries_path: lookup("BOUNDARIES_PATH")
                .map_or(defaults.boundaries_path, PathBuf::from),
            fields_path: lookup("BOUNDARY_FIELDS")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            max_upload_bytes: lookup("MAX_UPLOAD_MB")
                .and_then(|v| v.parse::<usize>().ok())
                .map_or(defaults.max_upload_bytes, |mb| mb.saturating_mul(1024 * 1024)),
            session_capacity: lookup("SESSION_CAPACITY")
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|c| *c > 0)
                .unwrap_or(defaults.session_capacity),
            timestamp_policy,
            static_dir: lookup("STATIC_DIR").map_or(defaults.static_dir, PathBuf::from),
        }
    }
}
