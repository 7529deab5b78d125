#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Spatial aggregation and dashboard assembly.
//!
//! [`aggregate`] holds the individual stages (point-in-canton counting,
//! province roll-up, label and time-series counts, ranking). [`dashboard`]
//! chains them into the per-request handler that turns a loaded dataset
//! and a species selection into a [`Dashboard`].
//!
//! Every function here is pure: the same dataset, species and boundary
//! index always produce the same output.

pub mod aggregate;
pub mod dashboard;

pub use biodiv_map_analytics_models::Dashboard;
pub use dashboard::build_dashboard;
