#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the biodiversity map.
//!
//! `serve` starts the web dashboard, `species` and `report` run the same
//! pipeline offline against a file on disk. Without a subcommand the user
//! picks a tool interactively.

mod interactive;
mod report;

use std::path::PathBuf;

use biodiv_map_analytics::build_dashboard;
use biodiv_map_analytics_models::TimeGranularity;
use biodiv_map_occurrence_models::TimestampPolicy;
use biodiv_map_server::ServerConfig;
use biodiv_map_server::config::DEFAULT_BOUNDARIES_PATH;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "biodiv_map", about = "Biodiversity occurrence dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web dashboard
    Serve {
        /// Address to bind
        #[arg(long)]
        bind: Option<String>,
        /// Port to bind
        #[arg(long)]
        port: Option<u16>,
        /// Canton boundary `GeoJSON`
        #[arg(long)]
        boundaries: Option<PathBuf>,
        /// TOML file mapping boundary properties to code, canton and province
        #[arg(long)]
        fields: Option<PathBuf>,
        /// Keep records with unparseable `eventDate` values instead of
        /// rejecting the upload
        #[arg(long)]
        skip_invalid_dates: bool,
    },
    /// Print the distinct species in an occurrence file
    Species {
        /// Tab-delimited Darwin Core occurrence file
        file: PathBuf,
        /// Keep records with unparseable `eventDate` values
        #[arg(long)]
        skip_invalid_dates: bool,
    },
    /// Print canton and province counts for one species
    Report {
        /// Tab-delimited Darwin Core occurrence file
        file: PathBuf,
        /// Exact species name
        #[arg(long)]
        species: String,
        /// Time-series granularity: `yearly` or `monthly`
        #[arg(long, default_value = "yearly")]
        granularity: TimeGranularity,
        /// Canton boundary `GeoJSON`
        #[arg(long, env = "BOUNDARIES_PATH", default_value = DEFAULT_BOUNDARIES_PATH)]
        boundaries: PathBuf,
        /// TOML file mapping boundary properties to code, canton and province
        #[arg(long, env = "BOUNDARY_FIELDS")]
        fields: Option<PathBuf>,
        /// Keep records with unparseable `eventDate` values
        #[arg(long)]
        skip_invalid_dates: bool,
    },
}

const fn policy(skip_invalid_dates: bool) -> TimestampPolicy {
    if skip_invalid_dates {
        TimestampPolicy::SkipAndWarn
    } else {
        TimestampPolicy::FailFast
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run();
    };

    match command {
        Commands::Serve {
            bind,
            port,
            boundaries,
            fields,
            skip_invalid_dates,
        } => {
            let mut config = ServerConfig::from_env();
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(boundaries) = boundaries {
                config.boundaries_path = boundaries;
            }
            if fields.is_some() {
                config.fields_path = fields;
            }
            if skip_invalid_dates {
                config.timestamp_policy = TimestampPolicy::SkipAndWarn;
            }
            actix_web::rt::System::new().block_on(biodiv_map_server::run_server(config))?;
        }
        Commands::Species {
            file,
            skip_invalid_dates,
        } => {
            let dataset = report::load_file(&file, policy(skip_invalid_dates))?;
            print!("{}", report::SpeciesList(&dataset));
        }
        Commands::Report {
            file,
            species,
            granularity,
            boundaries,
            fields,
            skip_invalid_dates,
        } => {
            let index = report::load_boundaries(&boundaries, fields.as_deref())?;
            let dataset = report::load_file(&file, policy(skip_invalid_dates))?;
            let dashboard = build_dashboard(&dataset, &species, granularity, &index);
            if dashboard.totals.records == 0 {
                log::warn!("No records of '{species}' in {}", file.display());
            }
            print!("{}", report::DashboardReport(&dashboard));
        }
    }

    Ok(())
}
