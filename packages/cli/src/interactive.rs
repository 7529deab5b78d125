//! Tool selection when no subcommand is given.

use std::path::PathBuf;

use biodiv_map_analytics::build_dashboard;
use biodiv_map_analytics_models::TimeGranularity;
use biodiv_map_server::ServerConfig;
use dialoguer::{Input, Select};

use crate::report;

/// Top-level tool selection.
enum Tool {
    Server,
    Species,
    Report,
}

impl Tool {
    const ALL: &[Self] = &[Self::Server, Self::Species, Self::Report];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Server => "Start server",
            Self::Species => "List species in a file",
            Self::Report => "Report counts for one species",
        }
    }
}

/// Asks which tool to run and walks through its inputs.
///
/// # Errors
///
/// Returns an error if a prompt fails or the selected tool fails.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Biodiversity Map");
    println!();

    let config = ServerConfig::from_env();
    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Server => {
            actix_web::rt::System::new().block_on(biodiv_map_server::interactive::run())?;
        }
        Tool::Species => {
            let dataset = report::load_file(&prompt_file()?, config.timestamp_policy)?;
            print!("{}", report::SpeciesList(&dataset));
        }
        Tool::Report => {
            let file = prompt_file()?;
            let dataset = report::load_file(&file, config.timestamp_policy)?;

            let species = dataset.species();
            if species.is_empty() {
                println!("{} has no records with a species.", file.display());
                return Ok(());
            }
            let choice = Select::new()
                .with_prompt("Species")
                .items(&species)
                .default(0)
                .interact()?;

            let boundaries: String = Input::new()
                .with_prompt("Canton boundaries (GeoJSON)")
                .default(config.boundaries_path.display().to_string())
                .interact_text()?;
            let index = report::load_boundaries(
                &PathBuf::from(boundaries),
                config.fields_path.as_deref(),
            )?;

            let granularities = [TimeGranularity::Yearly, TimeGranularity::Monthly];
            let granularity = Select::new()
                .with_prompt("Records per")
                .items(&granularities)
                .default(0)
                .interact()?;

            let dashboard = build_dashboard(
                &dataset,
                &species[choice],
                granularities[granularity],
                &index,
            );
            print!("{}", report::DashboardReport(&dashboard));
        }
    }

    Ok(())
}

fn prompt_file() -> Result<PathBuf, dialoguer::Error> {
    let path: String = Input::new()
        .with_prompt("Occurrence file (tab-delimited)")
        .interact_text()?;
    Ok(PathBuf::from(path.trim()))
}
