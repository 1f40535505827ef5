#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the campus incident toolchain.
//!
//! Runs the geospatial engine offline against a JSON incident file
//! (duplicate checks, heatmaps, clusters) or starts the API server. With
//! no subcommand it asks interactively which tool to run.

mod commands;

use std::path::PathBuf;

use campus_incidents_database_models::{DEFAULT_DUPLICATE_WINDOW_HOURS, IncidentRecord};
use campus_incidents_geo::{DEFAULT_CELL_SIZE_DEGREES, DEFAULT_CLUSTER_RADIUS_METERS};
use campus_incidents_incident_models::IncidentCategory;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Select};

#[derive(Parser)]
#[command(name = "campus_incidents", about = "Campus incident toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a prospective report duplicates an open incident
    Check {
        /// JSON file of incident records
        #[arg(long)]
        file: PathBuf,
        /// Category of the report (e.g., "water")
        #[arg(long)]
        category: IncidentCategory,
        /// Latitude of the report
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude of the report
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Optional report title for title matching
        #[arg(long)]
        title: Option<String>,
        /// How many hours back to look for open incidents
        #[arg(
            long,
            default_value_t = DEFAULT_DUPLICATE_WINDOW_HOURS,
            value_parser = clap::value_parser!(i64).range(1..),
        )]
        window_hours: i64,
    },
    /// Print the priority-weighted heatmap grid of an incident file
    Heatmap {
        /// JSON file of incident records
        #[arg(long)]
        file: PathBuf,
        /// Cell size in degrees
        #[arg(long, default_value_t = DEFAULT_CELL_SIZE_DEGREES)]
        cell_size: f64,
    },
    /// Print proximity clusters of an incident file
    Clusters {
        /// JSON file of incident records
        #[arg(long)]
        file: PathBuf,
        /// Cluster radius in meters
        #[arg(long, default_value_t = DEFAULT_CLUSTER_RADIUS_METERS)]
        radius: f64,
    },
    /// Print the great-circle distance in meters between two points
    Distance {
        /// Start latitude
        #[arg(allow_hyphen_values = true)]
        lat1: f64,
        /// Start longitude
        #[arg(allow_hyphen_values = true)]
        lng1: f64,
        /// End latitude
        #[arg(allow_hyphen_values = true)]
        lat2: f64,
        /// End longitude
        #[arg(allow_hyphen_values = true)]
        lng2: f64,
    },
    /// Start the API server (prompts for bind address and port)
    Serve,
}

/// Top-level tool selection for interactive mode.
enum Tool {
    Server,
    Check,
    Heatmap,
    Clusters,
}

impl Tool {
    const ALL: &[Self] = &[Self::Server, Self::Check, Self::Heatmap, Self::Clusters];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Server => "Start server",
            Self::Check => "Check a report for duplicates",
            Self::Heatmap => "Print heatmap for an incident file",
            Self::Clusters => "Print clusters for an incident file",
        }
    }
}

async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    // The server uses actix-web's runtime, so we need to run it
    // in a blocking task to avoid nesting tokio runtimes.
    tokio::task::spawn_blocking(|| {
        actix_web::rt::System::new().block_on(campus_incidents_server::interactive::run())
    })
    .await??;
    Ok(())
}

async fn prompt_records() -> Result<Vec<IncidentRecord>, Box<dyn std::error::Error>> {
    let file: String = Input::new()
        .with_prompt("Incident file")
        .default("data/incidents.json".to_string())
        .interact_text()?;
    Ok(commands::load(&PathBuf::from(file)).await?)
}

async fn interactive() -> Result<(), Box<dyn std::error::Error>> {
    println!("Campus Incident Toolchain");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    let output = match Tool::ALL[idx] {
        Tool::Server => return serve().await,
        Tool::Check => {
            let records = prompt_records().await?;
            let category_labels: Vec<&str> =
                IncidentCategory::all().iter().map(AsRef::as_ref).collect();
            let category = Select::new()
                .with_prompt("Category")
                .items(&category_labels)
                .default(0)
                .interact()?;
            let latitude: f64 = Input::new().with_prompt("Latitude").interact_text()?;
            let longitude: f64 = Input::new().with_prompt("Longitude").interact_text()?;
            let title: String = Input::new()
                .with_prompt("Title (optional)")
                .allow_empty(true)
                .interact_text()?;

            let args = commands::CheckArgs {
                category: IncidentCategory::all()[category],
                latitude,
                longitude,
                title: Some(title).filter(|t| !t.trim().is_empty()),
                window_hours: DEFAULT_DUPLICATE_WINDOW_HOURS,
                now: None,
            };
            commands::check(records, &args).await?
        }
        Tool::Heatmap => commands::heatmap(&prompt_records().await?, DEFAULT_CELL_SIZE_DEGREES)?,
        Tool::Clusters => {
            commands::clusters(&prompt_records().await?, DEFAULT_CLUSTER_RADIUS_METERS)?
        }
    };

    println!("{output}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive().await;
    };

    match command {
        Commands::Check {
            file,
            category,
            lat,
            lng,
            title,
            window_hours,
        } => {
            let records = commands::load(&file).await?;
            let args = commands::CheckArgs {
                category,
                latitude: lat,
                longitude: lng,
                title,
                window_hours,
                now: None,
            };
            println!("{}", commands::check(records, &args).await?);
        }
        Commands::Heatmap { file, cell_size } => {
            let records = commands::load(&file).await?;
            println!("{}", commands::heatmap(&records, cell_size)?);
        }
        Commands::Clusters { file, radius } => {
            let records = commands::load(&file).await?;
            println!("{}", commands::clusters(&records, radius)?);
        }
        Commands::Distance {
            lat1,
            lng1,
            lat2,
            lng2,
        } => {
            let meters = commands::distance((lat1, lng1), (lat2, lng2))?;
            println!("{meters:.1}");
        }
        Commands::Serve => serve().await?,
    }

    Ok(())
}
