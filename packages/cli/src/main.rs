#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line tools for the district map.
//!
//! Computes district and school keys, validates the datasets, runs
//! consolidation estimates against them, and starts the API server.

mod render;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use district_map_consolidation::{compute_consolidation, select_districts};
use district_map_consolidation_models::ConsolidationParams;
use district_map_dataset::DistrictDataset;
use district_map_dataset::modeling::{AdminModelPolicy, BudgetSource, model_budget};
use district_map_dataset::paths;
use district_map_server::{ServerConfig, build_normalizer, run_server};

#[derive(Parser)]
#[command(name = "district_map_cli", about = "School district consolidation tools")]
struct Cli {
    /// Dataset directory (defaults to `$DISTRICT_MAP_DATA_DIR` or `<project>/data`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Normalizer config merged over the embedded aliases
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the district key for a name
    Key {
        /// District name as written in a source file
        name: String,
    },
    /// Print the school key for a district and school name
    SchoolKey {
        district: String,
        school: String,
    },
    /// Estimate the effect of consolidating districts
    Estimate {
        /// Two or more district names or keys
        #[arg(required = true)]
        districts: Vec<String>,
        /// Fraction of spoke admin cost eliminated
        #[arg(long)]
        admin_reduction_rate: Option<f64>,
        /// Fraction of spoke students with a longer ride
        #[arg(long)]
        affected_share: Option<f64>,
        /// Dollars per student per added mile
        #[arg(long)]
        cost_per_student_mile: Option<f64>,
        /// Print the raw JSON result
        #[arg(long)]
        json: bool,
    },
    /// Load every dataset and report coverage
    Validate,
    /// Derive modeled admin figures from raw budget components
    ModelBudget {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        fiscal_year: String,
        #[arg(long)]
        total_expenditures: f64,
        #[arg(long, default_value_t = 0.0)]
        district_management: f64,
        #[arg(long, default_value_t = 0.0)]
        program_operations_management: f64,
        /// Largest plausible admin share of total expenditures
        #[arg(long)]
        outlier_share_cap: Option<f64>,
    },
    /// Start the API server
    Serve {
        #[arg(long)]
        bind_addr: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let data_dir = cli.data_dir.unwrap_or_else(paths::data_dir);
    let config = cli.config;

    match cli.command {
        Commands::Key { name } => {
            let normalizer = build_normalizer(config.as_deref())?;
            println!("{}", normalizer.district_key(&name));
        }
        Commands::SchoolKey { district, school } => {
            let normalizer = build_normalizer(config.as_deref())?;
            println!("{}", normalizer.school_key(&district, &school));
        }
        Commands::Estimate {
            districts,
            admin_reduction_rate,
            affected_share,
            cost_per_student_mile,
            json,
        } => {
            let params = ConsolidationParams::with_overrides(
                admin_reduction_rate,
                affected_share,
                cost_per_student_mile,
            );
            estimate(&data_dir, config.as_deref(), &districts, &params, json)?;
        }
        Commands::Validate => {
            let normalizer = build_normalizer(config.as_deref())?;
            let dataset = DistrictDataset::load_from_dir(&data_dir, &normalizer)?;
            print!("{}", render::render_stats(&dataset.stats()));
        }
        Commands::ModelBudget {
            name,
            fiscal_year,
            total_expenditures,
            district_management,
            program_operations_management,
            outlier_share_cap,
        } => {
            let mut policy = AdminModelPolicy::default();
            if let Some(cap) = outlier_share_cap {
                policy.outlier_share_cap = cap;
            }
            let budget = model_budget(
                BudgetSource {
                    display_name: name,
                    fiscal_year,
                    total_expenditures,
                    district_management,
                    program_operations_management,
                },
                &policy,
            );
            println!("{}", serde_json::to_string_pretty(&budget)?);
        }
        Commands::Serve { bind_addr, port } => {
            let mut server_config = ServerConfig::from_env();
            server_config.data_dir = data_dir;
            if config.is_some() {
                server_config.normalizer_config = config;
            }
            if let Some(bind_addr) = bind_addr {
                server_config.bind_addr = bind_addr;
            }
            if let Some(port) = port {
                server_config.port = port;
            }
            actix_web::rt::System::new().block_on(run_server(server_config))?;
        }
    }

    Ok(())
}

fn estimate(
    data_dir: &Path,
    config: Option<&Path>,
    districts: &[String],
    params: &ConsolidationParams,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let normalizer = build_normalizer(config)?;
    let dataset = DistrictDataset::load_from_dir(data_dir, &normalizer)?;

    let selected = select_districts(&normalizer, districts);
    log::debug!("Selected keys: {selected:?}");

    let result = compute_consolidation(
        &selected,
        &dataset.budgets,
        &dataset.enrollments,
        &dataset.anchors,
        params,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render::render_result(&result));
    }

    Ok(())
}
